use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use sha2::{Digest, Sha256};
use tokio::sync::Mutex;

/// Errors raised while locating, verifying or fetching model artifacts.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Model not downloaded: {0}")]
    NotDownloaded(String),
    #[error("Download error: {0}")]
    DownloadError(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Model verification failed")]
    VerificationFailed,
    #[error("Hash mismatch: expected {expected}, got {actual} for {name}")]
    HashMismatch {
        name: String,
        expected: String,
        actual: String,
    },
}

/// A trained classifier file published at a URL with a known SHA-256.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelArtifact {
    pub name: String,
    pub url: String,
    pub sha256: String,
}

impl ModelArtifact {
    pub fn new(name: impl Into<String>, url: impl Into<String>, sha256: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            sha256: sha256.into().to_lowercase(),
        }
    }
}

/// Locates classifier artifacts under a models directory laid out as
/// `<models_dir>/<name>/model.onnx`.
#[derive(Clone, Debug)]
pub struct ModelManager {
    models_dir: PathBuf,
    download_lock: Arc<Mutex<()>>,
}

impl ModelManager {
    pub const CACHE_VAR: &'static str = "ORALSCAN_CACHE";

    /// Creates a new ModelManager with the default models directory
    pub fn new_default() -> io::Result<Self> {
        Self::new(Self::get_default_models_dir())
    }

    /// Returns the default models directory path
    pub fn get_default_models_dir() -> PathBuf {
        if let Ok(path) = env::var(Self::CACHE_VAR) {
            return PathBuf::from(path).join("models");
        }

        if let Some(cache_dir) = dirs::cache_dir() {
            return cache_dir.join("oralscan").join("models");
        }

        if let Some(home_dir) = dirs::home_dir() {
            return home_dir.join(".cache").join("oralscan").join("models");
        }

        env::temp_dir().join("oralscan").join("models")
    }

    pub fn new<P: AsRef<Path>>(models_dir: P) -> io::Result<Self> {
        let models_dir = models_dir.as_ref().to_path_buf();
        fs::create_dir_all(&models_dir)?;
        Ok(Self {
            models_dir,
            download_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    pub fn get_model_path(&self, name: &str) -> PathBuf {
        self.models_dir.join(name).join("model.onnx")
    }

    pub fn is_model_downloaded(&self, name: &str) -> bool {
        let model_path = self.get_model_path(name);
        log::debug!("Model path: {:?} (exists: {})", model_path, model_path.exists());
        model_path.exists()
    }

    /// Checks the artifact's hash. A missing file verifies as `false`.
    pub fn verify_model(&self, artifact: &ModelArtifact) -> Result<bool, ModelError> {
        let model_path = self.get_model_path(&artifact.name);
        if !model_path.exists() {
            log::info!("Model file {:?} does not exist", model_path);
            return Ok(false);
        }
        let ok = Self::hash_file(&model_path)? == artifact.sha256;
        if !ok {
            log::warn!("Model '{}' failed hash verification", artifact.name);
        }
        Ok(ok)
    }

    /// Downloads the artifact, replacing any existing copy that fails verification.
    pub async fn download_model(&self, artifact: &ModelArtifact) -> Result<(), ModelError> {
        let _lock = self.download_lock.lock().await;

        let model_path = self.get_model_path(&artifact.name);
        if model_path.exists() && self.verify_model(artifact)? {
            log::info!("Existing model file verified successfully");
            return Ok(());
        }

        log::info!("Downloading model '{}' from {}", artifact.name, artifact.url);
        let result = self.download_and_verify(artifact, &model_path).await;
        if let Err(e) = &result {
            log::error!("Failed to set up model '{}': {}", artifact.name, e);
            let _ = self.remove_download(&artifact.name);
        }
        result
    }

    async fn download_and_verify(&self, artifact: &ModelArtifact, path: &Path) -> Result<(), ModelError> {
        let response = reqwest::get(&artifact.url).await?.error_for_status()?;
        let bytes = response.bytes().await?;
        log::info!("Downloaded {} bytes", bytes.len());

        let actual = Self::hash_bytes(&bytes);
        if actual != artifact.sha256 {
            return Err(ModelError::HashMismatch {
                name: artifact.name.clone(),
                expected: artifact.sha256.clone(),
                actual,
            });
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, &bytes)?;

        if !self.verify_model(artifact)? {
            return Err(ModelError::VerificationFailed);
        }
        log::info!("Model '{}' downloaded and verified", artifact.name);
        Ok(())
    }

    pub fn remove_download(&self, name: &str) -> Result<(), ModelError> {
        let model_path = self.get_model_path(name);
        if model_path.exists() {
            fs::remove_file(&model_path)?;
        }
        Ok(())
    }

    /// Ensures the artifact is present and verified, downloading it if needed.
    pub async fn ensure_model_downloaded(&self, artifact: &ModelArtifact) -> Result<PathBuf, ModelError> {
        if !self.verify_model(artifact)? {
            self.download_model(artifact).await?;
        }
        Ok(self.get_model_path(&artifact.name))
    }

    /// Fails with `NotDownloaded` unless a verified copy is present.
    pub fn require_model(&self, artifact: &ModelArtifact) -> Result<PathBuf, ModelError> {
        if !self.verify_model(artifact)? {
            return Err(ModelError::NotDownloaded(artifact.name.clone()));
        }
        Ok(self.get_model_path(&artifact.name))
    }

    fn hash_file(path: &Path) -> Result<String, ModelError> {
        let bytes = fs::read(path)?;
        Ok(Self::hash_bytes(&bytes))
    }

    fn hash_bytes(bytes: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        format!("{:x}", hasher.finalize())
    }
}
