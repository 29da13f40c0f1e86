use std::path::Path;
use std::sync::Arc;

use log::{error, info};
use ort::session::Session;

use super::error::ScanError;
use super::onnx::OnnxClassifier;
use crate::model_manager::{ModelArtifact, ModelManager};
use crate::runtime::{create_session_builder, RuntimeConfig};

/// A builder for constructing an [`OnnxClassifier`] with a fluent interface.
#[derive(Default, Debug)]
pub struct ClassifierBuilder {
    model_path: Option<String>,
    session: Option<Session>,
    runtime_config: RuntimeConfig,
}

impl ClassifierBuilder {
    /// Creates a new empty ClassifierBuilder instance with default configuration
    ///
    /// # Example
    /// ```
    /// use oralscan::ClassifierBuilder;
    ///
    /// let builder = ClassifierBuilder::new();
    /// ```
    pub fn new() -> Self {
        Self {
            model_path: None,
            session: None,
            runtime_config: RuntimeConfig::default(),
        }
    }

    /// Sets the runtime configuration used when the model is loaded.
    ///
    /// Must be called before `with_model_path` or `with_artifact` to take
    /// effect.
    ///
    /// # Example
    /// ```
    /// use oralscan::{ClassifierBuilder, RuntimeConfig};
    ///
    /// let builder = ClassifierBuilder::new()
    ///     .with_runtime_config(RuntimeConfig::default());
    /// ```
    pub fn with_runtime_config(mut self, config: RuntimeConfig) -> Self {
        self.runtime_config = config;
        self
    }

    /// Loads an ONNX model from a file.
    ///
    /// # Returns
    /// * `Result<Self, ScanError>` - The builder instance if successful, or an error if:
    ///   - The path is empty or a model was already set (`Config`)
    ///   - The file does not exist (`ModelNotLoaded`)
    ///   - ONNX Runtime rejects the file (`Model`)
    ///   - The model does not take exactly one input or has no outputs (`Model`)
    ///
    /// # Example
    /// ```no_run
    /// use oralscan::ClassifierBuilder;
    ///
    /// let builder = ClassifierBuilder::new()
    ///     .with_model_path("models/oral-mobilenet/model.onnx");
    /// ```
    pub fn with_model_path(mut self, model_path: impl AsRef<Path>) -> Result<Self, ScanError> {
        let model_path = model_path.as_ref();
        if model_path.as_os_str().is_empty() {
            return Err(ScanError::Config("Model path cannot be empty".to_string()));
        }
        if self.model_path.is_some() {
            return Err(ScanError::Config("Model path already set".to_string()));
        }
        if !model_path.exists() {
            return Err(ScanError::ModelNotLoaded(format!("Model file not found: {}", model_path.display())));
        }

        let session = create_session_builder(&self.runtime_config)?
            .commit_from_file(model_path)
            .map_err(|e| {
                error!("Failed to load model {:?}: {}", model_path, e);
                ScanError::Model(format!("Failed to load model: {}", e))
            })?;

        Self::validate_model(&session)?;
        info!("Model structure validated successfully");

        self.model_path = Some(model_path.to_string_lossy().to_string());
        self.session = Some(session);
        Ok(self)
    }

    /// Loads the model for a managed artifact.
    ///
    /// The artifact must already be present and verified; call
    /// [`ModelManager::ensure_model_downloaded`] first to fetch it.
    pub fn with_artifact(self, manager: &ModelManager, artifact: &ModelArtifact) -> Result<Self, ScanError> {
        if !manager.is_model_downloaded(&artifact.name) {
            return Err(ScanError::ModelNotLoaded(format!(
                "Model '{}' is not downloaded. Please download it first using ModelManager::download_model()",
                artifact.name
            )));
        }
        if !manager.verify_model(artifact)? {
            return Err(ScanError::ModelNotLoaded(format!(
                "Model '{}' failed integrity verification",
                artifact.name
            )));
        }
        self.with_model_path(manager.get_model_path(&artifact.name))
    }

    /// Builds and returns the final classifier.
    ///
    /// # Errors
    /// * `ModelNotLoaded` if no model was loaded; there is no fallback to an
    ///   untrained network
    pub fn build(mut self) -> Result<OnnxClassifier, ScanError> {
        let session = self.session.take()
            .ok_or_else(|| ScanError::ModelNotLoaded("No ONNX model loaded".into()))?;
        let model_path = self.model_path.take()
            .ok_or_else(|| ScanError::ModelNotLoaded("Model path must be set".into()))?;
        let input_name = session.inputs[0].name.clone();
        info!("Classifier ready (model: {}, input: {})", model_path, input_name);

        Ok(OnnxClassifier {
            model_path,
            input_name,
            session: Arc::new(session),
        })
    }

    /// Validates that the model takes one image input and yields scores.
    fn validate_model(session: &Session) -> Result<(), ScanError> {
        let inputs = &session.inputs;
        if inputs.len() != 1 {
            return Err(ScanError::Model(
                format!("Model must have exactly 1 image input, found {}", inputs.len())
            ));
        }

        if session.outputs.is_empty() {
            return Err(ScanError::Model(
                "Model must have at least 1 output for class scores".to_string()
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_without_model_fails() {
        let result = ClassifierBuilder::new().build();
        assert!(matches!(result, Err(ScanError::ModelNotLoaded(_))));
    }

    #[test]
    fn test_missing_model_file() {
        let result = ClassifierBuilder::new().with_model_path("/nonexistent/oralscan/model.onnx");
        assert!(matches!(result, Err(ScanError::ModelNotLoaded(_))));
    }

    #[test]
    fn test_empty_model_path() {
        let result = ClassifierBuilder::new().with_model_path("");
        assert!(matches!(result, Err(ScanError::Config(_))));
    }

    #[test]
    fn test_artifact_not_downloaded() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let manager = ModelManager::new(dir.path())?;
        let artifact = ModelArtifact::new("missing", "http://localhost/model.onnx", "00");
        let result = ClassifierBuilder::new().with_artifact(&manager, &artifact);
        assert!(matches!(result, Err(ScanError::ModelNotLoaded(_))));
        Ok(())
    }
}
