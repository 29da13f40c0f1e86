use ort::Error as OrtError;
use std::io;

use crate::model_manager::ModelError;

/// Errors that can end a single scan. None of them are retried internally.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The input could not be decoded as a raster image
    #[error("Decode error: {0}")]
    Decode(String),
    /// The image file could not be read
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// A tensor handed to the classifier does not have the preprocessed shape
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },
    /// Inference was attempted without a loaded classifier
    #[error("Model not loaded: {0}")]
    ModelNotLoaded(String),
    /// The classifier backend failed while running
    #[error("Model error: {0}")]
    Model(String),
    /// The classifier produced a vector that violates the output contract
    #[error("Invalid classifier output: {0}")]
    InvalidOutput(String),
    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<OrtError> for ScanError {
    fn from(err: OrtError) -> Self {
        ScanError::Model(err.to_string())
    }
}

impl From<image::ImageError> for ScanError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(e) => ScanError::Io(e),
            other => ScanError::Decode(other.to_string()),
        }
    }
}

impl From<ModelError> for ScanError {
    fn from(err: ModelError) -> Self {
        ScanError::ModelNotLoaded(err.to_string())
    }
}
