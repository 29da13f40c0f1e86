use serde::Serialize;

use super::error::ScanError;
use crate::preprocess::{input_shape, ImageTensor};
use crate::taxonomy::{DiseaseClass, ProbabilityVector};

/// The capability the scan pipeline consumes: image tensor in, per-class
/// scores out.
///
/// Implementations must accept exactly the tensor shape produced by
/// [`crate::ImagePreprocessor`] and return one score per
/// [`DiseaseClass`], index-aligned with [`DiseaseClass::ALL`]. The pipeline
/// makes no other assumption, so an ONNX network, a remote service or a
/// fixed lookup are interchangeable.
///
/// Implementations are shared across threads and must be `Send + Sync`.
pub trait Classifier: Send + Sync {
    /// Scores a single preprocessed image.
    ///
    /// # Errors
    /// - `ShapeMismatch` if `tensor` does not have shape `(1, 224, 224, 3)`
    /// - `Model` if the backend fails to run
    /// - `InvalidOutput` if the backend produces a malformed vector
    fn classify(&self, tensor: &ImageTensor) -> Result<ProbabilityVector, ScanError>;

    /// Describes the backend.
    fn info(&self) -> ClassifierInfo;
}

/// Static description of a classifier backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifierInfo {
    pub classes: Vec<&'static str>,
    pub input_shape: [usize; 4],
    pub backend: String,
    pub loaded: bool,
}

impl ClassifierInfo {
    pub fn new(backend: impl Into<String>, loaded: bool) -> Self {
        Self {
            classes: DiseaseClass::ALL.iter().map(|c| c.label()).collect(),
            input_shape: input_shape(),
            backend: backend.into(),
            loaded,
        }
    }
}
