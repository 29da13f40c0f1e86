use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use ort::session::Session;
use ort::value::Tensor;

use super::builder::ClassifierBuilder;
use super::error::ScanError;
use super::model::{Classifier, ClassifierInfo};
use super::utils::{check_input_shape, output_to_probabilities};
use crate::preprocess::ImageTensor;
use crate::taxonomy::ProbabilityVector;

/// Classifier backed by an ONNX network (pretrained backbone with a
/// per-class head).
///
/// # Thread Safety
///
/// The session is held in an `Arc` and ONNX Runtime sessions accept
/// concurrent runs, so one instance can serve many threads:
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use oralscan::{Classifier, ImagePreprocessor, OnnxClassifier};
/// use std::sync::Arc;
/// use std::thread;
///
/// let classifier = Arc::new(OnnxClassifier::builder()
///     .with_model_path("models/oral-mobilenet/model.onnx")?
///     .build()?);
///
/// let tensor = ImagePreprocessor::new().preprocess_path("scan.jpg")?;
/// let classifier_clone = Arc::clone(&classifier);
/// thread::spawn(move || {
///     classifier_clone.classify(&tensor).unwrap();
/// });
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct OnnxClassifier {
    pub model_path: String,
    pub input_name: String,
    pub session: Arc<Session>,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<OnnxClassifier>();
    }
};

impl OnnxClassifier {
    /// Creates a new ClassifierBuilder for fluent construction
    pub fn builder() -> ClassifierBuilder {
        ClassifierBuilder::new()
    }
}

impl Classifier for OnnxClassifier {
    /// Runs the network on one NHWC tensor.
    ///
    /// The model is expected to take a single `[1, 224, 224, 3]` float input
    /// and produce `[1, K]` independent class scores as its first output.
    fn classify(&self, tensor: &ImageTensor) -> Result<ProbabilityVector, ScanError> {
        check_input_shape(tensor)?;

        let mut input_tensors = HashMap::new();
        input_tensors.insert(
            self.input_name.as_str(),
            Tensor::from_array(tensor.clone())
                .map_err(|e| ScanError::Model(format!("Failed to create input tensor: {}", e)))?,
        );

        let outputs = self.session.run(input_tensors)
            .map_err(|e| ScanError::Model(format!("Failed to run model: {}", e)))?;
        let output_tensor = outputs[0].try_extract_tensor::<f32>()
            .map_err(|e| ScanError::Model(format!("Failed to extract output tensor: {}", e)))?;
        debug!("Model output shape: {:?}", output_tensor.shape());

        output_to_probabilities(output_tensor.view())
    }

    fn info(&self) -> ClassifierInfo {
        ClassifierInfo::new(format!("onnx:{}", self.model_path), true)
    }
}
