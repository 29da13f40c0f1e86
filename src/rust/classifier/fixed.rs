use super::error::ScanError;
use super::model::{Classifier, ClassifierInfo};
use super::utils::check_input_shape;
use crate::preprocess::ImageTensor;
use crate::taxonomy::ProbabilityVector;

/// Deterministic classifier that returns the same scores for every image.
///
/// Useful for tests, benchmarks and replaying cached results. The input
/// shape contract is still enforced.
///
/// ```
/// use oralscan::{Classifier, FixedClassifier, ImagePreprocessor};
/// use image::{DynamicImage, RgbImage};
///
/// let classifier = FixedClassifier::new(vec![0.1, 0.85, 0.05, 0.05, 0.05, 0.05, 0.05]).unwrap();
/// let image = DynamicImage::ImageRgb8(RgbImage::new(32, 32));
/// let tensor = ImagePreprocessor::new().preprocess_image(&image);
/// let scores = classifier.classify(&tensor).unwrap();
/// assert_eq!(scores.as_slice()[1], 0.85);
/// ```
#[derive(Debug, Clone)]
pub struct FixedClassifier {
    scores: ProbabilityVector,
}

impl FixedClassifier {
    pub fn new(scores: Vec<f32>) -> Result<Self, ScanError> {
        Ok(Self { scores: ProbabilityVector::new(scores)? })
    }
}

impl From<ProbabilityVector> for FixedClassifier {
    fn from(scores: ProbabilityVector) -> Self {
        Self { scores }
    }
}

impl Classifier for FixedClassifier {
    fn classify(&self, tensor: &ImageTensor) -> Result<ProbabilityVector, ScanError> {
        check_input_shape(tensor)?;
        Ok(self.scores.clone())
    }

    fn info(&self) -> ClassifierInfo {
        ClassifierInfo::new("fixed", true)
    }
}
