//! End-to-end scan: preprocess, classify, interpret, assemble.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use image::DynamicImage;
use log::{debug, info};
use rayon::prelude::*;
use serde::Serialize;

use crate::classifier::{Classifier, ClassifierInfo, ScanError};
use crate::detection::{DetectionInterpreter, DetectionResult, RegionEstimator};
use crate::preprocess::{ImagePreprocessor, ImageTensor};
use crate::report::{HealthReport, ReportAssembler};

/// Everything produced for one image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanOutcome {
    pub detection: DetectionResult,
    pub report: HealthReport,
}

/// A ready-to-use scan pipeline. Cheap to clone and safe to share.
///
/// ```
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use oralscan::{FixedClassifier, ScanPipeline, Severity};
/// use image::{DynamicImage, RgbImage};
///
/// let pipeline = ScanPipeline::builder()
///     .with_classifier(FixedClassifier::new(vec![0.1, 0.85, 0.05, 0.05, 0.05, 0.05, 0.05])?)
///     .build()?;
///
/// let image = DynamicImage::ImageRgb8(RgbImage::new(64, 64));
/// let outcome = pipeline.analyze_image(&image)?;
/// assert_eq!(outcome.report.severity, Severity::Severe);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ScanPipeline {
    preprocessor: ImagePreprocessor,
    classifier: Arc<dyn Classifier>,
    interpreter: DetectionInterpreter,
    assembler: ReportAssembler,
}

impl std::fmt::Debug for ScanPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanPipeline")
            .field("classifier", &self.classifier.info())
            .finish_non_exhaustive()
    }
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<ScanPipeline>();
    }
};

impl ScanPipeline {
    pub fn builder() -> ScanPipelineBuilder {
        ScanPipelineBuilder::default()
    }

    pub fn classifier_info(&self) -> ClassifierInfo {
        self.classifier.info()
    }

    /// Scans the image file at `path`.
    pub fn analyze_path(&self, path: impl AsRef<Path>) -> Result<ScanOutcome, ScanError> {
        let tensor = self.preprocessor.preprocess_path(path)?;
        self.analyze_tensor(&tensor)
    }

    /// Scans an encoded image held in memory.
    pub fn analyze_bytes(&self, bytes: &[u8]) -> Result<ScanOutcome, ScanError> {
        let tensor = self.preprocessor.preprocess_bytes(bytes)?;
        self.analyze_tensor(&tensor)
    }

    pub fn analyze_image(&self, image: &DynamicImage) -> Result<ScanOutcome, ScanError> {
        let tensor = self.preprocessor.preprocess_image(image);
        self.analyze_tensor(&tensor)
    }

    /// Runs classification onward on an already preprocessed tensor.
    pub fn analyze_tensor(&self, tensor: &ImageTensor) -> Result<ScanOutcome, ScanError> {
        let start = Instant::now();
        let probabilities = self.classifier.classify(tensor)?;
        debug!("Classified in {:.2?}: {:?}", start.elapsed(), probabilities.as_slice());

        let detection = self.interpreter.interpret(&probabilities);
        let report = self.assembler.assemble(&detection);
        Ok(ScanOutcome { detection, report })
    }

    /// Scans independent images in parallel.
    ///
    /// Results come back in input order; a failure affects only its own entry.
    pub fn analyze_batch(&self, paths: &[PathBuf]) -> Vec<Result<ScanOutcome, ScanError>> {
        info!("Scanning batch of {} image(s)", paths.len());
        paths.par_iter().map(|path| self.analyze_path(path)).collect()
    }
}

/// Builder for [`ScanPipeline`]. A classifier is required.
#[derive(Default)]
pub struct ScanPipelineBuilder {
    classifier: Option<Arc<dyn Classifier>>,
    interpreter: Option<DetectionInterpreter>,
    assembler: Option<ReportAssembler>,
}

impl ScanPipelineBuilder {
    pub fn with_classifier(self, classifier: impl Classifier + 'static) -> Self {
        self.with_shared_classifier(Arc::new(classifier))
    }

    pub fn with_shared_classifier(mut self, classifier: Arc<dyn Classifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn with_region_estimator(mut self, estimator: Arc<dyn RegionEstimator>) -> Self {
        self.interpreter = Some(DetectionInterpreter::with_region_estimator(estimator));
        self
    }

    pub fn with_report_assembler(mut self, assembler: ReportAssembler) -> Self {
        self.assembler = Some(assembler);
        self
    }

    /// # Errors
    /// `ModelNotLoaded` if no classifier was supplied.
    pub fn build(self) -> Result<ScanPipeline, ScanError> {
        let classifier = self.classifier.ok_or_else(|| {
            ScanError::ModelNotLoaded("A classifier must be set before building the pipeline".into())
        })?;
        if !classifier.info().loaded {
            return Err(ScanError::ModelNotLoaded("Classifier reports no loaded model".into()));
        }

        Ok(ScanPipeline {
            preprocessor: ImagePreprocessor::new(),
            classifier,
            interpreter: self.interpreter.unwrap_or_default(),
            assembler: self.assembler.unwrap_or_default(),
        })
    }
}
