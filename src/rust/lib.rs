//! Oral-cavity photo classification and health report generation.
//!
//! A scan flows strictly forward: image → tensor → per-class scores →
//! ranked detections → report. Only the [`Classifier`] holds state (its
//! trained weights); every other stage is a pure transform.
//!
//! # Basic Usage
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use oralscan::{OnnxClassifier, ScanPipeline};
//!
//! let classifier = OnnxClassifier::builder()
//!     .with_model_path("models/oral-mobilenet/model.onnx")?
//!     .build()?;
//!
//! let pipeline = ScanPipeline::builder()
//!     .with_classifier(classifier)
//!     .build()?;
//!
//! let outcome = pipeline.analyze_path("scan.jpg")?;
//! println!("{}", outcome.report.to_json_pretty()?);
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! [`ScanPipeline`] is `Send + Sync`; clone it or wrap it in `Arc` to serve
//! concurrent requests. Independent images can also be scanned in parallel
//! with [`ScanPipeline::analyze_batch`].
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use oralscan::{FixedClassifier, ScanPipeline};
//! use image::{DynamicImage, RgbImage};
//! use std::sync::Arc;
//! use std::thread;
//!
//! let pipeline = Arc::new(ScanPipeline::builder()
//!     .with_classifier(FixedClassifier::new(vec![0.9, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0])?)
//!     .build()?);
//!
//! let mut handles = vec![];
//! for _ in 0..3 {
//!     let pipeline = Arc::clone(&pipeline);
//!     handles.push(thread::spawn(move || {
//!         let image = DynamicImage::ImageRgb8(RgbImage::new(16, 16));
//!         pipeline.analyze_image(&image).unwrap();
//!     }));
//! }
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod detection;
pub mod model_manager;
pub mod pipeline;
pub mod preprocess;
pub mod recommendations;
pub mod report;
mod runtime;
pub mod taxonomy;

pub use classifier::{Classifier, ClassifierBuilder, ClassifierInfo, FixedClassifier, OnnxClassifier, ScanError};
pub use detection::{
    DetectedCondition, DetectionInterpreter, DetectionResult, FixedRegionEstimator, RandomRegionEstimator,
    RegionEstimator,
};
pub use model_manager::{ModelArtifact, ModelError, ModelManager};
pub use pipeline::{ScanOutcome, ScanPipeline, ScanPipelineBuilder};
pub use preprocess::{ImagePreprocessor, ImageTensor};
pub use recommendations::RecommendationEngine;
pub use report::{ConditionSummary, HealthReport, ReportAssembler};
pub use runtime::{create_session_builder, OptimizationLevel, RuntimeConfig};
pub use taxonomy::{DiseaseClass, ProbabilityVector, Severity, ToothRegion};

pub fn init_logger() {
    env_logger::init();
}
