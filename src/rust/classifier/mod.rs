mod error;
mod fixed;
mod model;
mod onnx;
pub mod builder;
mod utils;

pub use error::ScanError;
pub use fixed::FixedClassifier;
pub use model::{Classifier, ClassifierInfo};
pub use onnx::OnnxClassifier;
pub use builder::ClassifierBuilder;
