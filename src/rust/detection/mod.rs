//! Interpretation of classifier scores into detected conditions.

mod interpreter;
mod region;

pub use interpreter::{
    grade_severity, DetectedCondition, DetectionInterpreter, DetectionResult, DETECTION_THRESHOLD,
    MODERATE_ABOVE, PLACEHOLDER_HEATMAP, SEVERE_ABOVE, TOP_N,
};
pub use region::{FixedRegionEstimator, RandomRegionEstimator, RegionEstimator};
