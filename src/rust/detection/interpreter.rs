use std::sync::Arc;

use log::debug;
use serde::Serialize;

use super::region::{RandomRegionEstimator, RegionEstimator};
use crate::taxonomy::{DiseaseClass, ProbabilityVector, Severity, ToothRegion};

/// A class only counts as detected above this score (strictly).
pub const DETECTION_THRESHOLD: f32 = 0.3;
/// Number of top-ranked classes considered for detection.
pub const TOP_N: usize = 3;
/// Mean confidence above which a scan is graded severe.
pub const SEVERE_ABOVE: f64 = 0.8;
/// Mean confidence above which a scan is graded moderate.
pub const MODERATE_ABOVE: f64 = 0.6;

/// Served in place of a class-activation heatmap until one is computed:
/// a 1x1 transparent PNG.
pub const PLACEHOLDER_HEATMAP: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNk+M9QDwADhgGAWjR9awAAAABJRU5ErkJggg==";

/// A disease found in one scan. Never `Normal`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectedCondition {
    #[serde(rename = "class")]
    pub disease: DiseaseClass,
    pub confidence: f32,
    #[serde(rename = "toothRegion")]
    pub region: ToothRegion,
}

/// Interpretation of one probability vector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionResult {
    /// Display labels of the detected conditions, in rank order
    pub labels: Vec<String>,
    /// Confidences parallel to `labels`
    pub confidences: Vec<f32>,
    pub severity: Severity,
    #[serde(rename = "detected_diseases")]
    pub detected: Vec<DetectedCondition>,
    /// Encoded visualization for the scan, always populated
    #[serde(rename = "heatmap_data")]
    pub heatmap: String,
}

impl DetectionResult {
    pub fn is_empty(&self) -> bool {
        self.detected.is_empty()
    }
}

/// Turns classifier scores into ranked detections and a severity grade.
#[derive(Clone)]
pub struct DetectionInterpreter {
    region_estimator: Arc<dyn RegionEstimator>,
}

impl Default for DetectionInterpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DetectionInterpreter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetectionInterpreter").finish_non_exhaustive()
    }
}

impl DetectionInterpreter {
    pub fn new() -> Self {
        Self::with_region_estimator(Arc::new(RandomRegionEstimator))
    }

    pub fn with_region_estimator(region_estimator: Arc<dyn RegionEstimator>) -> Self {
        Self { region_estimator }
    }

    /// Ranks the classes, keeps the top [`TOP_N`], and reports each one
    /// that scores above [`DETECTION_THRESHOLD`] and is not `Normal`.
    ///
    /// A top-ranked `Normal` does not hide other classes that clear the
    /// threshold on their own.
    pub fn interpret(&self, probabilities: &ProbabilityVector) -> DetectionResult {
        let detected: Vec<DetectedCondition> = probabilities
            .ranked()
            .into_iter()
            .take(TOP_N)
            .filter(|(class, score)| *score > DETECTION_THRESHOLD && !class.is_normal())
            .map(|(disease, confidence)| DetectedCondition {
                disease,
                confidence,
                region: self.region_estimator.estimate(disease, confidence),
            })
            .collect();

        let severity = grade_severity(&detected);
        debug!("Detected {} condition(s), severity {}", detected.len(), severity);

        DetectionResult {
            labels: detected.iter().map(|d| d.disease.label().to_string()).collect(),
            confidences: detected.iter().map(|d| d.confidence).collect(),
            severity,
            detected,
            heatmap: PLACEHOLDER_HEATMAP.to_string(),
        }
    }
}

/// Buckets the mean confidence of the detected conditions.
///
/// Bounds are exclusive on the upper bucket: a mean of exactly 0.6 is mild
/// and exactly 0.8 is moderate. The mean is quantized to six decimals so
/// that `f32` noise on a nominal boundary value cannot change the bucket.
pub fn grade_severity(detected: &[DetectedCondition]) -> Severity {
    if detected.is_empty() {
        return Severity::Normal;
    }
    let sum: f64 = detected.iter().map(|d| d.confidence as f64).sum();
    let mean = quantize(sum / detected.len() as f64);

    if mean > SEVERE_ABOVE {
        Severity::Severe
    } else if mean > MODERATE_ABOVE {
        Severity::Moderate
    } else {
        Severity::Mild
    }
}

fn quantize(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}
