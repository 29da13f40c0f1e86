//! Health report assembly.

use std::collections::HashSet;

use serde::Serialize;

use crate::detection::DetectionResult;
use crate::recommendations::RecommendationEngine;
use crate::taxonomy::{Severity, ToothRegion};

pub const NO_FINDINGS_SUMMARY: &str = "No significant oral diseases detected. Keep up good oral hygiene!";

pub const PREVENTIVE_STEPS: [&str; 2] = [
    "Continue regular brushing and flossing",
    "Schedule annual checkup",
];

pub const SEVERE_STEPS: [&str; 3] = [
    "Schedule urgent dentist appointment (within 24-48 hours)",
    "Take pain relievers if experiencing discomfort",
    "Avoid the affected area when eating",
];

pub const MODERATE_STEPS: [&str; 3] = [
    "Schedule dentist appointment within 1-2 weeks",
    "Follow the recommendations above",
    "Monitor for worsening symptoms",
];

pub const MILD_STEPS: [&str; 3] = [
    "Schedule routine checkup within 1 month",
    "Follow preventive recommendations",
    "Maintain good oral hygiene",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionSummary {
    pub name: String,
    pub confidence: f32,
    pub region: ToothRegion,
}

/// User-facing report for one scan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    pub summary: String,
    pub detected_conditions: Vec<ConditionSummary>,
    pub recommendations: Vec<String>,
    pub nutritional_deficiencies: Vec<String>,
    pub severity: Severity,
    pub next_steps: Vec<String>,
}

impl HealthReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Next steps for a severity grade. `Normal` gets the preventive checklist.
pub fn next_steps_for(severity: Severity) -> &'static [&'static str] {
    match severity {
        Severity::Severe => &SEVERE_STEPS,
        Severity::Moderate => &MODERATE_STEPS,
        Severity::Mild => &MILD_STEPS,
        Severity::Normal => &PREVENTIVE_STEPS,
    }
}

/// Builds a [`HealthReport`] from a [`DetectionResult`]. Total over any
/// detection result; performs no I/O.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportAssembler {
    engine: RecommendationEngine,
}

impl ReportAssembler {
    pub fn new() -> Self {
        Self::with_engine(RecommendationEngine::new())
    }

    pub fn with_engine(engine: RecommendationEngine) -> Self {
        Self { engine }
    }

    pub fn assemble(&self, detection: &DetectionResult) -> HealthReport {
        if detection.detected.is_empty() {
            return HealthReport {
                summary: NO_FINDINGS_SUMMARY.to_string(),
                detected_conditions: Vec::new(),
                recommendations: Vec::new(),
                nutritional_deficiencies: Vec::new(),
                severity: detection.severity,
                next_steps: to_owned(&PREVENTIVE_STEPS),
            };
        }

        let names: Vec<String> = detection
            .detected
            .iter()
            .map(|d| d.disease.key().replace('_', " "))
            .collect();

        let mut recommendations = Vec::new();
        let mut deficiencies = Vec::new();
        let mut conditions = Vec::with_capacity(detection.detected.len());
        for (condition, name) in detection.detected.iter().zip(&names) {
            conditions.push(ConditionSummary {
                name: name.clone(),
                confidence: condition.confidence,
                region: condition.region,
            });
            recommendations.extend(self.engine.recommendations_for(name));
            deficiencies.extend(self.engine.deficiencies_for(name));
        }

        HealthReport {
            summary: format!("Likely {} detected.", names.join(" and ")),
            detected_conditions: conditions,
            recommendations: dedup(recommendations),
            nutritional_deficiencies: dedup(deficiencies),
            severity: detection.severity,
            next_steps: to_owned(next_steps_for(detection.severity)),
        }
    }
}

/// Drops repeated entries, keeping first occurrences in order.
fn dedup(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items.into_iter().filter(|item| seen.insert(item.clone())).collect()
}

fn to_owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::{DetectedCondition, PLACEHOLDER_HEATMAP};
    use crate::taxonomy::DiseaseClass;

    fn detection(conditions: &[(DiseaseClass, f32)], severity: Severity) -> DetectionResult {
        let detected: Vec<DetectedCondition> = conditions
            .iter()
            .map(|&(disease, confidence)| DetectedCondition {
                disease,
                confidence,
                region: ToothRegion::PremolarL2,
            })
            .collect();
        DetectionResult {
            labels: detected.iter().map(|d| d.disease.label().to_string()).collect(),
            confidences: detected.iter().map(|d| d.confidence).collect(),
            severity,
            detected,
            heatmap: PLACEHOLDER_HEATMAP.to_string(),
        }
    }

    #[test]
    fn test_no_findings() {
        let report = ReportAssembler::new().assemble(&detection(&[], Severity::Normal));
        assert_eq!(report.summary, NO_FINDINGS_SUMMARY);
        assert_eq!(report.next_steps, PREVENTIVE_STEPS);
        assert!(report.recommendations.is_empty());
        assert!(report.nutritional_deficiencies.is_empty());
        assert_eq!(report.severity, Severity::Normal);
    }

    #[test]
    fn test_summary_joins_names() {
        let report = ReportAssembler::new().assemble(&detection(
            &[(DiseaseClass::Plaque, 0.65), (DiseaseClass::GumInflammation, 0.55)],
            Severity::Mild,
        ));
        assert_eq!(report.summary, "Likely plaque and gum inflammation detected.");
        assert_eq!(report.detected_conditions[1].name, "gum inflammation");
        assert_eq!(report.detected_conditions[1].region, ToothRegion::PremolarL2);
        assert_eq!(report.next_steps, MILD_STEPS);
    }

    #[test]
    fn test_deficiencies_are_deduplicated() {
        // Cavity, tooth decay and discoloration all list Calcium
        let report = ReportAssembler::new().assemble(&detection(
            &[
                (DiseaseClass::Cavity, 0.9),
                (DiseaseClass::ToothDecay, 0.8),
                (DiseaseClass::Discoloration, 0.7),
            ],
            Severity::Moderate,
        ));
        let calcium = report.nutritional_deficiencies.iter().filter(|d| *d == "Calcium").count();
        let vitamin_d = report.nutritional_deficiencies.iter().filter(|d| *d == "Vitamin D").count();
        assert_eq!(calcium, 1);
        assert_eq!(vitamin_d, 1);
        assert_eq!(report.recommendations.len(), 12);
        assert_eq!(report.next_steps, MODERATE_STEPS);
    }

    #[test]
    fn test_next_steps_by_severity() {
        assert_eq!(next_steps_for(Severity::Severe), &SEVERE_STEPS);
        assert_eq!(next_steps_for(Severity::Moderate).len(), 3);
        assert_ne!(next_steps_for(Severity::Mild), next_steps_for(Severity::Severe));
    }

    #[test]
    fn test_json_shape() {
        let report = ReportAssembler::new().assemble(&detection(&[(DiseaseClass::Ulcer, 0.7)], Severity::Moderate));
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["severity"], "moderate");
        assert_eq!(value["detected_conditions"][0]["name"], "ulcer");
        assert_eq!(value["detected_conditions"][0]["region"], "Premolar-L2");
        assert!(value["nutritional_deficiencies"].as_array().unwrap().contains(&"Zinc".into()));
    }
}
