//! Static care advice and nutritional hints per disease.
//!
//! Catalogs are keyed by lower-cased disease name and built once on first
//! use. Unknown names yield empty lists so report assembly never fails on an
//! incomplete catalog.

use std::collections::HashMap;

use lazy_static::lazy_static;

lazy_static! {
    static ref RECOMMENDATIONS: HashMap<&'static str, &'static [&'static str]> = {
        let mut m: HashMap<&'static str, &'static [&'static str]> = HashMap::new();
        m.insert("cavity", &[
            "Schedule a filling appointment within 2 weeks",
            "Avoid hot and cold foods",
            "Use a soft-bristled toothbrush",
            "Fluoride toothpaste is recommended",
        ]);
        m.insert("plaque", &[
            "Brush twice daily with fluoride toothpaste",
            "Floss daily to remove plaque buildup",
            "Use an electric toothbrush for better cleaning",
            "Consider professional cleaning from dentist",
        ]);
        m.insert("gum inflammation", &[
            "Rinse with warm salt water 2-3 times daily",
            "Avoid hard and sticky foods",
            "See a dentist within 1 week",
            "Increase vitamin C intake (citrus, berries)",
        ]);
        m.insert("tooth decay", &[
            "Schedule dental appointment urgently (within 3 days)",
            "Avoid sugary and acidic foods",
            "Do not chew on hard objects",
            "Rinse mouth with water after meals",
        ]);
        m.insert("discoloration", &[
            "Avoid coffee, tea, and red wine",
            "Use whitening toothpaste",
            "Professional teeth cleaning recommended",
            "Limit smoking and tobacco products",
        ]);
        m.insert("ulcer", &[
            "Avoid spicy and acidic foods",
            "Use saltwater rinses 3-4 times daily",
            "Take vitamin B12 and zinc supplements",
            "See dentist if ulcer persists beyond 2 weeks",
        ]);
        m
    };

    static ref DEFICIENCIES: HashMap<&'static str, &'static [&'static str]> = {
        let mut m: HashMap<&'static str, &'static [&'static str]> = HashMap::new();
        m.insert("cavity", &["Calcium", "Vitamin D", "Fluoride"]);
        m.insert("plaque", &["Vitamin C", "Calcium"]);
        m.insert("gum inflammation", &["Vitamin C", "Iron", "B Vitamins"]);
        m.insert("tooth decay", &["Calcium", "Vitamin D", "Phosphorus"]);
        m.insert("discoloration", &["Vitamin A", "Calcium"]);
        m.insert("ulcer", &["Vitamin B12", "Zinc", "Folic Acid"]);
        m
    };
}

/// Read-only lookups into the advice catalogs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecommendationEngine;

impl RecommendationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Care instructions for `disease`, matched case-insensitively.
    pub fn recommendations_for(&self, disease: &str) -> Vec<String> {
        lookup(&RECOMMENDATIONS, disease)
    }

    /// Nutritional deficiencies associated with `disease`.
    pub fn deficiencies_for(&self, disease: &str) -> Vec<String> {
        lookup(&DEFICIENCIES, disease)
    }
}

fn lookup(catalog: &HashMap<&'static str, &'static [&'static str]>, disease: &str) -> Vec<String> {
    catalog
        .get(disease.to_lowercase().as_str())
        .map(|entries| entries.iter().map(|s| s.to_string()).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::DiseaseClass;

    #[test]
    fn test_case_insensitive() {
        let engine = RecommendationEngine::new();
        assert_eq!(engine.recommendations_for("CAVITY"), engine.recommendations_for("cavity"));
        assert_eq!(engine.deficiencies_for("Gum Inflammation"), vec!["Vitamin C", "Iron", "B Vitamins"]);
    }

    #[test]
    fn test_unknown_is_empty() {
        let engine = RecommendationEngine::new();
        assert!(engine.recommendations_for("unknown").is_empty());
        assert!(engine.deficiencies_for("").is_empty());
        assert!(engine.recommendations_for("normal").is_empty());
    }

    #[test]
    fn test_every_disease_is_catalogued() {
        let engine = RecommendationEngine::new();
        for class in DiseaseClass::ALL.iter().filter(|c| !c.is_normal()) {
            let recs = engine.recommendations_for(class.key());
            let defs = engine.deficiencies_for(class.key());
            assert!((3..=4).contains(&recs.len()), "{} has {} recommendations", class, recs.len());
            assert!((2..=3).contains(&defs.len()), "{} has {} deficiencies", class, defs.len());
        }
    }
}
