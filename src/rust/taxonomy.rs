//! Fixed vocabularies shared by every stage of the scan pipeline.
//!
//! The ordering of [`DiseaseClass::ALL`] is the index order of every
//! [`ProbabilityVector`] a classifier emits. It is a process-wide constant.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::classifier::ScanError;

/// Number of classes the classifier scores.
pub const NUM_CLASSES: usize = 7;

/// One label of the oral-condition vocabulary, including `Normal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DiseaseClass {
    Normal,
    Cavity,
    Plaque,
    GumInflammation,
    ToothDecay,
    Discoloration,
    Ulcer,
}

impl DiseaseClass {
    /// All classes, index-aligned with classifier output.
    pub const ALL: [DiseaseClass; NUM_CLASSES] = [
        DiseaseClass::Normal,
        DiseaseClass::Cavity,
        DiseaseClass::Plaque,
        DiseaseClass::GumInflammation,
        DiseaseClass::ToothDecay,
        DiseaseClass::Discoloration,
        DiseaseClass::Ulcer,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Display label, e.g. `"Gum Inflammation"`.
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Cavity => "Cavity",
            Self::Plaque => "Plaque",
            Self::GumInflammation => "Gum Inflammation",
            Self::ToothDecay => "Tooth Decay",
            Self::Discoloration => "Discoloration",
            Self::Ulcer => "Ulcer",
        }
    }

    /// Lower-cased label, the key used by the recommendation catalogs.
    pub fn key(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Cavity => "cavity",
            Self::Plaque => "plaque",
            Self::GumInflammation => "gum inflammation",
            Self::ToothDecay => "tooth decay",
            Self::Discoloration => "discoloration",
            Self::Ulcer => "ulcer",
        }
    }

    pub fn is_normal(self) -> bool {
        self == Self::Normal
    }
}

impl fmt::Display for DiseaseClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for DiseaseClass {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

impl FromStr for DiseaseClass {
    type Err = ScanError;

    /// Accepts labels in any case, with spaces or underscores.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('_', " ").to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|class| class.key() == normalized)
            .ok_or_else(|| ScanError::Config(format!("Unknown disease class: {}", s)))
    }
}

/// Coarse anatomical hint attached to a detected condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ToothRegion {
    #[serde(rename = "Molar-L1")]
    MolarL1,
    #[serde(rename = "Molar-L2")]
    MolarL2,
    #[serde(rename = "Premolar-L1")]
    PremolarL1,
    #[serde(rename = "Premolar-L2")]
    PremolarL2,
    #[serde(rename = "Molar-R1")]
    MolarR1,
    #[serde(rename = "Molar-R2")]
    MolarR2,
    #[serde(rename = "Premolar-R1")]
    PremolarR1,
    #[serde(rename = "Premolar-R2")]
    PremolarR2,
}

impl ToothRegion {
    pub const ALL: [ToothRegion; 8] = [
        ToothRegion::MolarL1,
        ToothRegion::MolarL2,
        ToothRegion::PremolarL1,
        ToothRegion::PremolarL2,
        ToothRegion::MolarR1,
        ToothRegion::MolarR2,
        ToothRegion::PremolarR1,
        ToothRegion::PremolarR2,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::MolarL1 => "Molar-L1",
            Self::MolarL2 => "Molar-L2",
            Self::PremolarL1 => "Premolar-L1",
            Self::PremolarL2 => "Premolar-L2",
            Self::MolarR1 => "Molar-R1",
            Self::MolarR2 => "Molar-R2",
            Self::PremolarR1 => "Premolar-R1",
            Self::PremolarR2 => "Premolar-R2",
        }
    }
}

impl fmt::Display for ToothRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Severity grade derived from the mean confidence of detected conditions.
///
/// Variants are declared in increasing order so that `Ord` follows severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Normal,
    Mild,
    Moderate,
    Severe,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Mild => "mild",
            Self::Moderate => "moderate",
            Self::Severe => "severe",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Independent per-class scores, one per [`DiseaseClass`], each in `[0, 1]`.
///
/// The values are not required to sum to one.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityVector(Vec<f32>);

impl ProbabilityVector {
    /// Validates length and range of raw classifier output.
    ///
    /// # Errors
    /// - `InvalidOutput` if the vector does not have exactly [`NUM_CLASSES`] entries
    /// - `InvalidOutput` if any entry is non-finite or outside `[0, 1]`
    pub fn new(values: Vec<f32>) -> Result<Self, ScanError> {
        if values.len() != NUM_CLASSES {
            return Err(ScanError::InvalidOutput(format!(
                "Expected {} class scores, got {}",
                NUM_CLASSES,
                values.len()
            )));
        }
        if let Some((i, v)) = values
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0 || **v > 1.0)
        {
            return Err(ScanError::InvalidOutput(format!(
                "Score for '{}' is out of range: {}",
                DiseaseClass::ALL[i],
                v
            )));
        }
        Ok(Self(values))
    }

    pub fn get(&self, class: DiseaseClass) -> f32 {
        self.0[class.index()]
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Classes paired with their scores, highest first.
    ///
    /// Ties keep class order, so the ranking is deterministic.
    pub fn ranked(&self) -> Vec<(DiseaseClass, f32)> {
        let mut ranked: Vec<(DiseaseClass, f32)> = DiseaseClass::ALL
            .iter()
            .copied()
            .zip(self.0.iter().copied())
            .collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked
    }
}

impl TryFrom<Vec<f32>> for ProbabilityVector {
    type Error = ScanError;

    fn try_from(values: Vec<f32>) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_order_matches_indices() {
        for (i, class) in DiseaseClass::ALL.iter().enumerate() {
            assert_eq!(class.index(), i);
            assert_eq!(DiseaseClass::from_index(i), Some(*class));
        }
        assert_eq!(DiseaseClass::from_index(NUM_CLASSES), None);
    }

    #[test]
    fn test_class_parsing() {
        assert_eq!("GUM_INFLAMMATION".parse::<DiseaseClass>().unwrap(), DiseaseClass::GumInflammation);
        assert_eq!("tooth decay".parse::<DiseaseClass>().unwrap(), DiseaseClass::ToothDecay);
        assert!("gingivitis".parse::<DiseaseClass>().is_err());
    }

    #[test]
    fn test_probability_vector_validation() {
        assert!(ProbabilityVector::new(vec![0.1; 6]).is_err());
        assert!(ProbabilityVector::new(vec![0.1, 1.2, 0.0, 0.0, 0.0, 0.0, 0.0]).is_err());
        assert!(ProbabilityVector::new(vec![0.1, f32::NAN, 0.0, 0.0, 0.0, 0.0, 0.0]).is_err());
        assert!(ProbabilityVector::new(vec![1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0]).is_ok());
    }

    #[test]
    fn test_ranking_is_stable_on_ties() {
        let probs = ProbabilityVector::new(vec![0.2, 0.5, 0.5, 0.1, 0.9, 0.0, 0.0]).unwrap();
        let ranked: Vec<DiseaseClass> = probs.ranked().into_iter().map(|(c, _)| c).collect();
        assert_eq!(
            &ranked[..3],
            &[DiseaseClass::ToothDecay, DiseaseClass::Cavity, DiseaseClass::Plaque]
        );
    }

    #[test]
    fn test_serialized_names() {
        assert_eq!(serde_json::to_string(&Severity::Moderate).unwrap(), "\"moderate\"");
        assert_eq!(serde_json::to_string(&ToothRegion::PremolarR2).unwrap(), "\"Premolar-R2\"");
        assert_eq!(serde_json::to_string(&DiseaseClass::GumInflammation).unwrap(), "\"gum inflammation\"");
    }
}
