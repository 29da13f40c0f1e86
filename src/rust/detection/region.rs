use rand::seq::SliceRandom;

use crate::taxonomy::{DiseaseClass, ToothRegion};

/// Attributes a detected condition to a tooth region.
///
/// The shipped implementation is a random placeholder; a localization
/// model derived from attention maps can replace it without touching the
/// interpreter.
pub trait RegionEstimator: Send + Sync {
    fn estimate(&self, class: DiseaseClass, confidence: f32) -> ToothRegion;
}

/// Picks a region uniformly at random with a thread-local, unseeded RNG.
///
/// Every call draws independently, so concurrent scans never share state.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomRegionEstimator;

impl RegionEstimator for RandomRegionEstimator {
    fn estimate(&self, _class: DiseaseClass, _confidence: f32) -> ToothRegion {
        *ToothRegion::ALL
            .choose(&mut rand::thread_rng())
            .unwrap_or(&ToothRegion::MolarL1)
    }
}

/// Always returns the same region. Handy for reproducible output.
#[derive(Debug, Clone, Copy)]
pub struct FixedRegionEstimator(pub ToothRegion);

impl RegionEstimator for FixedRegionEstimator {
    fn estimate(&self, _class: DiseaseClass, _confidence: f32) -> ToothRegion {
        self.0
    }
}
