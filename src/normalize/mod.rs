//! Bidirectional feature normalization.
//!
//! The trained models consume standardized ("z-score") signals; end users
//! supply and read values in natural units. Each schema version carries a
//! hand-tuned profile table (mean, std, clamp range, discreteness) fixed at
//! build time — these are product constants, not statistics learned at
//! request time.

use std::collections::BTreeMap;

use crate::types::{FeatureError, FeatureSet, SchemaVersion};

// ============================================================================
// Profiles
// ============================================================================

/// Per-feature normalization constants.
#[derive(Debug, Clone, Copy)]
pub struct NormalizationProfile {
    pub name: &'static str,
    pub mean: f64,
    pub std: f64,
    /// Readable values are clamped into [min, max] after denormalization.
    pub min: f64,
    pub max: f64,
    /// Discrete features round to whole numbers, continuous to 2 decimals.
    pub discrete: bool,
}

/// Profile table for the 4-signal schema. The scaler for this generation was
/// fitted on readable values; profiles here serve centroid readability only.
const PROFILES_V1: [NormalizationProfile; 4] = [
    NormalizationProfile { name: "avg_minutes_per_module", mean: 20.0, std: 8.0, min: 5.0, max: 45.0, discrete: false },
    NormalizationProfile { name: "consistency_score", mean: 0.7, std: 0.15, min: 0.0, max: 1.0, discrete: false },
    NormalizationProfile { name: "total_activities", mean: 25.0, std: 10.0, min: 1.0, max: 120.0, discrete: true },
    NormalizationProfile { name: "weekend_ratio", mean: 0.3, std: 0.2, min: 0.0, max: 1.0, discrete: false },
];

/// Profile table for the 5-signal schema.
const PROFILES_V2: [NormalizationProfile; 5] = [
    NormalizationProfile { name: "completion_velocity", mean: 0.75, std: 0.2, min: 0.1, max: 1.0, discrete: false },
    NormalizationProfile { name: "avg_minutes_per_module", mean: 20.0, std: 8.0, min: 5.0, max: 45.0, discrete: false },
    NormalizationProfile { name: "login_gap_std", mean: 2.5, std: 1.0, min: 0.5, max: 7.0, discrete: false },
    NormalizationProfile { name: "weekend_ratio", mean: 0.3, std: 0.2, min: 0.0, max: 1.0, discrete: false },
    NormalizationProfile { name: "night_study_ratio", mean: 0.25, std: 0.15, min: 0.0, max: 0.8, discrete: false },
];

/// Round to 2 decimal places (wire precision for readable values).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ============================================================================
// Normalizer
// ============================================================================

/// Converts between readable feature values and the standardized
/// representation the active schema's models were trained on.
///
/// The profile table is selected by the same [`SchemaVersion`] that owns the
/// feature-order lists, so a table can never be paired with the wrong order.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    schema: SchemaVersion,
}

impl Normalizer {
    pub fn new(schema: SchemaVersion) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> SchemaVersion {
        self.schema
    }

    /// Look up the profile for a feature name, if one exists.
    pub fn profile(&self, feature: &str) -> Option<&'static NormalizationProfile> {
        let table: &[NormalizationProfile] = match self.schema {
            SchemaVersion::Behavioral4 => &PROFILES_V1,
            SchemaVersion::Behavioral5 => &PROFILES_V2,
        };
        table.iter().find(|p| p.name == feature)
    }

    /// Convert a z-score to a readable value: `mean + z*std`, clamped to the
    /// profile range, then rounded (whole number for discrete features,
    /// 2 decimals otherwise).
    ///
    /// Features without a profile pass through rounded to 2 decimals —
    /// identity fallback, never an error.
    pub fn to_readable(&self, zscore: f64, feature: &str) -> f64 {
        let Some(profile) = self.profile(feature) else {
            return round2(zscore);
        };

        let readable = profile.mean + zscore * profile.std;
        let clamped = readable.clamp(profile.min, profile.max);

        if profile.discrete {
            clamped.round()
        } else {
            round2(clamped)
        }
    }

    /// Convert a readable value to a z-score: `(x - mean) / std`.
    /// Identity fallback for features without a profile.
    pub fn to_zscore(&self, readable: f64, feature: &str) -> f64 {
        match self.profile(feature) {
            Some(profile) => (readable - profile.mean) / profile.std,
            None => readable,
        }
    }

    /// Convert a full centroid (z-scores, in the schema's cluster order) to
    /// a readable field → value mapping.
    pub fn centroid_to_readable(
        &self,
        centroid: &[f64],
    ) -> Result<BTreeMap<String, f64>, FeatureError> {
        let order = self.schema.cluster_order();
        if centroid.len() != order.len() {
            return Err(FeatureError::Arity {
                expected: order.len(),
                got: centroid.len(),
            });
        }

        Ok(order
            .iter()
            .zip(centroid)
            .map(|(name, z)| ((*name).to_string(), self.to_readable(*z, name)))
            .collect())
    }

    /// Convert every entry of a readable feature set to z-scores. Keys
    /// without a profile pass through unchanged; all keys are preserved.
    pub fn vector_to_zscore(&self, features: &FeatureSet) -> FeatureSet {
        features
            .iter()
            .map(|(name, value)| (name, self.to_zscore(value, name)))
            .collect()
    }
}
