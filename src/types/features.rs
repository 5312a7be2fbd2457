//! Feature schemas and the validated feature-vector type.
//!
//! Two behavioral schema generations coexist in production. Each
//! [`SchemaVersion`] carries its own ordered field lists; the normalization
//! profile tables in `crate::normalize` are keyed by the same enum so a
//! profile table can never be mixed with the wrong order list.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Schema versions
// ============================================================================

/// Performance-model input order for the 4-signal schema (6 fields).
const PERFORMANCE_ORDER_V1: [&str; 6] = [
    "avg_minutes_per_module",
    "consistency_score",
    "total_activities",
    "weekend_ratio",
    "study_time_category",
    "total_active_days",
];

/// Clustering-model input order for the 4-signal schema.
const CLUSTER_ORDER_V1: [&str; 4] = [
    "avg_minutes_per_module",
    "consistency_score",
    "total_activities",
    "weekend_ratio",
];

/// Performance-model input order for the 5-signal schema (7 fields).
const PERFORMANCE_ORDER_V2: [&str; 7] = [
    "completion_velocity",
    "avg_minutes_per_module",
    "login_gap_std",
    "weekend_ratio",
    "night_study_ratio",
    "study_time_category",
    "total_active_days",
];

/// Clustering-model input order for the 5-signal schema.
const CLUSTER_ORDER_V2: [&str; 5] = [
    "completion_velocity",
    "avg_minutes_per_module",
    "login_gap_std",
    "weekend_ratio",
    "night_study_ratio",
];

/// Behavioral feature schema generation.
///
/// The two generations differ in their clustering signal set and in whether
/// the clustering model expects z-scored input (`Behavioral5`) or readable
/// input scaled externally (`Behavioral4`). The active version is chosen at
/// startup and never inferred from field-name overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVersion {
    /// 4-signal schema: minutes, consistency, activity count, weekend ratio.
    #[serde(rename = "v1")]
    Behavioral4,
    /// 5-signal schema: velocity, minutes, login gap, weekend, night ratio.
    #[serde(rename = "v2")]
    Behavioral5,
}

impl SchemaVersion {
    /// Short wire/config identifier ("v1" / "v2").
    pub fn id(self) -> &'static str {
        match self {
            Self::Behavioral4 => "v1",
            Self::Behavioral5 => "v2",
        }
    }

    /// Field order the performance model was trained with.
    pub fn performance_order(self) -> &'static [&'static str] {
        match self {
            Self::Behavioral4 => &PERFORMANCE_ORDER_V1,
            Self::Behavioral5 => &PERFORMANCE_ORDER_V2,
        }
    }

    /// Field order the clustering model and scaler were trained with.
    pub fn cluster_order(self) -> &'static [&'static str] {
        match self {
            Self::Behavioral4 => &CLUSTER_ORDER_V1,
            Self::Behavioral5 => &CLUSTER_ORDER_V2,
        }
    }

    /// Whether clustering input must be converted to z-scores before the
    /// external scaler runs. The v2 clustering model was trained on
    /// standardized signals; the v1 scaler was fitted on readable values.
    pub fn prenormalize_clustering(self) -> bool {
        matches!(self, Self::Behavioral5)
    }

    /// Whether the schema carries a night-study signal (5-signal only).
    pub fn has_night_signal(self) -> bool {
        matches!(self, Self::Behavioral5)
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::Behavioral5
    }
}

impl std::fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for SchemaVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "v1" | "behavioral4" => Ok(Self::Behavioral4),
            "v2" | "behavioral5" => Ok(Self::Behavioral5),
            other => Err(format!("unknown schema version '{other}' (expected v1 or v2)")),
        }
    }
}

// ============================================================================
// Feature vectors
// ============================================================================

/// Validation errors for client-supplied feature vectors.
#[derive(Error, Debug)]
pub enum FeatureError {
    #[error("missing required fields: {0:?}")]
    MissingFields(Vec<String>),

    #[error("non-finite values for fields: {0:?}")]
    NotFinite(Vec<String>),

    #[error("expected {expected} values, got {got}")]
    Arity { expected: usize, got: usize },
}

/// A named numeric feature vector.
///
/// Wire representation is a flat JSON object of field → float. Validation
/// against the active schema happens at the API boundary; inside the core a
/// missing signal reads as 0.0 rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureSet(BTreeMap<String, f64>);

impl FeatureSet {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.0.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    /// Read a signal with the missing-defaults-to-zero policy.
    pub fn signal(&self, name: &str) -> f64 {
        self.get(name).unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Assemble the model-input vector in the given field order.
    ///
    /// This is the feature-order contract: the caller passes the order list
    /// the model was trained with, never an ad-hoc ordering.
    pub fn ordered(&self, order: &[&str]) -> Vec<f64> {
        order.iter().map(|name| self.signal(name)).collect()
    }

    /// Validate completeness and finiteness against a required field list.
    ///
    /// Unknown extra fields are tolerated; missing or non-finite required
    /// fields are a client input error.
    pub fn validate(&self, required: &[&str]) -> Result<(), FeatureError> {
        let missing: Vec<String> = required
            .iter()
            .filter(|name| !self.0.contains_key(**name))
            .map(|name| (*name).to_string())
            .collect();
        if !missing.is_empty() {
            return Err(FeatureError::MissingFields(missing));
        }

        let non_finite: Vec<String> = required
            .iter()
            .filter(|name| self.get(name).is_some_and(|v| !v.is_finite()))
            .map(|name| (*name).to_string())
            .collect();
        if !non_finite.is_empty() {
            return Err(FeatureError::NotFinite(non_finite));
        }

        Ok(())
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for FeatureSet {
    fn from_iter<T: IntoIterator<Item = (S, f64)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
