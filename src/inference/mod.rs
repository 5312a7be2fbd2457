//! Opaque model-inference collaborators.
//!
//! The insight core treats the performance model, the clustering model, and
//! the scaler as black-box functions (vector in, scalar/vector out). This
//! module defines the trait seams, the artifact-backed implementations, and
//! the [`ModelRegistry`] that owns all of them for the life of the process.

mod artifacts;
mod kmeans;
mod linear;
mod scaler;

pub use artifacts::{ArtifactBundle, ArtifactError};
pub use kmeans::KMeansModel;
pub use linear::LinearModel;
pub use scaler::StandardScaler;

use std::collections::BTreeMap;

use thiserror::Error;

use crate::types::SchemaVersion;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("input dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("model has no learned clusters")]
    EmptyModel,
}

// ============================================================================
// Collaborator traits
// ============================================================================

/// Regression inferer: ordered feature vector → performance score.
pub trait PerformanceInferer: Send + Sync {
    fn predict(&self, features: &[f64]) -> Result<f64, InferenceError>;
}

/// Cluster-assignment inferer with access to its learned centroids.
pub trait ClusterInferer: Send + Sync {
    /// Assign a scaled feature vector to the nearest cluster.
    fn assign(&self, scaled: &[f64]) -> Result<usize, InferenceError>;

    /// Learned centroids, one per cluster, in the schema's cluster order.
    fn centroids(&self) -> &[Vec<f64>];
}

/// Feature scaler matching the clustering model's training pipeline.
pub trait FeatureScaler: Send + Sync {
    fn scale(&self, features: &[f64]) -> Result<Vec<f64>, InferenceError>;
}

// ============================================================================
// Model Registry
// ============================================================================

/// Process-wide immutable registry of loaded models and the persona mapping.
///
/// Built exactly once at startup (fail-fast on any artifact problem) and
/// shared as `Arc<ModelRegistry>` — safe for unbounded concurrent reads.
pub struct ModelRegistry {
    schema: SchemaVersion,
    performance: Box<dyn PerformanceInferer>,
    clusterer: Box<dyn ClusterInferer>,
    scaler: Box<dyn FeatureScaler>,
    /// Stringified cluster id → persona label, as shipped in the mapping
    /// artifact.
    personas: BTreeMap<String, String>,
}

impl ModelRegistry {
    pub fn new(
        schema: SchemaVersion,
        performance: Box<dyn PerformanceInferer>,
        clusterer: Box<dyn ClusterInferer>,
        scaler: Box<dyn FeatureScaler>,
        personas: BTreeMap<String, String>,
    ) -> Self {
        Self {
            schema,
            performance,
            clusterer,
            scaler,
            personas,
        }
    }

    /// Build a registry from a loaded artifact bundle.
    pub fn from_artifacts(bundle: ArtifactBundle) -> Self {
        bundle.into_registry()
    }

    /// Deterministic built-in models for the given schema.
    ///
    /// Used by tests and by `--builtin-models` runs where no artifact
    /// directory is available. Three clusters, linear scorer, identity-ish
    /// scaler — enough to exercise every pipeline path.
    pub fn builtin(schema: SchemaVersion) -> Self {
        let (coefficients, intercept, centroids, scaler_mean, scaler_std) = match schema {
            SchemaVersion::Behavioral4 => (
                vec![0.02, 1.5, 0.015, 0.3, 0.1, 0.03],
                1.0,
                vec![
                    vec![0.4, 0.9, 0.6, -0.4],
                    vec![-1.1, 0.2, -0.8, 0.3],
                    vec![0.7, -1.0, 1.1, 0.8],
                ],
                vec![20.0, 0.7, 25.0, 0.3],
                vec![8.0, 0.15, 10.0, 0.2],
            ),
            SchemaVersion::Behavioral5 => (
                vec![1.8, 0.02, -0.25, 0.3, -0.2, 0.1, 0.03],
                1.2,
                vec![
                    vec![0.5, 0.3, -1.2, -0.4, -0.6],
                    vec![1.1, -1.0, 0.4, 0.2, 0.3],
                    vec![-0.9, 0.9, 0.8, 0.7, 1.0],
                ],
                vec![0.0; 5],
                vec![1.0; 5],
            ),
        };

        let personas: BTreeMap<String, String> = [
            ("0", "The Consistent"),
            ("1", "The Sprinter"),
            ("2", "The Warrior"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self::new(
            schema,
            Box::new(LinearModel::new(coefficients, intercept)),
            Box::new(KMeansModel::new(centroids)),
            Box::new(StandardScaler::new(scaler_mean, scaler_std)),
            personas,
        )
    }

    pub fn schema(&self) -> SchemaVersion {
        self.schema
    }

    pub fn performance(&self) -> &dyn PerformanceInferer {
        self.performance.as_ref()
    }

    pub fn clusterer(&self) -> &dyn ClusterInferer {
        self.clusterer.as_ref()
    }

    pub fn scaler(&self) -> &dyn FeatureScaler {
        self.scaler.as_ref()
    }

    pub fn persona_count(&self) -> usize {
        self.personas.len()
    }

    /// Persona label for prediction paths ("Unknown Persona" fallback).
    pub fn persona_label(&self, cluster_id: usize) -> String {
        self.personas
            .get(&cluster_id.to_string())
            .cloned()
            .unwrap_or_else(|| "Unknown Persona".to_string())
    }

    /// Persona label for sample/benchmark paths ("Unknown" fallback).
    ///
    /// The two fallback strings are both part of the wire contract and are
    /// kept distinct on purpose.
    pub fn persona_label_or_unknown(&self, cluster_id: usize) -> String {
        self.personas
            .get(&cluster_id.to_string())
            .cloned()
            .unwrap_or_else(|| "Unknown".to_string())
    }
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("schema", &self.schema)
            .field("personas", &self.personas)
            .field("clusters", &self.clusterer.centroids().len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry_dimensions() {
        for schema in [SchemaVersion::Behavioral4, SchemaVersion::Behavioral5] {
            let registry = ModelRegistry::builtin(schema);
            let dim = schema.cluster_order().len();
            for centroid in registry.clusterer().centroids() {
                assert_eq!(centroid.len(), dim);
            }
            let perf_input = vec![0.5; schema.performance_order().len()];
            assert!(registry.performance().predict(&perf_input).is_ok());
        }
    }

    #[test]
    fn test_persona_fallbacks() {
        let registry = ModelRegistry::builtin(SchemaVersion::Behavioral5);
        assert_eq!(registry.persona_label(0), "The Consistent");
        assert_eq!(registry.persona_label(99), "Unknown Persona");
        assert_eq!(registry.persona_label_or_unknown(99), "Unknown");
    }

    #[test]
    fn test_scaled_pipeline_assigns_a_cluster() {
        let registry = ModelRegistry::builtin(SchemaVersion::Behavioral5);
        let scaled = registry.scaler().scale(&[0.0, 0.0, 0.0, 0.0, 0.0]).unwrap();
        let cluster = registry.clusterer().assign(&scaled).unwrap();
        assert!(cluster < registry.clusterer().centroids().len());
    }
}
