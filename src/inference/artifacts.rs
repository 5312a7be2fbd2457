//! Model artifact loading.
//!
//! The training pipeline exports four JSON artifacts into a directory:
//!
//! - `performance_model.json` — linear coefficients + intercept
//! - `persona_clusters.json`  — k-means centroids (scaled space)
//! - `scaler.json`            — per-column mean/std
//! - `persona_mapping.json`   — stringified cluster id → persona label
//!
//! Every dimension is checked against the active schema's order lists at
//! load time. Any failure is fatal: the process must not start serving with
//! a partial or mismatched model set.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use super::{KMeansModel, LinearModel, ModelRegistry, StandardScaler};
use crate::types::SchemaVersion;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("failed to read artifact {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse artifact {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("{artifact}: dimension {got} does not match schema {schema} (expected {expected})")]
    Dimension {
        artifact: &'static str,
        schema: SchemaVersion,
        expected: usize,
        got: usize,
    },

    #[error("{artifact}: declared feature order does not match schema {schema}")]
    OrderMismatch {
        artifact: &'static str,
        schema: SchemaVersion,
    },
}

// ============================================================================
// Artifact file shapes
// ============================================================================

#[derive(Debug, Deserialize)]
struct PerformanceModelFile {
    coefficients: Vec<f64>,
    intercept: f64,
    /// Optional declared training order; checked against the schema when
    /// present.
    #[serde(default)]
    feature_order: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ClustersFile {
    centroids: Vec<Vec<f64>>,
    #[serde(default)]
    feature_order: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ScalerFile {
    mean: Vec<f64>,
    std: Vec<f64>,
}

// ============================================================================
// Bundle
// ============================================================================

/// A fully loaded and validated set of model artifacts.
#[derive(Debug)]
pub struct ArtifactBundle {
    schema: SchemaVersion,
    performance: LinearModel,
    clusters: KMeansModel,
    scaler: StandardScaler,
    personas: BTreeMap<String, String>,
}

impl ArtifactBundle {
    /// Load and validate all artifacts from `dir` for the given schema.
    pub fn load(dir: &Path, schema: SchemaVersion) -> Result<Self, ArtifactError> {
        let performance: PerformanceModelFile = read_json(&dir.join("performance_model.json"))?;
        let clusters: ClustersFile = read_json(&dir.join("persona_clusters.json"))?;
        let scaler: ScalerFile = read_json(&dir.join("scaler.json"))?;
        let personas: BTreeMap<String, String> = read_json(&dir.join("persona_mapping.json"))?;

        let perf_dim = schema.performance_order().len();
        let cluster_dim = schema.cluster_order().len();

        if performance.coefficients.len() != perf_dim {
            return Err(ArtifactError::Dimension {
                artifact: "performance_model.json",
                schema,
                expected: perf_dim,
                got: performance.coefficients.len(),
            });
        }
        if !performance.feature_order.is_empty()
            && performance.feature_order != schema.performance_order()
        {
            return Err(ArtifactError::OrderMismatch {
                artifact: "performance_model.json",
                schema,
            });
        }

        for centroid in &clusters.centroids {
            if centroid.len() != cluster_dim {
                return Err(ArtifactError::Dimension {
                    artifact: "persona_clusters.json",
                    schema,
                    expected: cluster_dim,
                    got: centroid.len(),
                });
            }
        }
        if !clusters.feature_order.is_empty() && clusters.feature_order != schema.cluster_order() {
            return Err(ArtifactError::OrderMismatch {
                artifact: "persona_clusters.json",
                schema,
            });
        }

        if scaler.mean.len() != cluster_dim || scaler.std.len() != cluster_dim {
            return Err(ArtifactError::Dimension {
                artifact: "scaler.json",
                schema,
                expected: cluster_dim,
                got: scaler.mean.len().min(scaler.std.len()),
            });
        }

        info!(
            schema = %schema,
            clusters = clusters.centroids.len(),
            personas = personas.len(),
            "Model artifacts loaded from {}",
            dir.display()
        );

        Ok(Self {
            schema,
            performance: LinearModel::new(performance.coefficients, performance.intercept),
            clusters: KMeansModel::new(clusters.centroids),
            scaler: StandardScaler::new(scaler.mean, scaler.std),
            personas,
        })
    }

    /// Consume the bundle into a ready-to-serve registry.
    pub fn into_registry(self) -> ModelRegistry {
        ModelRegistry::new(
            self.schema,
            Box::new(self.performance),
            Box::new(self.clusters),
            Box::new(self.scaler),
            self.personas,
        )
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ArtifactError::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::{ClusterInferer, PerformanceInferer};

    fn write_valid_artifacts(dir: &Path) {
        std::fs::write(
            dir.join("performance_model.json"),
            serde_json::json!({
                "coefficients": [1.8, 0.02, -0.25, 0.3, -0.2, 0.1, 0.03],
                "intercept": 1.2,
                "feature_order": SchemaVersion::Behavioral5.performance_order(),
            })
            .to_string(),
        )
        .unwrap();

        std::fs::write(
            dir.join("persona_clusters.json"),
            serde_json::json!({
                "centroids": [
                    [0.5, 0.3, -1.2, -0.4, -0.6],
                    [1.1, -1.0, 0.4, 0.2, 0.3],
                    [-0.9, 0.9, 0.8, 0.7, 1.0]
                ]
            })
            .to_string(),
        )
        .unwrap();

        std::fs::write(
            dir.join("scaler.json"),
            serde_json::json!({"mean": [0.0, 0.0, 0.0, 0.0, 0.0], "std": [1.0, 1.0, 1.0, 1.0, 1.0]})
                .to_string(),
        )
        .unwrap();

        std::fs::write(
            dir.join("persona_mapping.json"),
            serde_json::json!({"0": "The Consistent", "1": "The Sprinter", "2": "The Warrior"})
                .to_string(),
        )
        .unwrap();
    }

    #[test]
    fn test_load_valid_bundle() {
        let dir = tempfile::tempdir().unwrap();
        write_valid_artifacts(dir.path());

        let bundle = ArtifactBundle::load(dir.path(), SchemaVersion::Behavioral5).unwrap();
        let registry = bundle.into_registry();

        assert_eq!(registry.persona_count(), 3);
        assert_eq!(registry.clusterer().centroids().len(), 3);
        let pred = registry
            .performance()
            .predict(&[0.75, 20.0, 2.5, 0.3, 0.25, 2.0, 15.0])
            .unwrap();
        assert!(pred.is_finite());
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = ArtifactBundle::load(dir.path(), SchemaVersion::Behavioral5).unwrap_err();
        assert!(matches!(err, ArtifactError::Io { .. }));
    }

    #[test]
    fn test_centroid_dimension_mismatch_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_valid_artifacts(dir.path());
        // Overwrite with 4-dim centroids against the 5-signal schema.
        std::fs::write(
            dir.path().join("persona_clusters.json"),
            serde_json::json!({"centroids": [[0.1, 0.2, 0.3, 0.4]]}).to_string(),
        )
        .unwrap();

        let err = ArtifactBundle::load(dir.path(), SchemaVersion::Behavioral5).unwrap_err();
        assert!(matches!(
            err,
            ArtifactError::Dimension {
                artifact: "persona_clusters.json",
                expected: 5,
                got: 4,
                ..
            }
        ));
    }

    #[test]
    fn test_declared_order_mismatch_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_valid_artifacts(dir.path());
        std::fs::write(
            dir.path().join("performance_model.json"),
            serde_json::json!({
                "coefficients": [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
                "intercept": 0.0,
                "feature_order": ["wrong", "order", "a", "b", "c", "d", "e"],
            })
            .to_string(),
        )
        .unwrap();

        let err = ArtifactBundle::load(dir.path(), SchemaVersion::Behavioral5).unwrap_err();
        assert!(matches!(err, ArtifactError::OrderMismatch { .. }));
    }

    #[test]
    fn test_malformed_json_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_valid_artifacts(dir.path());
        std::fs::write(dir.path().join("scaler.json"), "{not json").unwrap();

        let err = ArtifactBundle::load(dir.path(), SchemaVersion::Behavioral5).unwrap_err();
        assert!(matches!(err, ArtifactError::Json { .. }));
    }
}
