//! K-means cluster assignment over exported centroids.

use serde::{Deserialize, Serialize};

use super::{ClusterInferer, InferenceError};

/// Cluster inferer: nearest learned centroid by squared Euclidean distance.
///
/// Centroids live in the scaled feature space the model was trained in, one
/// row per cluster, columns in the schema's cluster order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KMeansModel {
    centroids: Vec<Vec<f64>>,
}

impl KMeansModel {
    pub fn new(centroids: Vec<Vec<f64>>) -> Self {
        Self { centroids }
    }

    pub fn cluster_count(&self) -> usize {
        self.centroids.len()
    }

    fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
        a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
    }
}

impl ClusterInferer for KMeansModel {
    fn assign(&self, scaled: &[f64]) -> Result<usize, InferenceError> {
        if self.centroids.is_empty() {
            return Err(InferenceError::EmptyModel);
        }
        let dim = self.centroids[0].len();
        if scaled.len() != dim {
            return Err(InferenceError::DimensionMismatch {
                expected: dim,
                got: scaled.len(),
            });
        }

        let mut best = 0;
        let mut best_dist = f64::INFINITY;
        for (id, centroid) in self.centroids.iter().enumerate() {
            let dist = Self::squared_distance(scaled, centroid);
            if dist < best_dist {
                best = id;
                best_dist = dist;
            }
        }
        Ok(best)
    }

    fn centroids(&self) -> &[Vec<f64>] {
        &self.centroids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_nearest_centroid() {
        let model = KMeansModel::new(vec![vec![0.0, 0.0], vec![10.0, 10.0], vec![-5.0, 5.0]]);
        assert_eq!(model.cluster_count(), 3);
        assert_eq!(model.assign(&[0.5, -0.5]).unwrap(), 0);
        assert_eq!(model.assign(&[9.0, 11.0]).unwrap(), 1);
        assert_eq!(model.assign(&[-4.0, 4.5]).unwrap(), 2);
    }

    #[test]
    fn test_assign_tie_prefers_lowest_id() {
        let model = KMeansModel::new(vec![vec![-1.0], vec![1.0]]);
        // Exactly equidistant — the first cluster wins via strict `<`.
        assert_eq!(model.assign(&[0.0]).unwrap(), 0);
    }

    #[test]
    fn test_assign_rejects_wrong_dimension() {
        let model = KMeansModel::new(vec![vec![0.0, 0.0]]);
        assert!(matches!(
            model.assign(&[1.0]).unwrap_err(),
            InferenceError::DimensionMismatch { expected: 2, got: 1 }
        ));
    }

    #[test]
    fn test_empty_model_is_an_error() {
        let model = KMeansModel::new(Vec::new());
        assert!(matches!(model.assign(&[]).unwrap_err(), InferenceError::EmptyModel));
    }
}
