//! Standard scaler matching the clustering model's training pipeline.

use serde::{Deserialize, Serialize};

use super::{FeatureScaler, InferenceError};

/// Per-column standardization: `(x - mean) / std` with a floor on std.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    std: Vec<f64>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, std: Vec<f64>) -> Self {
        Self { mean, std }
    }

    pub fn input_dim(&self) -> usize {
        self.mean.len()
    }
}

impl FeatureScaler for StandardScaler {
    fn scale(&self, features: &[f64]) -> Result<Vec<f64>, InferenceError> {
        if features.len() != self.mean.len() {
            return Err(InferenceError::DimensionMismatch {
                expected: self.mean.len(),
                got: features.len(),
            });
        }

        Ok(features
            .iter()
            .zip(self.mean.iter().zip(&self.std))
            .map(|(x, (mean, std))| (x - mean) / std.max(1e-8))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_standardizes_columns() {
        let scaler = StandardScaler::new(vec![10.0, 0.0], vec![2.0, 1.0]);
        assert_eq!(scaler.input_dim(), 2);
        let scaled = scaler.scale(&[14.0, -3.0]).unwrap();
        assert_eq!(scaled, vec![2.0, -3.0]);
    }

    #[test]
    fn test_scale_floors_zero_std() {
        let scaler = StandardScaler::new(vec![1.0], vec![0.0]);
        let scaled = scaler.scale(&[1.0]).unwrap();
        assert_eq!(scaled, vec![0.0]);
    }

    #[test]
    fn test_scale_rejects_wrong_dimension() {
        let scaler = StandardScaler::new(vec![0.0, 0.0], vec![1.0, 1.0]);
        assert!(matches!(
            scaler.scale(&[1.0]).unwrap_err(),
            InferenceError::DimensionMismatch { expected: 2, got: 1 }
        ));
    }
}
