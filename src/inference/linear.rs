//! Linear regression inferer backed by exported coefficients.

use serde::{Deserialize, Serialize};

use super::{InferenceError, PerformanceInferer};

/// Linear model: `intercept + coefficients · features`.
///
/// Coefficients are exported from the training pipeline in the schema's
/// performance field order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LinearModel {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
        }
    }

    pub fn input_dim(&self) -> usize {
        self.coefficients.len()
    }
}

impl PerformanceInferer for LinearModel {
    fn predict(&self, features: &[f64]) -> Result<f64, InferenceError> {
        if features.len() != self.coefficients.len() {
            return Err(InferenceError::DimensionMismatch {
                expected: self.coefficients.len(),
                got: features.len(),
            });
        }

        let dot: f64 = self
            .coefficients
            .iter()
            .zip(features)
            .map(|(c, x)| c * x)
            .sum();
        Ok(self.intercept + dot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predict_dot_product() {
        let model = LinearModel::new(vec![1.0, 2.0, 0.5], 0.25);
        assert_eq!(model.input_dim(), 3);
        let pred = model.predict(&[1.0, 1.0, 2.0]).unwrap();
        assert!((pred - 4.25).abs() < 1e-12);
    }

    #[test]
    fn test_predict_rejects_wrong_dimension() {
        let model = LinearModel::new(vec![1.0, 2.0], 0.0);
        let err = model.predict(&[1.0]).unwrap_err();
        assert!(matches!(
            err,
            InferenceError::DimensionMismatch { expected: 2, got: 1 }
        ));
    }
}
