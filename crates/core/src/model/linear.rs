//! Ordinary least squares regressor
//!
//! Fitting is delegated to `linfa-linear`; the fitted parameters are copied
//! into a fixed-size vector so the artifact does not depend on linfa's types.

use super::Regressor;
use crate::core_types::FEATURE_COUNT;
use crate::error::TrainingError;
use linfa::traits::Fit;
use linfa::Dataset;
use linfa_linear::LinearRegression;
use nalgebra::SVector;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Linear model with intercept: `y = intercept + coefficients · x`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegressor {
    coefficients: SVector<f64, FEATURE_COUNT>,
    intercept: f64,
}

impl LinearRegressor {
    /// Fit by least squares with an intercept term.
    ///
    /// # Errors
    /// - [`TrainingError::InsufficientTrainingData`] with fewer rows than parameters
    /// - [`TrainingError::Solver`] if the solver fails (e.g. a rank deficient
    ///   design) or yields non-finite parameters
    pub fn fit(rows: &[[f64; FEATURE_COUNT]], targets: &[f64]) -> Result<Self, TrainingError> {
        let params = FEATURE_COUNT + 1;
        if rows.len() < params {
            return Err(TrainingError::InsufficientTrainingData {
                required: params,
                actual: rows.len(),
            });
        }

        let x = Array2::from_shape_fn((rows.len(), FEATURE_COUNT), |(r, c)| rows[r][c]);
        let y = Array1::from(targets.to_vec());
        let dataset = Dataset::new(x, y);

        let fitted = LinearRegression::new()
            .fit(&dataset)
            .map_err(|e| TrainingError::Solver(e.to_string()))?;

        let model = Self {
            coefficients: SVector::from_iterator(fitted.params().iter().copied()),
            intercept: fitted.intercept(),
        };
        if !model.is_well_formed() {
            return Err(TrainingError::Solver(
                "least squares produced non-finite parameters".to_string(),
            ));
        }
        Ok(model)
    }

    /// Fitted coefficients in canonical feature order
    pub fn coefficients(&self) -> [f64; FEATURE_COUNT] {
        self.coefficients.into()
    }

    /// Fitted intercept
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub(crate) fn is_well_formed(&self) -> bool {
        self.intercept.is_finite() && self.coefficients.iter().all(|c| c.is_finite())
    }
}

impl Regressor for LinearRegressor {
    fn predict_row(&self, row: &[f64; FEATURE_COUNT]) -> f64 {
        self.intercept + self.coefficients.dot(&SVector::from(*row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_recovers_exact_linear_relation() {
        // y = 0.5 + 2a - b + 0.25c, d and e vary but carry no weight
        let rows: Vec<[f64; FEATURE_COUNT]> = (0..40)
            .map(|i| {
                let i = f64::from(i);
                [i, (i * 0.7).sin(), (i * 1.3).cos(), i * i * 0.01, (i * 0.3).sin()]
            })
            .collect();
        let targets: Vec<f64> = rows
            .iter()
            .map(|r| 0.5 + 2.0 * r[0] - r[1] + 0.25 * r[2])
            .collect();

        let model = LinearRegressor::fit(&rows, &targets).unwrap();
        let coef = model.coefficients();
        assert_relative_eq!(model.intercept(), 0.5, epsilon = 1e-6);
        assert_relative_eq!(coef[0], 2.0, epsilon = 1e-6);
        assert_relative_eq!(coef[1], -1.0, epsilon = 1e-6);
        assert_relative_eq!(coef[2], 0.25, epsilon = 1e-6);
        assert_relative_eq!(coef[3], 0.0, epsilon = 1e-6);
        assert_relative_eq!(coef[4], 0.0, epsilon = 1e-6);
        assert_relative_eq!(
            model.predict_row(&[1.0, 0.0, 0.0, 5.0, 9.0]),
            2.5,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_constant_columns_are_rejected() {
        let rows = vec![[1.0, 2.0, 3.0, 4.0, 5.0]; 20];
        let targets = vec![0.3; 20];
        assert!(matches!(
            LinearRegressor::fit(&rows, &targets).unwrap_err(),
            TrainingError::Solver(_)
        ));
    }

    #[test]
    fn test_too_few_rows() {
        let rows = vec![[0.0; FEATURE_COUNT]; 3];
        assert!(matches!(
            LinearRegressor::fit(&rows, &[0.0; 3]).unwrap_err(),
            TrainingError::InsufficientTrainingData {
                required: 6,
                actual: 3
            }
        ));
    }
}
