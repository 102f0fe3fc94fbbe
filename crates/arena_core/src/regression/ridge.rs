use serde::{Deserialize, Serialize};

use super::linalg::{dot, gram_matrix, solve_linear_system, transpose_mul_vec};
use crate::error::{ArenaError, Result};

pub const DEFAULT_ALPHA: f64 = 1e-3;

/// Closed-form ridge regression fitted with the normal equations.
///
/// Model: `y ≈ w0 + w1*x1 + ... + wd*xd`. The L2 penalty `alpha` applies to
/// every weight except the intercept `w0`. There is no iterative solver; each
/// `fit` solves `(XᵀX + αI')w = Xᵀy` from scratch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RidgeRegressor {
    alpha: f64,
    /// `[intercept, w1..wd]`, present only after a successful fit
    coef: Option<Vec<f64>>,
}

impl Default for RidgeRegressor {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHA)
    }
}

impl RidgeRegressor {
    pub fn new(alpha: f64) -> Self {
        Self { alpha, coef: None }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn is_fitted(&self) -> bool {
        self.coef.is_some()
    }

    pub fn coefficients(&self) -> Option<&[f64]> {
        self.coef.as_deref()
    }

    /// Fit on `features` (one row per observation) against `targets`.
    ///
    /// Fails on an empty or ragged design matrix, a target count that does not
    /// match the row count, or a singular system. On failure the previously
    /// fitted coefficients, if any, are left untouched.
    pub fn fit<R: AsRef<[f64]>>(&mut self, features: &[R], targets: &[f64]) -> Result<()> {
        let first = features.first().ok_or(ArenaError::EmptyFeatures)?;
        let width = first.as_ref().len();
        if let Some((row, found)) = features
            .iter()
            .map(|r| r.as_ref().len())
            .enumerate()
            .find(|&(_, len)| len != width)
        {
            return Err(ArenaError::RaggedFeatures {
                row,
                expected: width,
                found,
            });
        }
        if targets.len() != features.len() {
            return Err(ArenaError::TargetCountMismatch {
                rows: features.len(),
                targets: targets.len(),
            });
        }

        // Intercept column
        let augmented: Vec<Vec<f64>> = features
            .iter()
            .map(|row| {
                let mut extended = Vec::with_capacity(width + 1);
                extended.push(1.0);
                extended.extend_from_slice(row.as_ref());
                extended
            })
            .collect();

        let mut xtx = gram_matrix(&augmented);
        for (i, row) in xtx.iter_mut().enumerate().skip(1) {
            row[i] += self.alpha;
        }
        let xty = transpose_mul_vec(&augmented, targets);

        self.coef = Some(solve_linear_system(&xtx, &xty)?);
        Ok(())
    }

    pub fn predict(&self, features: &[f64]) -> Result<f64> {
        let coef = self.coef.as_ref().ok_or(ArenaError::NotFitted)?;
        if features.len() + 1 != coef.len() {
            return Err(ArenaError::FeatureLengthMismatch {
                expected: coef.len() - 1,
                found: features.len(),
            });
        }
        Ok(coef[0] + dot(&coef[1..], features))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recovers_linear_relationship() {
        let xs: Vec<[f64; 1]> = (0..10).map(|i| [i as f64]).collect();
        let ys: Vec<f64> = xs.iter().map(|x| 2.0 * x[0] + 3.0).collect();

        let mut model = RidgeRegressor::new(0.0);
        model.fit(&xs, &ys).unwrap();

        let coef = model.coefficients().unwrap();
        assert!((coef[0] - 3.0).abs() < 1e-9, "intercept {}", coef[0]);
        assert!((coef[1] - 2.0).abs() < 1e-9, "slope {}", coef[1]);
        assert!((model.predict(&[20.0]).unwrap() - 43.0).abs() < 1e-8);
    }

    #[test]
    fn test_small_alpha_stays_close() {
        let xs: Vec<Vec<f64>> = (0..20).map(|i| vec![i as f64 * 0.5]).collect();
        let ys: Vec<f64> = xs.iter().map(|x| 2.0 * x[0] + 3.0).collect();

        let mut model = RidgeRegressor::new(1e-6);
        model.fit(&xs, &ys).unwrap();
        let coef = model.coefficients().unwrap();
        assert!((coef[0] - 3.0).abs() < 1e-4);
        assert!((coef[1] - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_intercept_is_not_penalised() {
        // Constant target: a huge alpha shrinks the slope to ~0 but the
        // intercept must still carry the mean.
        let xs: Vec<[f64; 1]> = (0..8).map(|i| [i as f64]).collect();
        let ys = vec![5.0; 8];

        let mut model = RidgeRegressor::new(1e6);
        model.fit(&xs, &ys).unwrap();
        let coef = model.coefficients().unwrap();
        assert!((coef[0] - 5.0).abs() < 1e-6);
        assert!(coef[1].abs() < 1e-6);
    }

    #[test]
    fn test_shape_errors() {
        let mut model = RidgeRegressor::default();

        let empty: Vec<Vec<f64>> = Vec::new();
        assert_eq!(model.fit(&empty, &[]), Err(ArenaError::EmptyFeatures));

        let ragged = vec![vec![1.0, 2.0], vec![3.0]];
        let err = model.fit(&ragged, &[1.0, 2.0]).unwrap_err();
        assert!(err.is_shape_error());
        assert!(matches!(err, ArenaError::RaggedFeatures { row: 1, expected: 2, found: 1 }));

        let rows = vec![vec![1.0], vec![2.0]];
        assert!(matches!(
            model.fit(&rows, &[1.0]),
            Err(ArenaError::TargetCountMismatch { rows: 2, targets: 1 })
        ));
        assert!(!model.is_fitted());
    }

    #[test]
    fn test_predict_before_fit() {
        let model = RidgeRegressor::default();
        assert_eq!(model.predict(&[1.0, 2.0]), Err(ArenaError::NotFitted));
    }

    #[test]
    fn test_predict_length_mismatch() {
        let mut model = RidgeRegressor::new(1e-2);
        let xs = vec![[1.0, 2.0], [2.0, 1.0], [3.0, 5.0]];
        model.fit(&xs, &[1.0, 2.0, 3.0]).unwrap();
        assert!(matches!(
            model.predict(&[1.0]),
            Err(ArenaError::FeatureLengthMismatch { expected: 2, found: 1 })
        ));
    }

    #[test]
    fn test_singular_without_regularisation() {
        // Duplicate column and no penalty: XᵀX is rank deficient.
        let xs = vec![[1.0, 1.0], [2.0, 2.0], [3.0, 3.0]];
        let mut model = RidgeRegressor::new(0.0);
        let err = model.fit(&xs, &[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(err, ArenaError::SingularMatrix { .. }));

        // The same data is solvable once the weights are penalised.
        let mut ridge = RidgeRegressor::new(1e-2);
        ridge.fit(&xs, &[1.0, 2.0, 3.0]).unwrap();
        assert!(ridge.is_fitted());
    }

    #[test]
    fn test_failed_refit_keeps_previous_model() {
        let mut model = RidgeRegressor::new(0.0);
        model.fit(&[[0.0], [1.0], [2.0]], &[1.0, 3.0, 5.0]).unwrap();
        let before = model.coefficients().unwrap().to_vec();

        let singular = [[1.0, 1.0], [2.0, 2.0], [3.0, 3.0]];
        assert!(model.fit(&singular, &[1.0, 2.0, 3.0]).is_err());
        assert_eq!(model.coefficients().unwrap(), before.as_slice());
    }
}
