//! Sensitivity calibration for objective perturbation.
//!
//! For an L2-regularized loss whose second derivative is bounded by `c`,
//! trained on `n` records of norm at most `R` with regularization `λ`,
//! objective perturbation spends part of the budget on the slack between
//! regularization and sensitivity:
//!
//! ```text
//! ε′ = ε − ln(1 + 2·c·R / (n·λ))
//! ```
//!
//! What remains sets the noise density `∝ exp(−ε′·‖v‖ / (2R))`, i.e. a noise
//! norm with scale `b = 2·R / ε′`. If `ε′ ≤ 0` no noise scale is valid and
//! calibration fails with [`PrivError::PrivacyBudgetExhausted`].

use serde::{Deserialize, Serialize};

use super::PrivacyBudget;
use crate::error::{PrivError, Result};

/// Curvature bound of the logistic loss: `σ(z)·(1 − σ(z)) ≤ 1/4`.
pub const LOGISTIC_CURVATURE: f64 = 0.25;

/// Outcome of a successful calibration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    /// Requested budget ε.
    pub epsilon: f64,
    /// Effective budget ε′ left for the noise term (always > 0).
    pub epsilon_prime: f64,
    /// Scale `b` of the Gamma-distributed noise norm.
    pub noise_scale: f64,
    /// Data-norm bound `R` the calibration assumed.
    pub data_norm: f64,
}

/// Computes ε′ and the noise scale for a loss with bounded curvature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensitivityCalibrator {
    curvature: f64,
}

impl Default for SensitivityCalibrator {
    fn default() -> Self {
        Self::logistic()
    }
}

impl SensitivityCalibrator {
    /// Calibrator for a loss with second derivative bounded by `curvature`.
    pub fn new(curvature: f64) -> Self {
        debug_assert!(curvature > 0.0 && curvature.is_finite());
        Self { curvature }
    }

    /// Calibrator for the logistic loss.
    pub fn logistic() -> Self {
        Self::new(LOGISTIC_CURVATURE)
    }

    /// Curvature bound `c`.
    pub fn curvature(&self) -> f64 {
        self.curvature
    }

    /// Effective budget ε′, which may be zero or negative.
    ///
    /// `lambda == 0` yields `-∞`: without regularization no budget is left.
    pub fn effective_epsilon(
        &self,
        budget: PrivacyBudget,
        data_norm: f64,
        lambda: f64,
        n_samples: usize,
    ) -> f64 {
        if lambda <= 0.0 {
            return f64::NEG_INFINITY;
        }
        let slack = 2.0 * self.curvature * data_norm / (n_samples as f64 * lambda);
        budget.epsilon() - slack.ln_1p()
    }

    /// Calibrate the noise scale.
    ///
    /// # Errors
    ///
    /// - [`PrivError::InvalidInput`] if `data_norm` is not finite and positive,
    ///   `lambda` is negative or not finite, or `n_samples` is zero
    /// - [`PrivError::PrivacyBudgetExhausted`] if `ε′ ≤ 0`
    pub fn calibrate(
        &self,
        budget: PrivacyBudget,
        data_norm: f64,
        lambda: f64,
        n_samples: usize,
    ) -> Result<Calibration> {
        if !(data_norm.is_finite() && data_norm > 0.0) {
            return Err(PrivError::invalid(format!(
                "data_norm must be finite and > 0, got {data_norm}"
            )));
        }
        if !(lambda.is_finite() && lambda >= 0.0) {
            return Err(PrivError::invalid(format!(
                "lambda must be finite and >= 0, got {lambda}"
            )));
        }
        if n_samples == 0 {
            return Err(PrivError::invalid("cannot calibrate for zero samples"));
        }

        let epsilon_prime = self.effective_epsilon(budget, data_norm, lambda, n_samples);
        if epsilon_prime.is_nan() || epsilon_prime <= 0.0 {
            tracing::debug!(
                epsilon = budget.epsilon(),
                epsilon_prime,
                lambda,
                data_norm,
                n_samples,
                "privacy budget exhausted"
            );
            return Err(PrivError::PrivacyBudgetExhausted {
                epsilon: budget.epsilon(),
                epsilon_prime,
            });
        }

        let noise_scale = 2.0 * data_norm / epsilon_prime;
        tracing::debug!(
            epsilon = budget.epsilon(),
            epsilon_prime,
            noise_scale,
            data_norm,
            "calibrated objective perturbation"
        );

        Ok(Calibration {
            epsilon: budget.epsilon(),
            epsilon_prime,
            noise_scale,
            data_norm,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use approx::assert_relative_eq;

    fn budget(epsilon: f64) -> PrivacyBudget {
        PrivacyBudget::new(epsilon).unwrap()
    }

    #[test]
    fn matches_closed_form() {
        let cal = SensitivityCalibrator::logistic()
            .calibrate(budget(1.0), 1.0, 0.5, 100)
            .unwrap();

        // slack = 2 * 0.25 * 1 / (100 * 0.5) = 0.01
        let expected = 1.0 - 0.01_f64.ln_1p();
        assert_relative_eq!(cal.epsilon_prime, expected, epsilon = 1e-12);
        assert_relative_eq!(cal.noise_scale, 2.0 / expected, epsilon = 1e-12);
        assert_eq!(cal.epsilon, 1.0);
    }

    #[test]
    fn noise_scale_grows_with_data_norm() {
        let calibrator = SensitivityCalibrator::logistic();
        let small = calibrator.calibrate(budget(1.0), 1.0, 1.0, 50).unwrap();
        let large = calibrator.calibrate(budget(1.0), 4.0, 1.0, 50).unwrap();
        assert!(large.noise_scale > small.noise_scale);
    }

    #[test]
    fn zero_lambda_is_exhausted() {
        let err = SensitivityCalibrator::logistic()
            .calibrate(budget(10.0), 1.0, 0.0, 1000)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PrivacyBudgetExhausted);
    }

    #[test]
    fn exactly_zero_epsilon_prime_is_exhausted() {
        // Pick lambda so that ln(1 + slack) == epsilon exactly:
        // slack = e - 1 with c = 0.25, R = 1, n = 1 => lambda = 0.5 / (e - 1).
        let calibrator = SensitivityCalibrator::logistic();
        let lambda = 0.5 / (1.0_f64.exp() - 1.0);
        let eps_prime = calibrator.effective_epsilon(budget(1.0), 1.0, lambda, 1);
        assert!(eps_prime.abs() < 1e-12);

        // Nudging lambda down must fail, nudging it up must succeed.
        assert!(calibrator.calibrate(budget(1.0), 1.0, lambda * 0.999, 1).is_err());
        assert!(calibrator.calibrate(budget(1.0), 1.0, lambda * 1.001, 1).is_ok());
    }

    #[test]
    fn rejects_bad_arguments() {
        let calibrator = SensitivityCalibrator::logistic();
        let cases = [(0.0, 1.0, 10), (f64::NAN, 1.0, 10), (1.0, -1.0, 10), (1.0, 1.0, 0)];
        for (norm, lambda, n) in cases {
            let err = calibrator.calibrate(budget(1.0), norm, lambda, n).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput);
        }
    }
}
