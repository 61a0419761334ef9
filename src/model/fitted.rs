//! Fitted model and fit outcomes.

use std::fmt;

use ndarray::{Array1, ArrayView1, ArrayView2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::LogisticRegressionConfig;
use crate::data::{check_features, Dataset};
use crate::error::{ErrorKind, PrivError, Result};
use crate::privacy::Calibration;
use crate::training::{sigmoid, Convergence, ObjectivePerturbation, PerturbedFit};

// =============================================================================
// FitWarning / FitOutcome
// =============================================================================

/// Recoverable condition raised by a successful fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FitWarning {
    /// The optimizer stopped early; the returned model is the best iterate.
    OptimizationNonConvergence { iterations: usize, gradient_norm: f64 },
}

impl FitWarning {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::OptimizationNonConvergence { .. } => ErrorKind::OptimizationNonConvergence,
        }
    }

    /// The equivalent error, for callers that treat warnings as failures.
    pub fn into_error(self) -> PrivError {
        match self {
            Self::OptimizationNonConvergence {
                iterations,
                gradient_norm,
            } => PrivError::OptimizationNonConvergence {
                iterations,
                gradient_norm,
            },
        }
    }
}

impl fmt::Display for FitWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.into_error(), f)
    }
}

/// Summary of a successful fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOutcome {
    pub convergence: Convergence,
    pub warning: Option<FitWarning>,
}

impl FitOutcome {
    pub(crate) fn from_convergence(convergence: Convergence) -> Self {
        let warning = (!convergence.converged()).then_some(FitWarning::OptimizationNonConvergence {
            iterations: convergence.iterations,
            gradient_norm: convergence.gradient_norm,
        });
        Self {
            convergence,
            warning,
        }
    }

    /// Whether the fit finished without warnings.
    pub fn is_clean(&self) -> bool {
        self.warning.is_none()
    }

    /// Turn a warning into an error.
    pub fn into_result(self) -> Result<Convergence> {
        match self.warning {
            Some(warning) => Err(warning.into_error()),
            None => Ok(self.convergence),
        }
    }
}

// =============================================================================
// FittedModel
// =============================================================================

/// Released parameters of a private logistic regression.
///
/// Everything stored here is covered by the fit's ε guarantee, so the model
/// can be published and serialized freely. The noise vector is not stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedModel {
    coefficients: Array1<f64>,
    intercept: f64,
    calibration: Calibration,
    convergence: Convergence,
}

impl FittedModel {
    /// Fit a model without a facade.
    ///
    /// # Errors
    ///
    /// See [`LogisticRegression::fit_with_rng`](super::LogisticRegression::fit_with_rng).
    pub fn fit_with_rng<'a, R: Rng + ?Sized>(
        features: ArrayView2<'a, f64>,
        labels: ArrayView1<'a, u8>,
        config: &LogisticRegressionConfig,
        rng: &mut R,
    ) -> Result<(Self, FitOutcome)> {
        config.validate()?;
        let budget = config.budget()?;
        let dataset = Dataset::new(features, labels)?;

        let fit = ObjectivePerturbation::new(config.to_perturbation_params())
            .fit(&dataset, budget, rng)?;
        let outcome = FitOutcome::from_convergence(fit.convergence);
        Ok((Self::from(fit), outcome))
    }

    #[inline]
    pub fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    #[inline]
    pub fn coefficients(&self) -> ArrayView1<'_, f64> {
        self.coefficients.view()
    }

    #[inline]
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Privacy parameters the model was released under.
    #[inline]
    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    #[inline]
    pub fn convergence(&self) -> &Convergence {
        &self.convergence
    }

    /// Raw scores `w·x + b`, one per row.
    pub fn decision_function(&self, features: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        check_features(features, Some(self.n_features()))?;
        Ok(features.dot(&self.coefficients) + self.intercept)
    }

    /// Class labels: `1` where the score is positive, else `0`.
    pub fn predict(&self, features: ArrayView2<'_, f64>) -> Result<Array1<u8>> {
        Ok(self
            .decision_function(features)?
            .mapv(|score| u8::from(score > 0.0)))
    }

    /// Probability of class `1`.
    ///
    /// Post-processing of the private scores; consumes no additional budget.
    pub fn predict_proba(&self, features: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        Ok(self.decision_function(features)?.mapv(sigmoid))
    }
}

impl From<PerturbedFit> for FittedModel {
    fn from(fit: PerturbedFit) -> Self {
        Self {
            coefficients: fit.coefficients,
            intercept: fit.intercept,
            calibration: fit.calibration,
            convergence: fit.convergence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::Termination;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn make_model() -> FittedModel {
        // score = 2*x0 - x1 + 0.5
        FittedModel {
            coefficients: array![2.0, -1.0],
            intercept: 0.5,
            calibration: Calibration {
                epsilon: 1.0,
                epsilon_prime: 0.9,
                noise_scale: 2.2,
                data_norm: 1.0,
            },
            convergence: Convergence {
                termination: Termination::Converged,
                iterations: 5,
                gradient_norm: 1e-6,
            },
        }
    }

    #[test]
    fn decision_function_is_affine() {
        let model = make_model();
        let x = array![[1.0, 0.0], [0.0, 1.0], [0.0, 0.0]];
        let scores = model.decision_function(x.view()).unwrap();
        assert_eq!(scores, array![2.5, -0.5, 0.5]);
    }

    #[test]
    fn predict_thresholds_at_zero() {
        let model = make_model();
        let x = array![[1.0, 0.0], [0.0, 1.0], [-0.25, 0.0]];
        // scores: 2.5, -0.5, 0.0
        assert_eq!(model.predict(x.view()).unwrap(), array![1u8, 0, 0]);
    }

    #[test]
    fn proba_is_sigmoid_of_score() {
        let model = make_model();
        let x = array![[1.0, 0.0], [0.0, 1.0]];
        let proba = model.predict_proba(x.view()).unwrap();
        assert_relative_eq!(proba[0], 1.0 / (1.0 + (-2.5_f64).exp()), epsilon = 1e-12);
        assert_relative_eq!(proba[1], 1.0 / (1.0 + 0.5_f64.exp()), epsilon = 1e-12);
    }

    #[test]
    fn rejects_wrong_width() {
        let model = make_model();
        let x = array![[1.0, 2.0, 3.0]];
        let err = model.predict(x.view()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn outcome_from_non_convergence() {
        let outcome = FitOutcome::from_convergence(Convergence {
            termination: Termination::MaxIterations,
            iterations: 1,
            gradient_norm: 0.3,
        });
        assert!(!outcome.is_clean());
        let warning = outcome.warning.unwrap();
        assert_eq!(warning.kind(), ErrorKind::OptimizationNonConvergence);
        assert!(warning.to_string().contains("did not converge"));
        assert_eq!(
            outcome.into_result().unwrap_err().kind(),
            ErrorKind::OptimizationNonConvergence
        );
    }

    #[test]
    fn outcome_from_convergence_is_clean() {
        let outcome = FitOutcome::from_convergence(*make_model().convergence());
        assert!(outcome.is_clean());
        assert!(outcome.into_result().unwrap().converged());
    }
}
