//! Objective perturbation trainer.
//!
//! Fits an L2-regularized logistic regression whose released parameters are
//! ε-differentially private:
//!
//! 1. resolve the data-norm bound `R`
//! 2. calibrate ε′ and the noise scale, failing if regularization is too weak
//! 3. clip every record to `R` and draw one noise vector `v`
//! 4. minimize `J(θ) = (1/n)·Σ loss + (λ/2)·‖θ‖² + (1/n)·(v·θ)`
//!
//! # Intercept
//!
//! With `fit_intercept`, each record is augmented with a constant `1` and the
//! intercept is the last entry of `θ`. It is regularized, perturbed and
//! accounted for like every other coefficient: calibration uses the augmented
//! bound `√(R² + 1)`, so the intercept is covered by the same ε.

use ndarray::{s, Array1};
use rand::Rng;

use super::lbfgs::{Convergence, Lbfgs, LbfgsParams};
use super::logger::{TrainingLogger, Verbosity};
use super::objective::{design_matrix, LogisticObjective, PerturbedObjective};
use crate::data::{clip_rows, max_row_norm, Dataset};
use crate::error::{PrivError, Result};
use crate::privacy::{Calibration, NoiseGenerator, PrivacyBudget, SensitivityCalibrator};

// ============================================================================
// PerturbationParams
// ============================================================================

/// Parameters for [`ObjectivePerturbation`].
#[derive(Clone, Debug, PartialEq)]
pub struct PerturbationParams {
    /// L2 regularization strength λ. Must be > 0 for a fit to succeed.
    pub lambda: f64,

    /// Bound on record L2 norms. `None` reads it off the training data,
    /// which leaks privacy and is logged as a warning.
    pub data_norm: Option<f64>,

    /// Fit an intercept by augmenting records with a constant feature.
    pub fit_intercept: bool,

    /// Optimizer iteration limit.
    pub max_iter: usize,

    /// Optimizer tolerance on `‖∇J‖∞`.
    pub tol: f64,

    pub verbosity: Verbosity,
}

impl Default for PerturbationParams {
    fn default() -> Self {
        Self {
            lambda: 1.0,
            data_norm: None,
            fit_intercept: true,
            max_iter: 100,
            tol: 1e-4,
            verbosity: Verbosity::default(),
        }
    }
}

/// Parameters released by a private fit.
#[derive(Clone, Debug)]
pub struct PerturbedFit {
    /// Feature coefficients, length `n_features`.
    pub coefficients: Array1<f64>,
    /// Intercept (`0.0` without `fit_intercept`).
    pub intercept: f64,
    pub calibration: Calibration,
    pub convergence: Convergence,
}

// ============================================================================
// ObjectivePerturbation
// ============================================================================

/// Differentially-private logistic regression trainer.
#[derive(Clone, Debug)]
pub struct ObjectivePerturbation {
    calibrator: SensitivityCalibrator,
    params: PerturbationParams,
}

impl ObjectivePerturbation {
    pub fn new(params: PerturbationParams) -> Self {
        Self {
            calibrator: SensitivityCalibrator::logistic(),
            params,
        }
    }

    pub fn params(&self) -> &PerturbationParams {
        &self.params
    }

    /// Bound used for calibration, including the intercept's constant feature.
    fn calibration_norm(&self, data_norm: f64) -> f64 {
        if self.params.fit_intercept {
            data_norm.hypot(1.0)
        } else {
            data_norm
        }
    }

    /// Train on `dataset` under `budget`, drawing noise from `rng`.
    ///
    /// Non-convergence is not an error: the best iterate is returned and
    /// flagged in [`PerturbedFit::convergence`].
    ///
    /// # Errors
    ///
    /// - [`PrivError::InvalidInput`] for an invalid data norm or
    ///   regularization, including a norm of zero read off all-zero records
    /// - [`PrivError::PrivacyBudgetExhausted`]
    ///   if regularization does not dominate sensitivity
    pub fn fit<R: Rng + ?Sized>(
        &self,
        dataset: &Dataset<'_>,
        budget: PrivacyBudget,
        rng: &mut R,
    ) -> Result<PerturbedFit> {
        let mut logger = TrainingLogger::new(self.params.verbosity);
        let n_samples = dataset.n_samples();
        let n_features = dataset.n_features();

        let data_norm = match self.params.data_norm {
            Some(norm) => norm,
            None => {
                let norm = max_row_norm(dataset.features());
                logger.warn_data_norm_leak(norm);
                norm
            }
        };
        // With an intercept, calibration sees √(R² + 1) and would accept R = 0.
        if !(data_norm.is_finite() && data_norm > 0.0) {
            return Err(PrivError::invalid(format!(
                "data norm bound must be finite and > 0, got {data_norm}; \
                 records with zero norm need an explicit data_norm"
            )));
        }

        // Exhausted budgets fail before any copy of the data is made.
        let calibration = self.calibrator.calibrate(
            budget,
            self.calibration_norm(data_norm),
            self.params.lambda,
            n_samples,
        )?;

        let (features, n_clipped) = clip_rows(dataset.features(), data_norm);
        logger.log_clipping(n_clipped, data_norm);

        let design = design_matrix(features.view(), self.params.fit_intercept);
        let n_params = design.ncols();
        logger.start_fit(n_samples, n_params, budget.epsilon());

        let noise = NoiseGenerator::new(n_params, calibration.noise_scale)?.sample(rng);
        let objective = PerturbedObjective::new(
            LogisticObjective::new(design, dataset.signed_labels(), self.params.lambda),
            noise,
            n_samples,
        );

        let optimizer = Lbfgs::new(LbfgsParams {
            max_iter: self.params.max_iter,
            tol: self.params.tol,
            ..Default::default()
        });
        let result = optimizer.minimize(&objective, Array1::zeros(n_params), &logger);

        let convergence = result.convergence;
        if !convergence.converged() {
            logger.warn_non_convergence(convergence.iterations, convergence.gradient_norm);
        }
        logger.finish_fit(convergence.iterations, convergence.converged());

        let theta = result.solution;
        let intercept = if self.params.fit_intercept {
            theta[n_features]
        } else {
            0.0
        };

        Ok(PerturbedFit {
            coefficients: theta.slice(s![..n_features]).to_owned(),
            intercept,
            calibration,
            convergence,
        })
    }
}
