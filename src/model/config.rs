//! Logistic regression configuration with builder pattern.
//!
//! [`LogisticRegressionConfig`] uses the `bon` crate for builder generation.
//! `epsilon` and `lambda` are required: there is no safe default for either.
//!
//! # Example
//!
//! ```
//! use privlearn::model::LogisticRegressionConfig;
//!
//! let config = LogisticRegressionConfig::builder()
//!     .epsilon(1.0)
//!     .lambda(0.1)
//!     .data_norm(5.0)
//!     .build()
//!     .unwrap();
//! assert!(config.fit_intercept);
//! ```

use bon::Builder;

use crate::error::{PrivError, Result};
use crate::privacy::PrivacyBudget;
use crate::training::{PerturbationParams, Verbosity};

/// Configuration for [`LogisticRegression`](super::LogisticRegression).
#[derive(Debug, Clone, PartialEq, Builder)]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
pub struct LogisticRegressionConfig {
    // === Privacy ===
    /// Privacy budget ε. Required, must be > 0.
    pub epsilon: f64,

    /// Bound on record L2 norms. Records above it are clipped.
    ///
    /// `None` takes the maximum row norm of the training data, which leaks
    /// privacy; a warning is logged when that happens.
    pub data_norm: Option<f64>,

    // === Model ===
    /// L2 regularization strength λ. Required, must be >= 0, and > 0 for any
    /// fit to satisfy the privacy calibration.
    pub lambda: f64,

    /// Fit an intercept. The intercept is covered by the privacy guarantee.
    /// Default: true.
    #[builder(default = true)]
    pub fit_intercept: bool,

    // === Optimizer ===
    /// Maximum optimizer iterations. Default: 100.
    #[builder(default = 100)]
    pub max_iter: usize,

    /// Convergence tolerance on the largest gradient component. Default: 1e-4.
    #[builder(default = 1e-4)]
    pub tol: f64,

    // === Logging ===
    /// Verbosity level. Default: `Warning`.
    #[builder(default)]
    pub verbosity: Verbosity,
}

/// Custom finishing function that validates the config.
impl<S: logistic_regression_config_builder::IsComplete> LogisticRegressionConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PrivError::InvalidInput`] if:
    /// - `epsilon` is not finite and > 0
    /// - `lambda` is negative or not finite
    /// - `data_norm` is set but not finite and > 0
    /// - `max_iter == 0`
    /// - `tol` is not finite and > 0
    pub fn build(self) -> Result<LogisticRegressionConfig> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl LogisticRegressionConfig {
    pub(crate) fn validate(&self) -> Result<()> {
        self.budget()?;

        if !(self.lambda.is_finite() && self.lambda >= 0.0) {
            return Err(PrivError::invalid(format!(
                "lambda must be finite and >= 0, got {}",
                self.lambda
            )));
        }
        if let Some(norm) = self.data_norm {
            if !(norm.is_finite() && norm > 0.0) {
                return Err(PrivError::invalid(format!(
                    "data_norm must be finite and > 0, got {norm}"
                )));
            }
        }
        if self.max_iter == 0 {
            return Err(PrivError::invalid("max_iter must be at least 1"));
        }
        if !(self.tol.is_finite() && self.tol > 0.0) {
            return Err(PrivError::invalid(format!(
                "tol must be finite and > 0, got {}",
                self.tol
            )));
        }
        Ok(())
    }

    /// The privacy budget described by `epsilon`.
    pub fn budget(&self) -> Result<PrivacyBudget> {
        PrivacyBudget::new(self.epsilon)
    }

    /// Convert to trainer parameters.
    pub fn to_perturbation_params(&self) -> PerturbationParams {
        PerturbationParams {
            lambda: self.lambda,
            data_norm: self.data_norm,
            fit_intercept: self.fit_intercept,
            max_iter: self.max_iter,
            tol: self.tol,
            verbosity: self.verbosity,
        }
    }
}
