//! High-level model API.
//!
//! - [`LogisticRegressionConfig`]: validated hyperparameters
//! - [`LogisticRegression`]: estimator with `fit` / `predict`
//! - [`FittedModel`]: released, serializable parameters

mod config;
mod fitted;
mod logistic;

pub use config::{LogisticRegressionConfig, LogisticRegressionConfigBuilder};
pub use fitted::{FitOutcome, FitWarning, FittedModel};
pub use logistic::{FitState, LogisticRegression};
