//! privlearn: differentially-private linear classifiers for Rust.
//!
//! Trains an L2-regularized logistic regression whose released coefficients
//! satisfy pure ε-differential privacy, using objective perturbation: a
//! random linear term is added to the training objective before it is
//! minimized.
//!
//! # Key Types
//!
//! - [`LogisticRegression`] - Estimator with `fit` / `predict`
//! - [`LogisticRegressionConfig`] - Configuration builder
//! - [`FittedModel`] - Released, serializable parameters
//! - [`PrivError`] / [`ErrorKind`] - Failure categories
//!
//! # Training
//!
//! ```
//! use ndarray::array;
//! use privlearn::{LogisticRegression, LogisticRegressionConfig};
//! use privlearn::random::rng_from_seed;
//!
//! let config = LogisticRegressionConfig::builder()
//!     .epsilon(1.0)
//!     .lambda(0.5)
//!     .data_norm(1.0)
//!     .build()
//!     .unwrap();
//!
//! let x = array![[-0.9], [-0.6], [-0.2], [0.3], [0.7], [0.8]];
//! let y = array![0u8, 0, 0, 1, 1, 1];
//!
//! let mut clf = LogisticRegression::new(config);
//! let outcome = clf.fit_with_rng(x.view(), y.view(), &mut rng_from_seed(42)).unwrap();
//! if let Some(warning) = outcome.warning {
//!     eprintln!("{warning}");
//! }
//! let labels = clf.predict(x.view()).unwrap();
//! assert_eq!(labels.len(), 6);
//! ```
//!
//! # Privacy
//!
//! The guarantee covers the coefficients and the intercept. It holds only
//! when `data_norm` is supplied independently of the training data; leaving
//! it unset reads the bound off the data and logs a warning.

pub mod data;
pub mod error;
pub mod model;
pub mod privacy;
pub mod random;
pub mod testing;
pub mod training;

// =============================================================================
// Convenience Re-exports
// =============================================================================

pub use error::{ErrorKind, PrivError, Result};
pub use model::{
    FitOutcome, FitState, FitWarning, FittedModel, LogisticRegression, LogisticRegressionConfig,
};
pub use privacy::{Calibration, PrivacyBudget};
pub use training::{Convergence, Termination, Verbosity};
