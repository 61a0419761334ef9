//! Error types for privlearn.
//!
//! Every failure carries an [`ErrorKind`] so callers can branch on the
//! category without matching message text. For example, a caller can retry
//! with a larger `lambda` on [`ErrorKind::PrivacyBudgetExhausted`] but treat
//! [`ErrorKind::NotFitted`] as a bug.

use thiserror::Error;

/// Result type for privlearn operations.
pub type Result<T> = std::result::Result<T, PrivError>;

/// Category of a [`PrivError`] or [`FitWarning`](crate::model::FitWarning).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed data or parameters, rejected before any computation.
    InvalidInput,
    /// Regularization does not dominate sensitivity for the requested budget.
    PrivacyBudgetExhausted,
    /// The optimizer stopped before reaching the tolerance.
    OptimizationNonConvergence,
    /// Prediction was requested before a successful fit.
    NotFitted,
}

/// privlearn error types.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PrivError {
    /// Malformed shapes, labels, or hyperparameters.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The effective budget after regularization slack is not positive.
    #[error(
        "privacy budget exhausted: epsilon={epsilon} leaves epsilon'={epsilon_prime} <= 0; \
         increase lambda, increase epsilon, or provide more data"
    )]
    PrivacyBudgetExhausted { epsilon: f64, epsilon_prime: f64 },

    /// The optimizer hit its iteration limit or stalled.
    #[error(
        "optimization did not converge after {iterations} iterations \
         (gradient norm {gradient_norm:e})"
    )]
    OptimizationNonConvergence { iterations: usize, gradient_norm: f64 },

    /// Prediction before `fit`.
    #[error("estimator is not fitted; call `fit` first")]
    NotFitted,
}

impl PrivError {
    /// Shorthand for [`PrivError::InvalidInput`].
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// The category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::PrivacyBudgetExhausted { .. } => ErrorKind::PrivacyBudgetExhausted,
            Self::OptimizationNonConvergence { .. } => ErrorKind::OptimizationNonConvergence,
            Self::NotFitted => ErrorKind::NotFitted,
        }
    }

    /// Whether the caller can retry with adjusted parameters.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::PrivacyBudgetExhausted | ErrorKind::OptimizationNonConvergence
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_distinguishable() {
        let exhausted = PrivError::PrivacyBudgetExhausted {
            epsilon: 0.1,
            epsilon_prime: -0.2,
        };
        let stalled = PrivError::OptimizationNonConvergence {
            iterations: 3,
            gradient_norm: 0.5,
        };

        assert_eq!(exhausted.kind(), ErrorKind::PrivacyBudgetExhausted);
        assert_eq!(stalled.kind(), ErrorKind::OptimizationNonConvergence);
        assert_ne!(exhausted.kind(), stalled.kind());
        assert!(exhausted.is_retryable());
        assert!(!PrivError::NotFitted.is_retryable());
        assert!(!PrivError::invalid("x").is_retryable());
    }

    #[test]
    fn display_mentions_remedy() {
        let err = PrivError::PrivacyBudgetExhausted {
            epsilon: 0.5,
            epsilon_prime: -1.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("increase lambda"));
        assert!(msg.contains("epsilon=0.5"));
    }
}
