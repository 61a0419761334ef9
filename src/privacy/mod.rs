//! Differential-privacy primitives for objective perturbation.
//!
//! - [`PrivacyBudget`]: the pure-ε budget of a fit
//! - [`SensitivityCalibrator`]: checks that regularization dominates the
//!   per-record sensitivity and derives the noise scale
//! - [`NoiseGenerator`]: draws the rotationally-invariant noise vector

mod calibration;
mod noise;

pub use calibration::{Calibration, SensitivityCalibrator, LOGISTIC_CURVATURE};
pub use noise::{NoiseGenerator, NoiseVector};

use serde::{Deserialize, Serialize};

use crate::error::{PrivError, Result};

/// Pure (ε, 0) differential-privacy budget.
///
/// Smaller ε means more noise and a stronger guarantee.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrivacyBudget {
    epsilon: f64,
}

impl PrivacyBudget {
    /// Create a budget.
    ///
    /// # Errors
    ///
    /// [`PrivError::InvalidInput`] unless `epsilon` is finite and positive.
    pub fn new(epsilon: f64) -> Result<Self> {
        if !(epsilon.is_finite() && epsilon > 0.0) {
            return Err(PrivError::invalid(format!(
                "epsilon must be finite and > 0, got {epsilon}"
            )));
        }
        Ok(Self { epsilon })
    }

    /// Privacy loss bound ε.
    #[inline]
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Failure probability δ. Always zero for the pure variant.
    #[inline]
    pub fn delta(&self) -> f64 {
        0.0
    }
}
