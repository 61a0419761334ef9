//! Verbosity-gated training logs.
//!
//! Events go through `tracing`; the [`Verbosity`] level decides which of
//! them a fit emits at all, independent of the installed subscriber.

use std::time::Instant;

use serde::{Deserialize, Serialize};

/// How much a fit reports.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Verbosity {
    /// Nothing, not even privacy warnings.
    Silent,
    /// Privacy leaks and non-convergence.
    #[default]
    Warning,
    /// Start/finish summaries.
    Info,
    /// Per-iteration optimizer state.
    Debug,
}

/// Emits structured training events at the configured verbosity.
#[derive(Debug)]
pub struct TrainingLogger {
    verbosity: Verbosity,
    started: Option<Instant>,
}

impl TrainingLogger {
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            started: None,
        }
    }

    #[inline]
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    #[inline]
    fn enabled(&self, level: Verbosity) -> bool {
        self.verbosity >= level
    }

    pub fn start_fit(&mut self, n_samples: usize, n_params: usize, epsilon: f64) {
        self.started = Some(Instant::now());
        if self.enabled(Verbosity::Info) {
            tracing::info!(n_samples, n_params, epsilon, "starting private fit");
        }
    }

    pub fn log_iteration(&self, iteration: usize, value: f64, gradient_norm: f64, step: f64) {
        if self.enabled(Verbosity::Debug) {
            tracing::debug!(iteration, value, gradient_norm, step, "lbfgs iteration");
        }
    }

    pub fn log_clipping(&self, n_clipped: usize, data_norm: f64) {
        if n_clipped > 0 && self.enabled(Verbosity::Info) {
            tracing::info!(n_clipped, data_norm, "clipped records to the data norm bound");
        }
    }

    /// The bound was read off the training data, which itself leaks privacy.
    pub fn warn_data_norm_leak(&self, data_norm: f64) {
        if self.enabled(Verbosity::Warning) {
            tracing::warn!(
                data_norm,
                "data_norm not set; using the maximum row norm of the training data, \
                 which leaks privacy. Set data_norm independently of the data."
            );
        }
    }

    pub fn warn_non_convergence(&self, iterations: usize, gradient_norm: f64) {
        if self.enabled(Verbosity::Warning) {
            tracing::warn!(
                iterations,
                gradient_norm,
                "optimizer did not converge; increase max_iter or tol"
            );
        }
    }

    pub fn finish_fit(&mut self, iterations: usize, converged: bool) {
        let elapsed_ms = self
            .started
            .take()
            .map(|start| start.elapsed().as_secs_f64() * 1e3)
            .unwrap_or(0.0);
        if self.enabled(Verbosity::Info) {
            tracing::info!(iterations, converged, elapsed_ms, "finished private fit");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_is_ordered() {
        assert!(Verbosity::Silent < Verbosity::Warning);
        assert!(Verbosity::Warning < Verbosity::Info);
        assert!(Verbosity::Info < Verbosity::Debug);
        assert_eq!(Verbosity::default(), Verbosity::Warning);
    }

    #[test]
    fn silent_logger_gates_everything() {
        let logger = TrainingLogger::new(Verbosity::Silent);
        assert!(!logger.enabled(Verbosity::Warning));
        let logger = TrainingLogger::new(Verbosity::Info);
        assert!(logger.enabled(Verbosity::Warning));
        assert!(!logger.enabled(Verbosity::Debug));
    }
}
