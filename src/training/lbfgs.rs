//! Limited-memory BFGS with backtracking line search.
//!
//! Minimizes any [`DifferentiableObjective`]. Convergence is declared when the
//! largest absolute gradient component drops to `tol`. Every accepted step
//! satisfies the Armijo sufficient-decrease condition, so the current iterate
//! is always the best one seen and is returned as-is when the iteration
//! budget runs out.

use std::collections::VecDeque;

use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

use super::logger::TrainingLogger;
use super::objective::DifferentiableObjective;

// ============================================================================
// LbfgsParams
// ============================================================================

/// Parameters for [`Lbfgs`].
#[derive(Debug, Clone, PartialEq)]
pub struct LbfgsParams {
    /// Maximum number of iterations.
    pub max_iter: usize,
    /// Stop once `‖∇J‖∞ <= tol`.
    pub tol: f64,
    /// Number of correction pairs kept.
    pub memory: usize,
    /// Armijo sufficient-decrease constant.
    pub armijo: f64,
    /// Maximum step halvings per line search.
    pub max_line_search: usize,
}

impl Default for LbfgsParams {
    fn default() -> Self {
        Self {
            max_iter: 100,
            tol: 1e-4,
            memory: 10,
            armijo: 1e-4,
            max_line_search: 60,
        }
    }
}

// ============================================================================
// Results
// ============================================================================

/// Why the optimizer stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// Gradient norm reached the tolerance.
    Converged,
    /// Iteration budget exhausted.
    MaxIterations,
    /// No step length gave sufficient decrease.
    LineSearchFailed,
}

/// Serializable convergence summary of a fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Convergence {
    pub termination: Termination,
    pub iterations: usize,
    /// `‖∇J‖∞` at the returned solution.
    pub gradient_norm: f64,
}

impl Convergence {
    #[inline]
    pub fn converged(&self) -> bool {
        self.termination == Termination::Converged
    }
}

/// Solution returned by [`Lbfgs::minimize`].
#[derive(Debug, Clone)]
pub struct OptimizeResult {
    pub solution: Array1<f64>,
    pub value: f64,
    pub convergence: Convergence,
}

// ============================================================================
// Lbfgs
// ============================================================================

struct Correction {
    s: Array1<f64>,
    y: Array1<f64>,
    rho: f64,
}

/// L-BFGS minimizer.
#[derive(Debug, Clone, Default)]
pub struct Lbfgs {
    params: LbfgsParams,
}

#[inline]
fn inf_norm(v: ArrayView1<'_, f64>) -> f64 {
    v.fold(0.0_f64, |acc, &x| acc.max(x.abs()))
}

impl Lbfgs {
    pub fn new(params: LbfgsParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &LbfgsParams {
        &self.params
    }

    /// Minimize `objective` starting from `x0`.
    pub fn minimize<O: DifferentiableObjective + ?Sized>(
        &self,
        objective: &O,
        x0: Array1<f64>,
        logger: &TrainingLogger,
    ) -> OptimizeResult {
        debug_assert_eq!(x0.len(), objective.dim());

        let mut x = x0;
        let (mut value, mut gradient) = objective.value_and_gradient(x.view());
        let mut history: VecDeque<Correction> = VecDeque::with_capacity(self.params.memory);

        let mut termination = Termination::MaxIterations;
        let mut iterations = 0;

        if inf_norm(gradient.view()) <= self.params.tol {
            termination = Termination::Converged;
        }

        while termination != Termination::Converged && iterations < self.params.max_iter {
            iterations += 1;

            let mut direction = two_loop_direction(&history, gradient.view());
            let mut slope = gradient.dot(&direction);
            if slope.is_nan() || slope >= 0.0 {
                // Curvature pairs went stale; restart from steepest descent.
                history.clear();
                direction = -&gradient;
                slope = -gradient.dot(&gradient);
            }

            // First step has no curvature information to scale it.
            let mut step = if history.is_empty() {
                (1.0 / inf_norm(gradient.view())).min(1.0)
            } else {
                1.0
            };

            let mut accepted = None;
            for _ in 0..self.params.max_line_search {
                let candidate = &x + &(&direction * step);
                let (candidate_value, candidate_gradient) =
                    objective.value_and_gradient(candidate.view());
                if candidate_value.is_finite()
                    && candidate_value <= value + self.params.armijo * step * slope
                {
                    accepted = Some((candidate, candidate_value, candidate_gradient));
                    break;
                }
                step *= 0.5;
            }

            let Some((next_x, next_value, next_gradient)) = accepted else {
                termination = Termination::LineSearchFailed;
                break;
            };

            let s = &next_x - &x;
            let y = &next_gradient - &gradient;
            let sy = s.dot(&y);
            if sy > 1e-12 * y.dot(&y).max(f64::MIN_POSITIVE) {
                if history.len() == self.params.memory {
                    history.pop_front();
                }
                history.push_back(Correction { s, y, rho: 1.0 / sy });
            }

            x = next_x;
            value = next_value;
            gradient = next_gradient;

            let gradient_norm = inf_norm(gradient.view());
            logger.log_iteration(iterations, value, gradient_norm, step);
            if gradient_norm <= self.params.tol {
                termination = Termination::Converged;
            }
        }

        let gradient_norm = inf_norm(gradient.view());
        OptimizeResult {
            solution: x,
            value,
            convergence: Convergence {
                termination,
                iterations,
                gradient_norm,
            },
        }
    }
}

/// Two-loop recursion: approximate `−H⁻¹·g` from the correction history.
fn two_loop_direction(
    history: &VecDeque<Correction>,
    gradient: ArrayView1<'_, f64>,
) -> Array1<f64> {
    let mut q = gradient.to_owned();
    let mut alphas = Vec::with_capacity(history.len());

    for correction in history.iter().rev() {
        let alpha = correction.rho * correction.s.dot(&q);
        q.scaled_add(-alpha, &correction.y);
        alphas.push(alpha);
    }

    if let Some(last) = history.back() {
        let gamma = last.s.dot(&last.y) / last.y.dot(&last.y);
        q *= gamma;
    }

    for (correction, alpha) in history.iter().zip(alphas.into_iter().rev()) {
        let beta = correction.rho * correction.y.dot(&q);
        q.scaled_add(alpha - beta, &correction.s);
    }

    -q
}
