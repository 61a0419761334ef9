//! Differentiable objectives for private training.
//!
//! - [`LogisticObjective`]: mean logistic loss plus `(λ/2)·‖θ‖²`
//! - [`PerturbedObjective`]: any objective plus the linear noise term
//!   `(1/n)·(v·θ)`
//!
//! Both are strictly convex whenever `λ > 0`, so the minimizer is unique.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::privacy::NoiseVector;

/// A smooth objective the optimizer can minimize.
pub trait DifferentiableObjective {
    /// Number of parameters.
    fn dim(&self) -> usize;

    /// Objective value and gradient at `theta`.
    fn value_and_gradient(&self, theta: ArrayView1<'_, f64>) -> (f64, Array1<f64>);

    /// Objective value at `theta`.
    fn value(&self, theta: ArrayView1<'_, f64>) -> f64 {
        self.value_and_gradient(theta).0
    }
}

/// Logistic sigmoid, stable for large `|x|`.
#[inline]
pub fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// `ln(1 + exp(-margin))` without overflow.
#[inline]
fn log1p_exp_neg(margin: f64) -> f64 {
    if margin > 0.0 {
        (-margin).exp().ln_1p()
    } else {
        -margin + margin.exp().ln_1p()
    }
}

/// Design matrix with an optional constant column for the intercept.
pub fn design_matrix(features: ArrayView2<'_, f64>, fit_intercept: bool) -> Array2<f64> {
    if !fit_intercept {
        return features.to_owned();
    }
    let (n_samples, n_features) = features.dim();
    let mut design = Array2::ones((n_samples, n_features + 1));
    design
        .slice_mut(ndarray::s![.., ..n_features])
        .assign(&features);
    design
}

// ============================================================================
// LogisticObjective
// ============================================================================

/// L2-regularized mean logistic loss.
///
/// ```text
/// J(θ) = (1/n)·Σ ln(1 + exp(−s_i·θ·x_i)) + (λ/2)·‖θ‖²
/// ```
///
/// with signed labels `s_i ∈ {−1, +1}`.
#[derive(Debug, Clone)]
pub struct LogisticObjective {
    design: Array2<f64>,
    signed_labels: Array1<f64>,
    lambda: f64,
}

impl LogisticObjective {
    /// # Panics
    ///
    /// Panics if `design` rows and `signed_labels` disagree in length.
    pub fn new(design: Array2<f64>, signed_labels: Array1<f64>, lambda: f64) -> Self {
        assert_eq!(
            design.nrows(),
            signed_labels.len(),
            "design has {} rows but {} labels",
            design.nrows(),
            signed_labels.len()
        );
        debug_assert!(signed_labels.iter().all(|&s| s == 1.0 || s == -1.0));
        Self {
            design,
            signed_labels,
            lambda,
        }
    }

    #[inline]
    pub fn n_samples(&self) -> usize {
        self.design.nrows()
    }

    #[inline]
    pub fn lambda(&self) -> f64 {
        self.lambda
    }
}

impl DifferentiableObjective for LogisticObjective {
    fn dim(&self) -> usize {
        self.design.ncols()
    }

    fn value_and_gradient(&self, theta: ArrayView1<'_, f64>) -> (f64, Array1<f64>) {
        let n = self.n_samples() as f64;
        let scores = self.design.dot(&theta);

        let mut loss = 0.0;
        // d/dz ln(1 + exp(−s·z)) = −s·σ(−s·z)
        let mut residuals = Array1::zeros(scores.len());
        for ((&z, &s), r) in scores
            .iter()
            .zip(self.signed_labels.iter())
            .zip(residuals.iter_mut())
        {
            let margin = s * z;
            loss += log1p_exp_neg(margin);
            *r = -s * sigmoid(-margin) / n;
        }

        let mut gradient = self.design.t().dot(&residuals);
        gradient.scaled_add(self.lambda, &theta);

        let value = loss / n + 0.5 * self.lambda * theta.dot(&theta);
        (value, gradient)
    }
}

// ============================================================================
// PerturbedObjective
// ============================================================================

/// Base objective plus the objective-perturbation term `(1/n)·(v·θ)`.
#[derive(Debug, Clone)]
pub struct PerturbedObjective<O> {
    base: O,
    scaled_noise: Array1<f64>,
}

impl<O: DifferentiableObjective> PerturbedObjective<O> {
    /// Consume `noise` into the objective.
    ///
    /// # Panics
    ///
    /// Panics if the noise dimension differs from the objective dimension.
    pub fn new(base: O, noise: NoiseVector, n_samples: usize) -> Self {
        assert_eq!(
            base.dim(),
            noise.dim(),
            "noise dimension {} does not match objective dimension {}",
            noise.dim(),
            base.dim()
        );
        let scaled_noise = noise.into_inner() / n_samples as f64;
        Self { base, scaled_noise }
    }

    pub fn base(&self) -> &O {
        &self.base
    }
}

impl<O: DifferentiableObjective> DifferentiableObjective for PerturbedObjective<O> {
    fn dim(&self) -> usize {
        self.base.dim()
    }

    fn value_and_gradient(&self, theta: ArrayView1<'_, f64>) -> (f64, Array1<f64>) {
        let (value, mut gradient) = self.base.value_and_gradient(theta);
        gradient += &self.scaled_noise;
        (value + self.scaled_noise.dot(&theta), gradient)
    }
}
