//! Noise vectors for objective perturbation.
//!
//! The noise density over `ℝ^d` is `∝ exp(−‖v‖ / b)`. It factors into a
//! direction uniform on the unit sphere and a norm following
//! `Gamma(shape = d, scale = b)`, so `E‖v‖ = d·b`.

use ndarray::{Array1, ArrayView1};
use rand::Rng;
use rand_distr::{Distribution, Gamma, StandardNormal};

use crate::error::{PrivError, Result};

/// Sampler for the objective perturbation noise vector.
#[derive(Debug, Clone)]
pub struct NoiseGenerator {
    dimension: usize,
    scale: f64,
    norm_distribution: Gamma<f64>,
}

impl NoiseGenerator {
    /// Create a generator for `dimension`-dimensional noise with norm scale `scale`.
    ///
    /// # Errors
    ///
    /// [`PrivError::InvalidInput`] if `dimension == 0` or `scale` is not
    /// finite and positive.
    pub fn new(dimension: usize, scale: f64) -> Result<Self> {
        if dimension == 0 {
            return Err(PrivError::invalid("noise dimension must be >= 1"));
        }
        if !(scale.is_finite() && scale > 0.0) {
            return Err(PrivError::invalid(format!(
                "noise scale must be finite and > 0, got {scale}"
            )));
        }
        let norm_distribution = Gamma::new(dimension as f64, scale)
            .map_err(|err| PrivError::invalid(format!("noise norm distribution: {err}")))?;

        Ok(Self {
            dimension,
            scale,
            norm_distribution,
        })
    }

    /// Dimension of the drawn vectors.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Scale `b` of the norm distribution.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Expected norm of a draw, `d·b`.
    pub fn expected_norm(&self) -> f64 {
        self.dimension as f64 * self.scale
    }

    /// Draw one noise vector.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> NoiseVector {
        let mut direction = self.sample_direction(rng);
        let norm = self.norm_distribution.sample(rng);
        direction *= norm;
        NoiseVector(direction)
    }

    /// Uniform direction on the unit sphere via a normalized Gaussian draw.
    fn sample_direction<R: Rng + ?Sized>(&self, rng: &mut R) -> Array1<f64> {
        loop {
            let gaussian: Array1<f64> =
                Array1::from_shape_fn(self.dimension, |_| StandardNormal.sample(rng));
            let length = gaussian.dot(&gaussian).sqrt();
            // All-zero draws have probability zero but cannot be normalized.
            if length > 0.0 {
                return gaussian / length;
            }
        }
    }
}

/// A single noise draw.
///
/// Consumed by the perturbed objective and dropped after fitting; fitted
/// models never retain it.
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseVector(Array1<f64>);

impl NoiseVector {
    /// Dimension of the vector.
    pub fn dim(&self) -> usize {
        self.0.len()
    }

    /// L2 norm of the vector.
    pub fn norm(&self) -> f64 {
        self.0.dot(&self.0).sqrt()
    }

    /// Borrow the components.
    pub fn view(&self) -> ArrayView1<'_, f64> {
        self.0.view()
    }

    /// Take ownership of the components.
    pub fn into_inner(self) -> Array1<f64> {
        self.0
    }
}
