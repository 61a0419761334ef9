//! Testing utilities for privlearn.
//!
//! Seeded datasets shared by unit tests, integration tests and benches.
//!
//! ```
//! use privlearn::testing::threshold_1d;
//!
//! let (x, y) = threshold_1d();
//! assert_eq!(x.nrows(), y.len());
//! ```

use ndarray::{Array1, Array2};
use rand::Rng;

use crate::random::rng_from_seed;

// =============================================================================
// Fixed datasets
// =============================================================================

const THRESHOLD_X: [f64; 20] = [
    0.50, 0.75, 1.00, 1.25, 1.50, 1.75, 1.75, 2.00, 2.25, 2.50, 2.75, 3.00, 3.25, 3.50, 4.00, 4.25,
    4.50, 4.75, 5.00, 5.50,
];
const THRESHOLD_Y: [u8; 20] = [0, 0, 0, 0, 0, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 1, 1, 1, 1, 1];

/// One feature, twenty records: mostly `0` below ~2.5 and `1` above, with an
/// overlapping band in between.
pub fn threshold_1d() -> (Array2<f64>, Array1<u8>) {
    let features = Array2::from_shape_fn((THRESHOLD_X.len(), 1), |(i, _)| THRESHOLD_X[i]);
    (features, Array1::from(THRESHOLD_Y.to_vec()))
}

// =============================================================================
// Synthetic datasets
// =============================================================================

/// Random linearly-separable binary data with optional label noise.
///
/// Features are uniform in `[-1, 1]`. A random weight vector (also uniform in
/// `[-1, 1]`, no bias) labels each row; each label is then flipped with
/// probability `flip_rate`. Both classes are always present.
///
/// Returns `(features, labels, weights)`.
pub fn synthetic_binary(
    n_samples: usize,
    n_features: usize,
    seed: u64,
    flip_rate: f64,
) -> (Array2<f64>, Array1<u8>, Array1<f64>) {
    assert!(n_samples >= 2, "need at least two samples");
    assert!((0.0..=1.0).contains(&flip_rate));
    let mut rng = rng_from_seed(seed);

    let weights = Array1::from_shape_fn(n_features, |_| rng.gen_range(-1.0..=1.0));
    let features = Array2::from_shape_fn((n_samples, n_features), |_| rng.gen_range(-1.0..=1.0));

    let mut labels = features.dot(&weights).mapv(|score| u8::from(score > 0.0));
    for label in labels.iter_mut() {
        if rng.gen_bool(flip_rate) {
            *label = 1 - *label;
        }
    }

    if labels.iter().all(|&l| l == labels[0]) {
        labels[0] = 1 - labels[0];
    }

    (features, labels, weights)
}
