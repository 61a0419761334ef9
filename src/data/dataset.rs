//! Validated training data.

use ndarray::{Array1, ArrayView1, ArrayView2};

use crate::error::{PrivError, Result};

/// Minimum number of training records accepted by [`Dataset::new`].
pub const MIN_SAMPLES: usize = 2;

/// Borrowed, validated binary classification dataset.
///
/// Features are sample-major: shape `[n_samples, n_features]`, one row per
/// record. Labels are `0` or `1`, one per row.
///
/// # Invariants
///
/// - at least [`MIN_SAMPLES`] rows and at least one feature
/// - every feature value is finite
/// - labels are in `{0, 1}` and both classes occur
#[derive(Debug, Clone, Copy)]
pub struct Dataset<'a> {
    features: ArrayView2<'a, f64>,
    labels: ArrayView1<'a, u8>,
}

impl<'a> Dataset<'a> {
    /// Validate and wrap features and labels.
    ///
    /// # Errors
    ///
    /// Returns [`PrivError::InvalidInput`] if any invariant above is violated.
    pub fn new(features: ArrayView2<'a, f64>, labels: ArrayView1<'a, u8>) -> Result<Self> {
        let (n_samples, n_features) = features.dim();

        if labels.len() != n_samples {
            return Err(PrivError::invalid(format!(
                "features have {} rows but {} labels were given",
                n_samples,
                labels.len()
            )));
        }
        if n_samples < MIN_SAMPLES {
            return Err(PrivError::invalid(format!(
                "at least {MIN_SAMPLES} samples are required, got {n_samples}"
            )));
        }
        check_features(features, None)?;

        if let Some(bad) = labels.iter().find(|&&label| label > 1) {
            return Err(PrivError::invalid(format!(
                "labels must be 0 or 1, found {bad}"
            )));
        }
        let positives = labels.iter().filter(|&&label| label == 1).count();
        if positives == 0 || positives == n_samples {
            return Err(PrivError::invalid(
                "both classes must be present in the labels",
            ));
        }

        debug_assert!(n_features >= 1);
        Ok(Self { features, labels })
    }

    /// Number of records.
    #[inline]
    pub fn n_samples(&self) -> usize {
        self.features.nrows()
    }

    /// Number of features per record.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    /// Feature matrix `[n_samples, n_features]`.
    #[inline]
    pub fn features(&self) -> ArrayView2<'a, f64> {
        self.features
    }

    /// Labels in `{0, 1}`.
    #[inline]
    pub fn labels(&self) -> ArrayView1<'a, u8> {
        self.labels
    }

    /// Labels mapped to `{-1.0, +1.0}`.
    pub fn signed_labels(&self) -> Array1<f64> {
        self.labels
            .mapv(|label| if label == 1 { 1.0 } else { -1.0 })
    }
}

/// Check a feature matrix used for fitting or prediction.
///
/// When `expected_features` is given, the column count must match it.
pub fn check_features(
    features: ArrayView2<'_, f64>,
    expected_features: Option<usize>,
) -> Result<()> {
    let n_features = features.ncols();
    if n_features == 0 {
        return Err(PrivError::invalid("at least one feature is required"));
    }
    if let Some(expected) = expected_features {
        if expected != n_features {
            return Err(PrivError::invalid(format!(
                "expected {expected} features, got {n_features}"
            )));
        }
    }
    if let Some(((row, col), value)) = features.indexed_iter().find(|(_, v)| !v.is_finite()) {
        return Err(PrivError::invalid(format!(
            "feature [{row}, {col}] is not finite: {value}"
        )));
    }
    Ok(())
}
