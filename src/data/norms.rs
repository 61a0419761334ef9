//! Row norms and data-norm clipping.
//!
//! The privacy guarantee holds only if every record has L2 norm at most the
//! data-norm bound used for calibration. Records above the bound are scaled
//! down onto the bound before training.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

/// L2 norm of one row, scaled by its largest magnitude so that squaring
/// cannot overflow.
fn l2_norm(row: ArrayView1<'_, f64>) -> f64 {
    let largest = row.fold(0.0_f64, |acc, &x| acc.max(x.abs()));
    if largest == 0.0 || !largest.is_finite() {
        return largest;
    }
    let sum = row.fold(0.0, |acc, &x| {
        let r = x / largest;
        acc + r * r
    });
    largest * sum.sqrt()
}

/// L2 norm of each row.
pub fn row_norms(features: ArrayView2<'_, f64>) -> Array1<f64> {
    features.map_axis(Axis(1), l2_norm)
}

/// Largest row norm, or `0.0` for an empty matrix.
pub fn max_row_norm(features: ArrayView2<'_, f64>) -> f64 {
    row_norms(features).fold(0.0_f64, |acc, &norm| acc.max(norm))
}

/// Copy `features`, scaling every row with norm above `bound` onto the bound.
///
/// Returns the clipped matrix and the number of rows that were scaled.
pub fn clip_rows(features: ArrayView2<'_, f64>, bound: f64) -> (Array2<f64>, usize) {
    debug_assert!(bound > 0.0);

    let mut clipped = features.to_owned();
    let mut n_clipped = 0;
    for mut row in clipped.rows_mut() {
        let norm = l2_norm(row.view());
        if norm > bound {
            row.mapv_inplace(|x| x / norm * bound);
            n_clipped += 1;
        }
    }
    (clipped, n_clipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn norms_per_row() {
        let x = array![[3.0, 4.0], [0.0, 0.0], [1.0, 0.0]];
        assert_eq!(row_norms(x.view()), array![5.0, 0.0, 1.0]);
        assert_eq!(max_row_norm(x.view()), 5.0);
    }

    #[test]
    fn clipping_only_touches_large_rows() {
        let x = array![[3.0, 4.0], [0.6, 0.8]];
        let (clipped, n) = clip_rows(x.view(), 1.0);

        assert_eq!(n, 1);
        assert_relative_eq!(clipped[[0, 0]], 0.6, epsilon = 1e-12);
        assert_relative_eq!(clipped[[0, 1]], 0.8, epsilon = 1e-12);
        assert_eq!(clipped.row(1), x.row(1));
        assert!(max_row_norm(clipped.view()) <= 1.0 + 1e-12);
    }

    #[test]
    fn huge_values_do_not_overflow() {
        let x = array![[1e200, 1e200], [3e-200, 4e-200]];
        let norms = row_norms(x.view());
        assert_relative_eq!(norms[0], 1e200 * 2.0_f64.sqrt(), max_relative = 1e-12);
        assert_relative_eq!(norms[1], 5e-200, max_relative = 1e-12);
    }

    #[test]
    fn huge_rows_are_projected_onto_the_bound() {
        let x = array![[1e200], [0.5]];
        let (clipped, n) = clip_rows(x.view(), 2.0);

        assert_eq!(n, 1);
        assert_relative_eq!(clipped[[0, 0]], 2.0, epsilon = 1e-12);
        assert_eq!(clipped[[1, 0]], 0.5);
    }
}
