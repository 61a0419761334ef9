//! Training data handling.
//!
//! - [`Dataset`]: validated, borrowed features and binary labels
//! - [`row_norms`], [`clip_rows`]: enforcing the data-norm bound

mod dataset;
mod norms;

pub use dataset::{check_features, Dataset, MIN_SAMPLES};
pub use norms::{clip_rows, max_row_norm, row_norms};
