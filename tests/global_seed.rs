//! Reproducibility through the process-wide random source.
//!
//! Kept in its own test binary: it reseeds global state.

use privlearn::random::{reset_global, seed_global};
use privlearn::testing::threshold_1d;
use privlearn::{LogisticRegression, LogisticRegressionConfig, Verbosity};

#[test]
fn seeding_global_source_reproduces_fit() {
    let (x, y) = threshold_1d();
    let config = LogisticRegressionConfig::builder()
        .epsilon(1.0)
        .lambda(1.0)
        .verbosity(Verbosity::Silent)
        .build()
        .unwrap();

    let mut first = LogisticRegression::new(config.clone());
    let mut second = LogisticRegression::new(config.clone());
    let mut third = LogisticRegression::new(config);

    seed_global(1234);
    first.fit(x.view(), y.view()).unwrap();
    seed_global(1234);
    second.fit(x.view(), y.view()).unwrap();
    assert_eq!(first.model().unwrap(), second.model().unwrap());

    // The global draw sequence advances between fits.
    second.fit(x.view(), y.view()).unwrap();
    assert_ne!(first.model().unwrap(), second.model().unwrap());

    reset_global();
    third.fit(x.view(), y.view()).unwrap();
    assert!(third.is_fitted());
}
