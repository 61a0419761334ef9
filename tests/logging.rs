//! Log events emitted during fitting.

use std::io;
use std::sync::{Arc, Mutex};

use ndarray::array;

use privlearn::random::rng_from_seed;
use privlearn::testing::threshold_1d;
use privlearn::{LogisticRegression, LogisticRegressionConfig, Verbosity};

// =============================================================================
// Capture
// =============================================================================

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a thread-local subscriber and return everything it logged.
fn capture_logs(f: impl FnOnce()) -> String {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::TRACE)
        .finish();

    tracing::subscriber::with_default(subscriber, f);
    let bytes = captured.0.lock().unwrap().clone();
    String::from_utf8(bytes).unwrap()
}

fn fit_logs(data_norm: Option<f64>, verbosity: Verbosity) -> String {
    let (x, y) = threshold_1d();
    let config = LogisticRegressionConfig::builder()
        .epsilon(1.0)
        .lambda(1.0)
        .maybe_data_norm(data_norm)
        .verbosity(verbosity)
        .build()
        .unwrap();
    let mut clf = LogisticRegression::new(config);

    capture_logs(|| {
        clf.fit_with_rng(x.view(), y.view(), &mut rng_from_seed(0))
            .unwrap();
    })
}

// =============================================================================
// Tests
// =============================================================================

#[test]
fn missing_data_norm_warns_about_privacy_leak() {
    let logs = fit_logs(None, Verbosity::Warning);
    assert!(logs.contains("WARN"), "{logs}");
    assert!(logs.contains("leaks privacy"), "{logs}");
    assert!(logs.contains("data_norm=5.5"), "{logs}");
}

#[test]
fn supplied_data_norm_does_not_warn() {
    let logs = fit_logs(Some(6.0), Verbosity::Warning);
    assert!(!logs.contains("leaks privacy"), "{logs}");
}

#[test]
fn silent_verbosity_suppresses_leak_warning() {
    let logs = fit_logs(None, Verbosity::Silent);
    assert!(!logs.contains("WARN"), "{logs}");
    assert!(!logs.contains("leaks privacy"), "{logs}");
}

#[test]
fn debug_verbosity_reports_iterations() {
    let logs = fit_logs(Some(6.0), Verbosity::Debug);
    assert!(logs.contains("starting private fit"), "{logs}");
    assert!(logs.contains("lbfgs iteration"), "{logs}");
    assert!(logs.contains("finished private fit"), "{logs}");
}

#[test]
fn clipping_is_reported_at_info() {
    let x = array![[10.0], [-0.5], [0.5], [-1.0]];
    let y = array![1u8, 0, 1, 0];
    let config = LogisticRegressionConfig::builder()
        .epsilon(1.0)
        .lambda(1.0)
        .data_norm(1.0)
        .verbosity(Verbosity::Info)
        .build()
        .unwrap();
    let mut clf = LogisticRegression::new(config);

    let logs = capture_logs(|| {
        clf.fit_with_rng(x.view(), y.view(), &mut rng_from_seed(0))
            .unwrap();
    });
    assert!(logs.contains("clipped records"), "{logs}");
    assert!(logs.contains("n_clipped=1"), "{logs}");
}
