//! LogisticRegression: high-level wrapper for private training and prediction.

use ndarray::{Array1, ArrayView1, ArrayView2};
use rand::Rng;

use super::{FitOutcome, FittedModel, LogisticRegressionConfig};
use crate::data::check_features;
use crate::error::{PrivError, Result};
use crate::random;

/// Lifecycle state of a [`LogisticRegression`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitState {
    Unfitted,
    Fitted,
}

/// ε-differentially-private logistic regression.
///
/// Wraps a [`LogisticRegressionConfig`] and, after a successful fit, a
/// [`FittedModel`]. A failed fit never disturbs a previously fitted model.
///
/// # Example
///
/// ```
/// use ndarray::array;
/// use privlearn::model::{LogisticRegression, LogisticRegressionConfig};
/// use privlearn::random::rng_from_seed;
///
/// let config = LogisticRegressionConfig::builder()
///     .epsilon(100.0)
///     .lambda(0.05)
///     .data_norm(2.0)
///     .build()
///     .unwrap();
/// let mut clf = LogisticRegression::new(config);
///
/// let x = array![[0.1], [0.3], [0.5], [1.5], [1.7], [1.9]];
/// let y = array![0u8, 0, 0, 1, 1, 1];
/// clf.fit_with_rng(x.view(), y.view(), &mut rng_from_seed(0)).unwrap();
/// assert!(clf.is_fitted());
/// ```
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    config: LogisticRegressionConfig,
    model: Option<FittedModel>,
}

impl LogisticRegression {
    /// Create an unfitted estimator.
    pub fn new(config: LogisticRegressionConfig) -> Self {
        Self {
            config,
            model: None,
        }
    }

    /// Wrap an already fitted model, e.g. one loaded from disk.
    pub fn from_model(config: LogisticRegressionConfig, model: FittedModel) -> Self {
        Self {
            config,
            model: Some(model),
        }
    }

    pub fn config(&self) -> &LogisticRegressionConfig {
        &self.config
    }

    pub fn state(&self) -> FitState {
        if self.model.is_some() {
            FitState::Fitted
        } else {
            FitState::Unfitted
        }
    }

    #[inline]
    pub fn is_fitted(&self) -> bool {
        self.state() == FitState::Fitted
    }

    // =========================================================================
    // Training
    // =========================================================================

    /// Fit using the process-wide random source.
    ///
    /// See [`fit_with_rng`](Self::fit_with_rng).
    pub fn fit<'a>(
        &mut self,
        features: ArrayView2<'a, f64>,
        labels: ArrayView1<'a, u8>,
    ) -> Result<FitOutcome> {
        random::with_global(|rng| self.fit_with_rng(features, labels, rng))
    }

    /// Fit drawing the privacy noise from `rng`.
    ///
    /// `features` is sample-major `[n_samples, n_features]`; `labels` holds
    /// `0`/`1`. A successful fit replaces any previous model; on error the
    /// previous model is kept.
    ///
    /// Non-convergence is reported through [`FitOutcome::warning`], not as an
    /// error; the model is fitted either way.
    ///
    /// # Errors
    ///
    /// - [`PrivError::InvalidInput`] for malformed data or configuration
    /// - [`PrivError::PrivacyBudgetExhausted`] if `lambda` is too small for
    ///   `epsilon`, the data norm and the sample count
    pub fn fit_with_rng<'a, R: Rng + ?Sized>(
        &mut self,
        features: ArrayView2<'a, f64>,
        labels: ArrayView1<'a, u8>,
        rng: &mut R,
    ) -> Result<FitOutcome> {
        let (model, outcome) = FittedModel::fit_with_rng(features, labels, &self.config, rng)?;
        self.model = Some(model);
        Ok(outcome)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The fitted model.
    pub fn model(&self) -> Result<&FittedModel> {
        self.model.as_ref().ok_or(PrivError::NotFitted)
    }

    /// Consume the estimator, returning the fitted model.
    pub fn into_model(self) -> Result<FittedModel> {
        self.model.ok_or(PrivError::NotFitted)
    }

    pub fn coefficients(&self) -> Result<ArrayView1<'_, f64>> {
        Ok(self.model()?.coefficients())
    }

    pub fn intercept(&self) -> Result<f64> {
        Ok(self.model()?.intercept())
    }

    // =========================================================================
    // Prediction
    // =========================================================================

    pub fn decision_function(&self, features: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        self.model()?.decision_function(features)
    }

    pub fn predict(&self, features: ArrayView2<'_, f64>) -> Result<Array1<u8>> {
        self.model()?.predict(features)
    }

    pub fn predict_proba(&self, features: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        self.model()?.predict_proba(features)
    }

    /// Fraction of `labels` predicted correctly.
    pub fn score(
        &self,
        features: ArrayView2<'_, f64>,
        labels: ArrayView1<'_, u8>,
    ) -> Result<f64> {
        let model = self.model()?;
        check_features(features, Some(model.n_features()))?;
        if labels.len() != features.nrows() {
            return Err(PrivError::invalid(format!(
                "labels length {} does not match {} samples",
                labels.len(),
                features.nrows()
            )));
        }
        if labels.is_empty() {
            return Err(PrivError::invalid("cannot score an empty dataset"));
        }

        let predictions = model.predict(features)?;
        let correct = predictions
            .iter()
            .zip(labels.iter())
            .filter(|(p, y)| p == y)
            .count();
        Ok(correct as f64 / labels.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::random::rng_from_seed;
    use crate::training::Verbosity;
    use ndarray::array;

    fn config(epsilon: f64, lambda: f64) -> LogisticRegressionConfig {
        LogisticRegressionConfig::builder()
            .epsilon(epsilon)
            .lambda(lambda)
            .data_norm(2.0)
            .verbosity(Verbosity::Silent)
            .build()
            .unwrap()
    }

    fn separable() -> (ndarray::Array2<f64>, Array1<u8>) {
        (
            array![[0.1], [0.3], [0.5], [1.5], [1.7], [1.9]],
            array![0u8, 0, 0, 1, 1, 1],
        )
    }

    #[test]
    fn unfitted_rejects_prediction() {
        let clf = LogisticRegression::new(config(1.0, 1.0));
        let x = array![[0.5]];

        assert_eq!(clf.state(), FitState::Unfitted);
        assert_eq!(clf.predict(x.view()).unwrap_err(), PrivError::NotFitted);
        assert_eq!(clf.decision_function(x.view()).unwrap_err().kind(), ErrorKind::NotFitted);
        assert_eq!(clf.coefficients().unwrap_err().kind(), ErrorKind::NotFitted);
        assert_eq!(
            clf.score(x.view(), array![0u8].view()).unwrap_err().kind(),
            ErrorKind::NotFitted
        );
    }

    #[test]
    fn failed_fit_keeps_previous_model() {
        let (x, y) = separable();
        let mut clf = LogisticRegression::new(config(100.0, 0.05));
        clf.fit_with_rng(x.view(), y.view(), &mut rng_from_seed(1)).unwrap();
        let before = clf.model().unwrap().clone();

        let bad_labels = array![0u8, 0, 0, 0, 0, 0];
        let err = clf
            .fit_with_rng(x.view(), bad_labels.view(), &mut rng_from_seed(2))
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(clf.model().unwrap(), &before);
    }

    #[test]
    fn score_counts_correct_predictions() {
        let (x, y) = separable();
        let mut clf = LogisticRegression::new(config(100.0, 0.05));
        clf.fit_with_rng(x.view(), y.view(), &mut rng_from_seed(3)).unwrap();

        let predictions = clf.predict(x.view()).unwrap();
        let expected =
            predictions.iter().zip(y.iter()).filter(|(p, t)| p == t).count() as f64 / 6.0;
        assert_eq!(clf.score(x.view(), y.view()).unwrap(), expected);
    }

    #[test]
    fn score_rejects_length_mismatch() {
        let (x, y) = separable();
        let mut clf = LogisticRegression::new(config(100.0, 0.05));
        clf.fit_with_rng(x.view(), y.view(), &mut rng_from_seed(3)).unwrap();

        let err = clf.score(x.view(), array![0u8, 1].view()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn from_model_is_fitted() {
        let (x, y) = separable();
        let mut clf = LogisticRegression::new(config(100.0, 0.05));
        clf.fit_with_rng(x.view(), y.view(), &mut rng_from_seed(5)).unwrap();
        let model = clf.clone().into_model().unwrap();

        let restored = LogisticRegression::from_model(clf.config().clone(), model);
        assert!(restored.is_fitted());
        assert_eq!(
            restored.predict(x.view()).unwrap(),
            clf.predict(x.view()).unwrap()
        );
    }
}
