//! Forecasting model candidates
//!
//! Every candidate implements the same capability pair: a lightweight
//! configuration type implementing [`ForecastModel`] whose `fit`
//! produces a self-contained [`TrainedForecastModel`]. Fits are
//! deterministic and side-effect free; the same training series always
//! yields the same trained state and the same forecast.

use crate::error::{ForecastError, Result};
use crate::series::MetricSeries;
use std::fmt::Debug;

pub mod ets;
pub mod exponential_smoothing;
pub mod linear_trend;
pub mod theta;

pub use ets::Ets;
pub use exponential_smoothing::SimpleExponentialSmoothing;
pub use linear_trend::LinearTrend;
pub use theta::Theta;

/// Z multiplier for the default 95% prediction intervals
pub const DEFAULT_Z: f64 = 1.96;

/// Point forecast with per-step interval bounds
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastPath {
    values: Vec<f64>,
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl ForecastPath {
    /// Create a path, validating that all three sequences agree in
    /// length and every bound brackets its point.
    pub fn new(values: Vec<f64>, lower: Vec<f64>, upper: Vec<f64>) -> Result<Self> {
        if values.len() != lower.len() || values.len() != upper.len() {
            return Err(ForecastError::ForecastingError(format!(
                "Bound lengths ({}, {}) don't match values length ({})",
                lower.len(),
                upper.len(),
                values.len()
            )));
        }
        for i in 0..values.len() {
            if lower[i] > values[i] || values[i] > upper[i] {
                return Err(ForecastError::ForecastingError(format!(
                    "Interval at step {} does not bracket the point forecast",
                    i + 1
                )));
            }
        }
        Ok(Self {
            values,
            lower,
            upper,
        })
    }

    /// Build a path from point forecasts and a per-step margin
    pub fn from_margins(values: Vec<f64>, margins: Vec<f64>) -> Result<Self> {
        if values.len() != margins.len() {
            return Err(ForecastError::ForecastingError(format!(
                "Margins length ({}) doesn't match values length ({})",
                margins.len(),
                values.len()
            )));
        }
        let lower = values
            .iter()
            .zip(margins.iter())
            .map(|(v, m)| v - m)
            .collect();
        let upper = values
            .iter()
            .zip(margins.iter())
            .map(|(v, m)| v + m)
            .collect();
        Self::new(values, lower, upper)
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Forecast model that can be fit on a metric series
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Fit the model. Deterministic: identical input yields identical
    /// trained state. Fails with `InsufficientHistory` below
    /// [`ForecastModel::minimum_observations`].
    fn fit(&self, series: &MetricSeries) -> Result<Self::Trained>;

    /// Fewest observations this model will accept
    fn minimum_observations(&self) -> usize;

    /// Stable identifier used in scorecards and selection
    fn name(&self) -> &'static str;
}

/// Fitted model able to forecast forward
pub trait TrainedForecastModel: Debug {
    /// Point forecast with interval bounds for `horizon` future days.
    /// `horizon` must be positive.
    fn forecast(&self, horizon: usize) -> Result<ForecastPath>;

    /// Name of the model that produced this fit
    fn name(&self) -> &str;
}

/// Object-safe view over the heterogeneous candidate pool
pub trait Candidate: Debug {
    fn name(&self) -> &'static str;
    fn minimum_observations(&self) -> usize;
    fn fit_boxed(&self, series: &MetricSeries) -> Result<Box<dyn TrainedForecastModel>>;
}

impl<M> Candidate for M
where
    M: ForecastModel,
    M::Trained: 'static,
{
    fn name(&self) -> &'static str {
        ForecastModel::name(self)
    }

    fn minimum_observations(&self) -> usize {
        ForecastModel::minimum_observations(self)
    }

    fn fit_boxed(&self, series: &MetricSeries) -> Result<Box<dyn TrainedForecastModel>> {
        Ok(Box::new(self.fit(series)?))
    }
}

/// The default candidate pool, in selection priority order, with the
/// standard 95% interval multiplier
pub fn default_candidates() -> Vec<Box<dyn Candidate>> {
    candidates_with_z(DEFAULT_Z)
}

/// Candidate pool whose prediction intervals use a caller-chosen z
/// multiplier (the engine derives it from its confidence level)
pub fn candidates_with_z(z: f64) -> Vec<Box<dyn Candidate>> {
    vec![
        Box::new(LinearTrend::new().with_z(z)),
        Box::new(SimpleExponentialSmoothing::new().with_z(z)),
        Box::new(Ets::weekly().with_z(z)),
        Box::new(Theta::new().with_z(z)),
    ]
}

/// Shared guard used by every candidate's `fit`
pub(crate) fn require_observations(
    model: &'static str,
    series: &MetricSeries,
    required: usize,
) -> Result<()> {
    if series.len() < required {
        return Err(ForecastError::InsufficientHistory {
            model,
            required,
            available: series.len(),
        });
    }
    Ok(())
}

/// Shared guard for forecast horizons
pub(crate) fn require_positive_horizon(horizon: usize) -> Result<()> {
    if horizon == 0 {
        return Err(ForecastError::InvalidParameter(
            "Forecast horizon must be positive".to_string(),
        ));
    }
    Ok(())
}

/// Simple-exponential-smoothing level recursion shared by the
/// smoothing-based candidates: returns the final level and the
/// one-step-ahead predictions generated along the way. The prediction
/// for each step is the level before seeing that observation.
pub(crate) fn ses_level(values: &[f64], alpha: f64) -> (f64, Vec<f64>) {
    let mut level = values[0];
    let mut one_step = Vec::with_capacity(values.len());

    one_step.push(level);
    for &value in &values[1..] {
        one_step.push(level);
        level = alpha * value + (1.0 - alpha) * level;
    }

    (level, one_step)
}

/// Residual standard deviation around fitted one-step predictions
pub(crate) fn residual_std(actual: &[f64], fitted: &[f64]) -> f64 {
    debug_assert_eq!(actual.len(), fitted.len());
    if actual.is_empty() {
        return 0.0;
    }
    let sse: f64 = actual
        .iter()
        .zip(fitted.iter())
        .map(|(a, f)| (a - f).powi(2))
        .sum();
    (sse / actual.len() as f64).sqrt()
}
