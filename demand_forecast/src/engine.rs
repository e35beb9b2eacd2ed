//! Forecast engine: one synchronous pipeline per invocation
//!
//! aggregate → evaluate every candidate on a holdout split → select →
//! refit the winner on the full series → publish. The two phases are
//! deliberate: evaluation measures generalization on truncated data,
//! while the published forecast is refit on everything available.
//! Nothing survives the call except the returned outcome.

use crate::error::{ForecastError, Result};
use crate::evaluate::{Evaluator, ScoreCard, DEFAULT_HOLDOUT_DAYS};
use crate::models::{candidates_with_z, Candidate, ForecastPath};
use crate::select::{ModelSelector, DEFAULT_TIE_EPSILON};
use crate::series::{DailySeries, Metric, MetricSeries, SeriesAggregator};
use chrono::{FixedOffset, NaiveDate};
use order_ledger::{DateWindow, OrderRecord, OrderStore};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};

/// Model name reported when the naive fallback produced the forecast
pub const NAIVE_FALLBACK: &str = "naive_fallback";

/// Fewer order-bearing days than this marks the output low-confidence
const MIN_CONFIDENT_DAYS: usize = 7;

/// Engine configuration. Holdout length and tie epsilon are tunable
/// defaults, not invariants.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Days to forecast ahead
    pub horizon_days: usize,
    /// Trailing days withheld for evaluation
    pub holdout_days: usize,
    /// MAE/RMSE difference below which scorecards count as tied
    pub tie_epsilon: f64,
    /// Two-sided coverage of the published intervals
    pub confidence_level: f64,
    /// Timezone offset applied when bucketing orders into days
    pub utc_offset: FixedOffset,
    /// Pinned "today" for future-dated validation (tests, replays)
    pub reference_date: Option<NaiveDate>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            horizon_days: 7,
            holdout_days: DEFAULT_HOLDOUT_DAYS,
            tie_epsilon: DEFAULT_TIE_EPSILON,
            confidence_level: 0.95,
            utc_offset: FixedOffset::east_opt(0).expect("zero offset is valid"),
            reference_date: None,
        }
    }
}

/// The span of history the published model was fit on
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub n_observations: usize,
}

/// One forecast day. Values are fixed-point decimals rounded for
/// transport, never raw binary floats.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub predicted_value: Decimal,
    pub lower_bound: Decimal,
    pub upper_bound: Decimal,
}

/// The sole artifact returned to callers; immutable, recomputed on
/// every invocation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    pub model_name: String,
    pub metric: Metric,
    pub horizon_days: usize,
    pub points: Vec<ForecastPoint>,
    pub training_window: TrainingWindow,
    pub scorecards: Vec<ScoreCard>,
    pub low_confidence: bool,
}

/// What the presentation layer receives: a forecast (possibly
/// low-confidence) or a structured not-enough-orders marker, never a
/// raw statistical fault
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ForecastOutcome {
    Forecast(ForecastResult),
    InsufficientData { message: String },
}

/// Orchestrates the full forecasting pipeline
#[derive(Debug, Clone)]
pub struct ForecastEngine {
    config: EngineConfig,
    /// Z multiplier matching the configured confidence level
    z_value: f64,
}

impl ForecastEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        if config.horizon_days == 0 {
            return Err(ForecastError::InvalidParameter(
                "Forecast horizon must be positive".to_string(),
            ));
        }
        if config.confidence_level <= 0.0 || config.confidence_level >= 1.0 {
            return Err(ForecastError::InvalidParameter(
                "Confidence level must be between 0 and 1".to_string(),
            ));
        }

        let normal = Normal::new(0.0, 1.0)
            .map_err(|e| ForecastError::InvalidParameter(e.to_string()))?;
        let z_value = normal.inverse_cdf(0.5 + config.confidence_level / 2.0);

        Ok(Self { config, z_value })
    }

    /// Engine with all defaults (7-day horizon, 7-day holdout, UTC)
    pub fn with_defaults() -> Result<Self> {
        Self::new(EngineConfig::default())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Forecast from records pulled out of a store over a date window
    pub fn forecast_from_store<S: OrderStore>(
        &self,
        store: &S,
        window: &DateWindow,
        metric: Metric,
    ) -> Result<ForecastOutcome> {
        let records = store
            .orders_in(window)
            .map_err(|e| ForecastError::ForecastingError(e.to_string()))?;
        self.forecast(&records, metric)
    }

    /// Run the full pipeline over a collection of order records.
    ///
    /// Returns `Err` only for malformed records or invalid
    /// configuration; statistical shortfalls come back as a structured
    /// outcome instead.
    pub fn forecast(&self, records: &[OrderRecord], metric: Metric) -> Result<ForecastOutcome> {
        let mut aggregator = SeriesAggregator::new(self.config.utc_offset);
        if let Some(date) = self.config.reference_date {
            aggregator = aggregator.with_reference_date(date);
        }

        let daily = match aggregator.aggregate(records) {
            Ok(daily) => daily,
            Err(ForecastError::InsufficientData(_)) => {
                return Ok(ForecastOutcome::InsufficientData {
                    message: "not enough orders yet to produce a forecast".to_string(),
                });
            }
            Err(e) => return Err(e),
        };

        let series = daily.metric_series(metric);
        // Candidates inherit the engine's interval multiplier so the
        // published bands match the configured confidence level
        let candidates = candidates_with_z(self.z_value);
        let sparse_history = daily.days_with_orders() < MIN_CONFIDENT_DAYS;

        // Phase one: measure generalization on the holdout split
        let evaluator = Evaluator::new(self.config.holdout_days)?;
        let scorecards = match evaluator.evaluate(&series, &candidates) {
            Ok(report) => report.scorecards,
            // Too short to even split: score nothing, fall back below
            Err(ForecastError::InsufficientData(_)) => candidates
                .iter()
                .map(|c| ScoreCard::unusable(c.name()))
                .collect(),
            Err(e) => return Err(e),
        };

        let selector = ModelSelector::new(self.config.tie_epsilon)?;
        match selector.select(&scorecards) {
            Ok(winner) => {
                // Phase two: refit the winner on the full series so the
                // published forecast uses all available information
                let name = winner.model_name.clone();
                let path = self.refit_and_forecast(&candidates, &name, &series)?;
                let result = self.publish(
                    name,
                    metric,
                    &series,
                    path,
                    scorecards,
                    sparse_history,
                )?;
                Ok(ForecastOutcome::Forecast(result))
            }
            Err(ForecastError::NoUsableModel) => {
                let path = self.naive_fallback(&series)?;
                let result = self.publish(
                    NAIVE_FALLBACK.to_string(),
                    metric,
                    &series,
                    path,
                    scorecards,
                    true,
                )?;
                Ok(ForecastOutcome::Forecast(result))
            }
            Err(e) => Err(e),
        }
    }

    fn refit_and_forecast(
        &self,
        candidates: &[Box<dyn Candidate>],
        name: &str,
        series: &MetricSeries,
    ) -> Result<ForecastPath> {
        let candidate = candidates
            .iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| {
                ForecastError::ForecastingError(format!("selected model {name} not in pool"))
            })?;
        candidate
            .fit_boxed(series)?
            .forecast(self.config.horizon_days)
    }

    /// Constant forecast at the historical mean with a widened band, so
    /// the system still answers when no candidate qualified
    fn naive_fallback(&self, series: &MetricSeries) -> Result<ForecastPath> {
        let mean = series.mean();
        let std = series.std_dev();
        let mut margin = 2.0 * self.z_value * std;
        if margin <= 0.0 {
            // Degenerate history (one point, or all identical): still
            // publish an honest non-zero band
            margin = mean.abs().max(1.0);
        }

        let values = vec![mean; self.config.horizon_days];
        let margins = vec![margin; self.config.horizon_days];
        ForecastPath::from_margins(values, margins)
    }

    /// Assemble the transport-facing result from a forecast path
    fn publish(
        &self,
        model_name: String,
        metric: Metric,
        series: &MetricSeries,
        path: ForecastPath,
        scorecards: Vec<ScoreCard>,
        low_confidence: bool,
    ) -> Result<ForecastResult> {
        let start = series.next_date();
        let mut points = Vec::with_capacity(path.len());

        for (i, &value) in path.values().iter().enumerate() {
            let date = start + chrono::Duration::days(i as i64);
            // Order volume cannot go negative; clamp before rounding
            let predicted = value.max(0.0);
            let lower = path.lower()[i].clamp(0.0, predicted);
            let upper = path.upper()[i].max(predicted);

            points.push(ForecastPoint {
                date,
                predicted_value: to_decimal(predicted)?,
                lower_bound: to_decimal(lower)?,
                upper_bound: to_decimal(upper)?,
            });
        }

        Ok(ForecastResult {
            model_name,
            metric,
            horizon_days: self.config.horizon_days,
            points,
            training_window: TrainingWindow {
                start_date: series.start(),
                end_date: series.date_at(series.len() - 1),
                n_observations: series.len(),
            },
            scorecards,
            low_confidence,
        })
    }
}

/// Fixed-point conversion for transport values, rounded to 2 dp
pub(crate) fn to_decimal(value: f64) -> Result<Decimal> {
    if !value.is_finite() {
        return Err(ForecastError::Numeric(format!(
            "non-finite forecast value {value}"
        )));
    }
    Decimal::from_f64(value)
        .map(|d| d.round_dp(2))
        .ok_or_else(|| ForecastError::Numeric(format!("value {value} out of decimal range")))
}

/// Aggregate records into the daily series under the engine's
/// configured offset, for callers that want to pair the result with
/// recent history (chart export)
pub fn aggregate_history(
    config: &EngineConfig,
    records: &[OrderRecord],
) -> Result<DailySeries> {
    let mut aggregator = SeriesAggregator::new(config.utc_offset);
    if let Some(date) = config.reference_date {
        aggregator = aggregator.with_reference_date(date);
    }
    aggregator.aggregate(records)
}
