//! Calendar and lag covariates derived from a daily series
//!
//! Lag and rolling fields are `None` ("not computed") when the history
//! they need does not exist yet. Downstream consumers can therefore
//! tell a day with zero orders from a day with no usable lag.

use crate::series::MetricSeries;
use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

/// Rolling window / maximum lag used by the builder
pub const LAG_WINDOW: usize = 7;

/// Number of calendar covariates produced for regression models
pub const CALENDAR_COVARIATES: usize = 3;

/// Derived covariates for one day of the series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRow {
    pub date: NaiveDate,
    /// Monday = 0 .. Sunday = 6
    pub day_of_week: u32,
    pub is_weekend: bool,
    pub month: u32,
    /// Previous day's value, `None` on the first row
    pub lag_1: Option<f64>,
    /// Value seven days earlier, `None` for the first seven rows
    pub lag_7: Option<f64>,
    /// Mean of the preceding seven values, `None` for the first seven rows
    pub rolling_mean_7: Option<f64>,
}

/// Builds [`FeatureRow`]s from a metric series, order preserving
#[derive(Debug, Default, Clone)]
pub struct FeatureBuilder;

impl FeatureBuilder {
    pub fn new() -> Self {
        Self
    }

    /// One row per input day, in series order. Lags reference prior
    /// days of the same series only; nothing is fabricated for rows
    /// whose lag window reaches before the series start.
    pub fn build(&self, series: &MetricSeries) -> Vec<FeatureRow> {
        let values = series.values();
        let mut rows = Vec::with_capacity(values.len());

        for i in 0..values.len() {
            let date = series.date_at(i);

            let lag_1 = if i >= 1 { Some(values[i - 1]) } else { None };
            let lag_7 = if i >= LAG_WINDOW {
                Some(values[i - LAG_WINDOW])
            } else {
                None
            };
            let rolling_mean_7 = if i >= LAG_WINDOW {
                let window = &values[i - LAG_WINDOW..i];
                Some(window.iter().sum::<f64>() / LAG_WINDOW as f64)
            } else {
                None
            };

            rows.push(FeatureRow {
                date,
                day_of_week: date.weekday().num_days_from_monday(),
                is_weekend: is_weekend(date),
                month: date.month(),
                lag_1,
                lag_7,
                rolling_mean_7,
            });
        }

        rows
    }
}

/// Whether a date falls on Saturday or Sunday
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Calendar covariates shared by historical rows and future dates:
/// weekend dummy plus the weekly sine/cosine pair. Used as regression
/// inputs by the linear trend candidate.
pub fn calendar_covariates(date: NaiveDate) -> [f64; CALENDAR_COVARIATES] {
    let dow = f64::from(date.weekday().num_days_from_monday());
    let angle = 2.0 * std::f64::consts::PI * dow / 7.0;
    [
        if is_weekend(date) { 1.0 } else { 0.0 },
        angle.sin(),
        angle.cos(),
    ]
}
