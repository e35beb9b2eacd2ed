//! Order aggregation into fixed-frequency daily series
//!
//! The aggregator is the validation boundary of the engine: malformed
//! records are rejected here by id, never clamped or silently dropped,
//! so the fitted models are never skewed by bad input unnoticed.

use crate::error::{ForecastError, Result};
use chrono::{Duration, FixedOffset, NaiveDate, Utc};
use order_ledger::OrderRecord;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// Which aggregate the engine forecasts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Number of orders per day
    OrderCount,
    /// Summed order totals per day
    Revenue,
}

/// One calendar day of aggregated orders
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub order_count: u32,
    pub revenue: Decimal,
}

/// Fixed-frequency daily series over `[first_date, last_date]` with no
/// gaps: days without orders are present with explicit zeros.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySeries {
    points: Vec<DailyPoint>,
}

impl DailySeries {
    pub fn points(&self) -> &[DailyPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    /// Days that actually carried at least one order
    pub fn days_with_orders(&self) -> usize {
        self.points.iter().filter(|p| p.order_count > 0).count()
    }

    /// Numeric view of one metric, for model fitting
    pub fn metric_series(&self, metric: Metric) -> MetricSeries {
        let values = self
            .points
            .iter()
            .map(|p| match metric {
                Metric::OrderCount => f64::from(p.order_count),
                Metric::Revenue => p.revenue.to_f64().unwrap_or(0.0),
            })
            .collect();
        MetricSeries {
            start: self.first_date().unwrap_or(NaiveDate::MIN),
            values,
        }
    }

    /// The last `n` points, or all of them if fewer exist
    pub fn recent(&self, n: usize) -> &[DailyPoint] {
        let skip = self.points.len().saturating_sub(n);
        &self.points[skip..]
    }
}

/// Dated numeric series a model candidate fits on. Values are one metric
/// of the parent [`DailySeries`], one per consecutive day from `start`.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSeries {
    start: NaiveDate,
    values: Vec<f64>,
}

impl MetricSeries {
    pub fn new(start: NaiveDate, values: Vec<f64>) -> Self {
        Self { start, values }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Date of the i-th observation
    pub fn date_at(&self, index: usize) -> NaiveDate {
        self.start + Duration::days(index as i64)
    }

    /// First date after the observed range (start of the forecast horizon)
    pub fn next_date(&self) -> NaiveDate {
        self.date_at(self.values.len())
    }

    /// The first `n` observations, as a series (holdout truncation)
    pub fn head(&self, n: usize) -> MetricSeries {
        MetricSeries {
            start: self.start,
            values: self.values[..n.min(self.values.len())].to_vec(),
        }
    }

    /// The last `n` observations as a plain slice (holdout actuals)
    pub fn tail(&self, n: usize) -> &[f64] {
        let skip = self.values.len().saturating_sub(n);
        &self.values[skip..]
    }

    /// Arithmetic mean of all observations, 0.0 when empty
    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    /// Population standard deviation
    pub fn std_dev(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let mean = self.mean();
        let var = self
            .values
            .iter()
            .map(|v| (v - mean).powi(2))
            .sum::<f64>()
            / self.values.len() as f64;
        var.sqrt()
    }
}

/// Groups raw order records into a gap-free [`DailySeries`]
#[derive(Debug, Clone)]
pub struct SeriesAggregator {
    /// Timezone offset applied to every timestamp before taking the
    /// calendar date, so day boundaries never drift between records
    offset: FixedOffset,
    /// Upper bound for "not future-dated" checks; defaults to today in
    /// the configured offset
    reference_date: Option<NaiveDate>,
}

impl SeriesAggregator {
    pub fn new(offset: FixedOffset) -> Self {
        Self {
            offset,
            reference_date: None,
        }
    }

    /// Pin the validation reference date (tests, replays)
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    fn reference_date(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| Utc::now().with_timezone(&self.offset).date_naive())
    }

    /// Aggregate records into one point per calendar day, zero-filling
    /// every day in `[min(date), max(date)]` that carried no orders.
    pub fn aggregate(&self, records: &[OrderRecord]) -> Result<DailySeries> {
        if records.is_empty() {
            return Err(ForecastError::InsufficientData(
                "no order records to aggregate".to_string(),
            ));
        }

        let today = self.reference_date();
        let mut buckets: BTreeMap<NaiveDate, (u32, Decimal)> = BTreeMap::new();

        for record in records {
            if record.total_amount < Decimal::ZERO {
                return Err(ForecastError::InvalidRecord {
                    id: record.id,
                    reason: format!("negative total amount {}", record.total_amount),
                });
            }
            let date = record.created_at.with_timezone(&self.offset).date_naive();
            if date > today {
                return Err(ForecastError::InvalidRecord {
                    id: record.id,
                    reason: format!("future-dated order ({date} is after {today})"),
                });
            }

            let bucket = buckets.entry(date).or_insert((0, Decimal::ZERO));
            bucket.0 += 1;
            bucket.1 += record.total_amount;
        }

        // BTreeMap iteration is already date-ordered; walk the full
        // calendar range and fill the missing days with zeros.
        let first = *buckets.keys().next().expect("non-empty buckets");
        let last = *buckets.keys().next_back().expect("non-empty buckets");

        let mut points = Vec::new();
        let mut date = first;
        while date <= last {
            let (order_count, revenue) = buckets.get(&date).copied().unwrap_or((0, Decimal::ZERO));
            points.push(DailyPoint {
                date,
                order_count,
                revenue,
            });
            date = date + Duration::days(1);
        }

        Ok(DailySeries { points })
    }
}
