//! Chart export: reshapes a forecast plus recent history into
//! date-aligned rows for a visualization layer. Pure transform, no
//! forecasting logic.

use crate::engine::ForecastResult;
use crate::series::{DailySeries, Metric};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// Days of trailing history included ahead of the forecast by default
pub const DEFAULT_RECENT_DAYS: usize = 21;

/// One date-aligned row: history rows carry `actual`, forecast rows
/// carry the predicted value and its band
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartRow {
    pub date: NaiveDate,
    pub actual: Option<Decimal>,
    pub predicted: Option<Decimal>,
    pub lower_bound: Option<Decimal>,
    pub upper_bound: Option<Decimal>,
}

/// Stateless exporter from forecast + history to chart rows
#[derive(Debug, Clone)]
pub struct ChartDataExporter {
    recent_days: usize,
}

impl Default for ChartDataExporter {
    fn default() -> Self {
        Self {
            recent_days: DEFAULT_RECENT_DAYS,
        }
    }
}

impl ChartDataExporter {
    pub fn new(recent_days: usize) -> Self {
        Self { recent_days }
    }

    /// Emit the trailing history followed by the forecast horizon, date
    /// ordered. Running this twice on the same inputs yields identical
    /// output.
    pub fn export(
        &self,
        result: &ForecastResult,
        history: &DailySeries,
        metric: Metric,
    ) -> Vec<ChartRow> {
        let recent = history.recent(self.recent_days);
        let mut rows = Vec::with_capacity(recent.len() + result.points.len());

        for point in recent {
            let actual = match metric {
                Metric::OrderCount => Decimal::from(point.order_count),
                Metric::Revenue => point.revenue,
            };
            rows.push(ChartRow {
                date: point.date,
                actual: Some(actual),
                predicted: None,
                lower_bound: None,
                upper_bound: None,
            });
        }

        for point in &result.points {
            rows.push(ChartRow {
                date: point.date,
                actual: None,
                predicted: Some(point.predicted_value),
                lower_bound: Some(point.lower_bound),
                upper_bound: Some(point.upper_bound),
            });
        }

        rows
    }
}
