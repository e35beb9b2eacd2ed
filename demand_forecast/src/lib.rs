//! # Demand Forecast
//!
//! Short-horizon (7-day) retail demand forecasting over order history,
//! with automatic selection among competing time-series models.
//!
//! ## Pipeline
//!
//! 1. Aggregate raw [`order_ledger::OrderRecord`]s into a gap-free
//!    daily series (days without orders are explicit zeros).
//! 2. Backtest every model candidate against a trailing holdout week.
//! 3. Select the winner by lowest MAE with a deterministic tie-break.
//! 4. Refit the winner on the full history and publish a 7-day
//!    forecast with prediction intervals.
//!
//! When history is too short for any candidate, the engine degrades to
//! a naive mean forecast flagged `low_confidence` instead of failing.
//!
//! ## Quick Start
//!
//! ```rust
//! use demand_forecast::engine::{EngineConfig, ForecastEngine, ForecastOutcome};
//! use demand_forecast::series::Metric;
//! use order_ledger::synthetic::weekly_pattern_orders;
//! use chrono::NaiveDate;
//! use rust_decimal::Decimal;
//!
//! # fn main() -> demand_forecast::error::Result<()> {
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let orders = weekly_pattern_orders(start, 28, 10.0, 0.3, Decimal::new(2500, 2));
//!
//! let mut config = EngineConfig::default();
//! config.reference_date = Some(start + chrono::Duration::days(27));
//! let engine = ForecastEngine::new(config)?;
//!
//! match engine.forecast(&orders, Metric::OrderCount)? {
//!     ForecastOutcome::Forecast(result) => {
//!         println!("{} points from {}", result.points.len(), result.model_name);
//!     }
//!     ForecastOutcome::InsufficientData { message } => println!("{message}"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod chart;
pub mod engine;
pub mod error;
pub mod evaluate;
pub mod features;
pub mod metrics;
pub mod models;
pub mod select;
pub mod series;

// Re-export commonly used types
pub use crate::chart::{ChartDataExporter, ChartRow};
pub use crate::engine::{EngineConfig, ForecastEngine, ForecastOutcome, ForecastResult};
pub use crate::error::ForecastError;
pub use crate::evaluate::{Evaluator, ScoreCard};
pub use crate::models::{ForecastModel, TrainedForecastModel};
pub use crate::select::ModelSelector;
pub use crate::series::{DailySeries, Metric, SeriesAggregator};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
