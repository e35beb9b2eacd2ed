//! Export a forecast plus recent history as chart-ready JSON rows.
//!
//! Run with: cargo run --example chart_export

use chrono::{Duration, NaiveDate};
use demand_forecast::chart::ChartDataExporter;
use demand_forecast::engine::{aggregate_history, EngineConfig, ForecastEngine, ForecastOutcome};
use demand_forecast::series::Metric;
use order_ledger::synthetic::weekly_pattern_orders;
use rust_decimal::Decimal;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let start = NaiveDate::from_ymd_opt(2024, 3, 4).ok_or("bad date")?;
    let orders = weekly_pattern_orders(start, 35, 9.0, 0.15, Decimal::new(1999, 2));

    let config = EngineConfig {
        reference_date: Some(start + Duration::days(34)),
        ..EngineConfig::default()
    };
    let engine = ForecastEngine::new(config)?;

    let result = match engine.forecast(&orders, Metric::Revenue)? {
        ForecastOutcome::Forecast(result) => result,
        ForecastOutcome::InsufficientData { message } => {
            println!("No forecast: {message}");
            return Ok(());
        }
    };

    let history = aggregate_history(engine.config(), &orders)?;
    let rows = ChartDataExporter::default().export(&result, &history, Metric::Revenue);

    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}
