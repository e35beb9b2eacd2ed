//! End-to-end forecast over a synthetic order history.
//!
//! Run with: cargo run --example basic_forecast

use chrono::{Duration, NaiveDate};
use demand_forecast::engine::{EngineConfig, ForecastEngine, ForecastOutcome};
use demand_forecast::series::Metric;
use order_ledger::synthetic::weekly_pattern_orders;
use rust_decimal::Decimal;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).ok_or("bad date")?;
    let days = 42;
    let orders = weekly_pattern_orders(start, days, 12.0, 0.25, Decimal::new(2450, 2));
    println!("Generated {} orders across {} days\n", orders.len(), days);

    let config = EngineConfig {
        reference_date: Some(start + Duration::days(i64::from(days) - 1)),
        ..EngineConfig::default()
    };
    let engine = ForecastEngine::new(config)?;

    match engine.forecast(&orders, Metric::OrderCount)? {
        ForecastOutcome::Forecast(result) => {
            println!("Selected model: {}", result.model_name);
            println!(
                "Training window: {} .. {} ({} observations)",
                result.training_window.start_date,
                result.training_window.end_date,
                result.training_window.n_observations
            );
            if result.low_confidence {
                println!("WARNING: low-confidence forecast");
            }

            println!("\nScorecards:");
            for card in &result.scorecards {
                match (card.mae, card.rmse, card.r_squared) {
                    (Some(mae), Some(rmse), Some(r2)) => println!(
                        "  {:<30} MAE {:>7.3}  RMSE {:>7.3}  R² {:>7.3}",
                        card.model_name, mae, rmse, r2
                    ),
                    _ => println!("  {:<30} unusable", card.model_name),
                }
            }

            println!("\n7-day forecast:");
            for point in &result.points {
                println!(
                    "  {}  {:>8}  [{} .. {}]",
                    point.date, point.predicted_value, point.lower_bound, point.upper_bound
                );
            }
        }
        ForecastOutcome::InsufficientData { message } => {
            println!("No forecast: {message}");
        }
    }

    Ok(())
}
