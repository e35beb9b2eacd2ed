//! Error types for the demand_forecast crate

use thiserror::Error;

/// Custom error types for the demand_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// The aggregator or evaluator had zero usable input
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// A single candidate refused to fit on too-short history
    #[error("Insufficient history for {model}: requires {required} observations, have {available}")]
    InsufficientHistory {
        model: &'static str,
        required: usize,
        available: usize,
    },

    /// No candidate survived evaluation; the engine falls back
    #[error("No usable model among the evaluated candidates")]
    NoUsableModel,

    /// A malformed order record was rejected at the aggregation boundary
    #[error("Invalid order record {id}: {reason}")]
    InvalidRecord { id: u64, reason: String },

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error related to forecasting operations
    #[error("Forecasting error: {0}")]
    ForecastingError(String),

    /// A non-finite value reached a transport conversion
    #[error("Numeric error: {0}")]
    Numeric(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;
