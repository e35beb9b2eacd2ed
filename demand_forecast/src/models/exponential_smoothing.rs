//! Simple exponential smoothing candidate
//!
//! The smoothing parameter is chosen by a deterministic grid search
//! minimizing in-sample one-step-ahead squared error; the forecast is
//! flat at the final smoothed level with a constant-width interval
//! from the residual variance.

use crate::error::Result;
use crate::models::{
    require_observations, require_positive_horizon, residual_std, ses_level, ForecastModel,
    ForecastPath, TrainedForecastModel, DEFAULT_Z,
};
use crate::series::MetricSeries;

/// Alpha grid searched during fitting: 0.05, 0.10, .. 0.95
const ALPHA_STEPS: usize = 19;

/// Simple exponential smoothing with fitted alpha
#[derive(Debug, Clone)]
pub struct SimpleExponentialSmoothing {
    z: f64,
}

impl Default for SimpleExponentialSmoothing {
    fn default() -> Self {
        Self { z: DEFAULT_Z }
    }
}

/// Fitted simple exponential smoothing model
#[derive(Debug, Clone)]
pub struct TrainedSes {
    alpha: f64,
    level: f64,
    residual_se: f64,
    z: f64,
}

impl SimpleExponentialSmoothing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interval multiplier matching a non-default confidence level
    pub fn with_z(mut self, z: f64) -> Self {
        self.z = z;
        self
    }
}

impl ForecastModel for SimpleExponentialSmoothing {
    type Trained = TrainedSes;

    fn fit(&self, series: &MetricSeries) -> Result<Self::Trained> {
        require_observations(self.name(), series, self.minimum_observations())?;

        let values = series.values();
        let mut best_alpha = 0.05;
        let mut best_sse = f64::INFINITY;

        for step in 1..=ALPHA_STEPS {
            let alpha = step as f64 * 0.05;
            let (_, one_step) = ses_level(values, alpha);
            let sse: f64 = values
                .iter()
                .zip(one_step.iter())
                .map(|(v, p)| (v - p).powi(2))
                .sum();
            // Strict inequality keeps the search deterministic on ties
            if sse < best_sse {
                best_sse = sse;
                best_alpha = alpha;
            }
        }

        let (level, one_step) = ses_level(values, best_alpha);

        Ok(TrainedSes {
            alpha: best_alpha,
            level,
            residual_se: residual_std(values, &one_step),
            z: self.z,
        })
    }

    fn minimum_observations(&self) -> usize {
        3
    }

    fn name(&self) -> &'static str {
        "simple_exponential_smoothing"
    }
}

impl TrainedSes {
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn level(&self) -> f64 {
        self.level
    }
}

impl TrainedForecastModel for TrainedSes {
    fn forecast(&self, horizon: usize) -> Result<ForecastPath> {
        require_positive_horizon(horizon)?;

        // Flat forecast beyond the last smoothed level; SES theory gives
        // no widening for the point forecast, so the band stays constant
        let values = vec![self.level; horizon];
        let margins = vec![self.z * self.residual_se; horizon];

        ForecastPath::from_margins(values, margins)
    }

    fn name(&self) -> &str {
        "simple_exponential_smoothing"
    }
}
