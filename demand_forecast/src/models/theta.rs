//! Theta method candidate
//!
//! Decomposes the series into two theta lines: the theta=0 line (the
//! plain linear trend, extrapolated) and the theta=2 line
//! (`2y − trend`, doubling the local curvature) smoothed with simple
//! exponential smoothing. The forecast combines both with equal weight,
//! trading the trend line's long-run bias against the smoothed line's
//! short-run variance.

use crate::error::Result;
use crate::models::{
    require_observations, require_positive_horizon, residual_std, ses_level, ForecastModel,
    ForecastPath, TrainedForecastModel, DEFAULT_Z,
};
use crate::series::MetricSeries;

/// Theta multiplier applied to the curvature line
const THETA: f64 = 2.0;

/// Alpha grid searched for the smoothed line: 0.05, 0.10, .. 0.95
const ALPHA_STEPS: usize = 19;

/// Standard theta-method candidate (theta = 2)
#[derive(Debug, Clone)]
pub struct Theta {
    z: f64,
}

impl Default for Theta {
    fn default() -> Self {
        Self { z: DEFAULT_Z }
    }
}

/// Fitted theta model
#[derive(Debug, Clone)]
pub struct TrainedTheta {
    slope: f64,
    intercept: f64,
    /// Final SES level of the theta=2 line
    smoothed_level: f64,
    alpha: f64,
    residual_se: f64,
    n_observations: usize,
    z: f64,
}

impl Theta {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interval multiplier matching a non-default confidence level
    pub fn with_z(mut self, z: f64) -> Self {
        self.z = z;
        self
    }
}

/// Least-squares slope and intercept against the 0-based index
fn linear_fit(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean_t = (n - 1.0) / 2.0;
    let mean_y = values.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var = 0.0;
    for (t, &y) in values.iter().enumerate() {
        let dt = t as f64 - mean_t;
        cov += dt * (y - mean_y);
        var += dt * dt;
    }

    let slope = if var > 0.0 { cov / var } else { 0.0 };
    (slope, mean_y - slope * mean_t)
}

impl ForecastModel for Theta {
    type Trained = TrainedTheta;

    fn fit(&self, series: &MetricSeries) -> Result<Self::Trained> {
        require_observations(self.name(), series, self.minimum_observations())?;

        let values = series.values();
        let (slope, intercept) = linear_fit(values);

        // Theta=2 line: amplify deviations from the fitted trend
        let theta_line: Vec<f64> = values
            .iter()
            .enumerate()
            .map(|(t, &y)| THETA * y + (1.0 - THETA) * (intercept + slope * t as f64))
            .collect();

        // Deterministic alpha search on the theta line
        let mut best_alpha = 0.05;
        let mut best_sse = f64::INFINITY;
        for step in 1..=ALPHA_STEPS {
            let alpha = step as f64 * 0.05;
            let (_, one_step) = ses_level(&theta_line, alpha);
            let sse: f64 = theta_line
                .iter()
                .zip(one_step.iter())
                .map(|(v, p)| (v - p).powi(2))
                .sum();
            if sse < best_sse {
                best_sse = sse;
                best_alpha = alpha;
            }
        }

        let (smoothed_level, theta_one_step) = ses_level(&theta_line, best_alpha);

        // In-sample combined predictions for the residual estimate
        let combined: Vec<f64> = theta_one_step
            .iter()
            .enumerate()
            .map(|(t, &smoothed)| 0.5 * (intercept + slope * t as f64) + 0.5 * smoothed)
            .collect();

        Ok(TrainedTheta {
            slope,
            intercept,
            smoothed_level,
            alpha: best_alpha,
            residual_se: residual_std(values, &combined),
            n_observations: values.len(),
            z: self.z,
        })
    }

    fn minimum_observations(&self) -> usize {
        5
    }

    fn name(&self) -> &'static str {
        "theta"
    }
}

impl TrainedTheta {
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn drift(&self) -> f64 {
        self.slope
    }
}

impl TrainedForecastModel for TrainedTheta {
    fn forecast(&self, horizon: usize) -> Result<ForecastPath> {
        require_positive_horizon(horizon)?;

        let n = self.n_observations as f64;
        let mut values = Vec::with_capacity(horizon);
        let mut margins = Vec::with_capacity(horizon);

        for h in 1..=horizon {
            let t = self.n_observations + h - 1;
            let trend_line = self.intercept + self.slope * t as f64;
            values.push(0.5 * trend_line + 0.5 * self.smoothed_level);

            let inflation = (1.0 + h as f64 / n).sqrt();
            margins.push(self.z * self.residual_se * inflation);
        }

        ForecastPath::from_margins(values, margins)
    }

    fn name(&self) -> &str {
        "theta"
    }
}
