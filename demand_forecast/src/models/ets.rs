//! Additive error/trend/seasonal candidate (Holt-Winters) with a weekly
//! seasonal period. Requires two full seasonal cycles to fit.

use crate::error::{ForecastError, Result};
use crate::models::{
    require_observations, require_positive_horizon, residual_std, ForecastModel, ForecastPath,
    TrainedForecastModel, DEFAULT_Z,
};
use crate::series::MetricSeries;

/// Smoothing parameter grids searched during fitting, smallest first so
/// ties resolve toward the smoother fit
const ALPHA_GRID: [f64; 4] = [0.1, 0.2, 0.3, 0.5];
const BETA_GRID: [f64; 2] = [0.05, 0.1];
const GAMMA_GRID: [f64; 3] = [0.1, 0.2, 0.3];

/// Additive Holt-Winters decomposition
#[derive(Debug, Clone)]
pub struct Ets {
    seasonal_period: usize,
    z: f64,
}

/// Fitted ETS state: final level, trend, and one seasonal index per
/// position in the cycle
#[derive(Debug, Clone)]
pub struct TrainedEts {
    seasonal_period: usize,
    level: f64,
    trend: f64,
    seasonal: Vec<f64>,
    residual_se: f64,
    n_observations: usize,
    alpha: f64,
    beta: f64,
    gamma: f64,
    z: f64,
}

/// One full pass of the additive Holt-Winters recursions
struct ComponentFit {
    level: f64,
    trend: f64,
    seasonal: Vec<f64>,
    one_step: Vec<f64>,
}

impl Ets {
    /// ETS with the given seasonal period (in days)
    pub fn new(seasonal_period: usize) -> Result<Self> {
        if seasonal_period < 2 {
            return Err(ForecastError::InvalidParameter(
                "Seasonal period must be at least 2".to_string(),
            ));
        }
        Ok(Self {
            seasonal_period,
            z: DEFAULT_Z,
        })
    }

    /// The default weekly configuration
    pub fn weekly() -> Self {
        Self {
            seasonal_period: 7,
            z: DEFAULT_Z,
        }
    }

    /// Interval multiplier matching a non-default confidence level
    pub fn with_z(mut self, z: f64) -> Self {
        self.z = z;
        self
    }

    pub fn seasonal_period(&self) -> usize {
        self.seasonal_period
    }

    fn run_recursions(&self, values: &[f64], alpha: f64, beta: f64, gamma: f64) -> ComponentFit {
        let period = self.seasonal_period;

        // Initial states from the first two cycles: level is the first
        // cycle mean, trend the per-day difference of cycle means,
        // seasonal indices the first cycle's deviations from its mean
        let first_mean: f64 = values[..period].iter().sum::<f64>() / period as f64;
        let second_mean: f64 =
            values[period..2 * period].iter().sum::<f64>() / period as f64;

        let mut level = first_mean;
        let mut trend = (second_mean - first_mean) / period as f64;
        let mut seasonal: Vec<f64> = values[..period].iter().map(|v| v - first_mean).collect();

        let mut one_step = Vec::with_capacity(values.len());
        for (t, &value) in values.iter().enumerate() {
            let s = t % period;
            one_step.push(level + trend + seasonal[s]);

            let previous_level = level;
            level = alpha * (value - seasonal[s]) + (1.0 - alpha) * (level + trend);
            trend = beta * (level - previous_level) + (1.0 - beta) * trend;
            seasonal[s] = gamma * (value - level) + (1.0 - gamma) * seasonal[s];
        }

        ComponentFit {
            level,
            trend,
            seasonal,
            one_step,
        }
    }
}

impl ForecastModel for Ets {
    type Trained = TrainedEts;

    fn fit(&self, series: &MetricSeries) -> Result<Self::Trained> {
        require_observations(self.name(), series, self.minimum_observations())?;

        let values = series.values();
        let mut best: Option<(f64, f64, f64, f64)> = None; // (sse, alpha, beta, gamma)

        for &alpha in &ALPHA_GRID {
            for &beta in &BETA_GRID {
                for &gamma in &GAMMA_GRID {
                    let fit = self.run_recursions(values, alpha, beta, gamma);
                    let sse: f64 = values
                        .iter()
                        .zip(fit.one_step.iter())
                        .map(|(v, p)| (v - p).powi(2))
                        .sum();
                    // Strict inequality keeps grid ties deterministic
                    if best.map_or(true, |(b, _, _, _)| sse < b) {
                        best = Some((sse, alpha, beta, gamma));
                    }
                }
            }
        }

        let (_, alpha, beta, gamma) = best.expect("non-empty grid");
        let fit = self.run_recursions(values, alpha, beta, gamma);

        Ok(TrainedEts {
            seasonal_period: self.seasonal_period,
            level: fit.level,
            trend: fit.trend,
            seasonal: fit.seasonal,
            residual_se: residual_std(values, &fit.one_step),
            n_observations: values.len(),
            alpha,
            beta,
            gamma,
            z: self.z,
        })
    }

    fn minimum_observations(&self) -> usize {
        // Two full seasonal cycles
        2 * self.seasonal_period
    }

    fn name(&self) -> &'static str {
        "ets"
    }
}

impl TrainedEts {
    pub fn smoothing_parameters(&self) -> (f64, f64, f64) {
        (self.alpha, self.beta, self.gamma)
    }
}

impl TrainedForecastModel for TrainedEts {
    fn forecast(&self, horizon: usize) -> Result<ForecastPath> {
        require_positive_horizon(horizon)?;

        let mut values = Vec::with_capacity(horizon);
        let mut margins = Vec::with_capacity(horizon);

        for h in 1..=horizon {
            let s = (self.n_observations + h - 1) % self.seasonal_period;
            values.push(self.level + h as f64 * self.trend + self.seasonal[s]);
            margins.push(self.z * self.residual_se * (h as f64).sqrt());
        }

        ForecastPath::from_margins(values, margins)
    }

    fn name(&self) -> &str {
        "ets"
    }
}
