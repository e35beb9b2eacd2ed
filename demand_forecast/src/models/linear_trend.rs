//! Linear trend candidate: least-squares fit against a day index plus
//! calendar covariates, extrapolated over the forecast horizon.

use crate::error::{ForecastError, Result};
use crate::features::{calendar_covariates, FeatureBuilder, CALENDAR_COVARIATES};
use crate::models::{
    require_observations, require_positive_horizon, ForecastModel, ForecastPath,
    TrainedForecastModel, DEFAULT_Z,
};
use crate::series::MetricSeries;
use chrono::NaiveDate;

/// Intercept + day index + calendar covariates
const N_COEFFICIENTS: usize = 2 + CALENDAR_COVARIATES;

/// Ordinary least squares over [1, t, weekend, weekly sin, weekly cos]
#[derive(Debug, Clone)]
pub struct LinearTrend {
    z: f64,
}

impl Default for LinearTrend {
    fn default() -> Self {
        Self { z: DEFAULT_Z }
    }
}

/// Fitted linear trend model
#[derive(Debug, Clone)]
pub struct TrainedLinearTrend {
    coefficients: [f64; N_COEFFICIENTS],
    /// Residual standard error of the in-sample fit
    residual_se: f64,
    n_observations: usize,
    series_start: NaiveDate,
    z: f64,
}

impl LinearTrend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interval multiplier matching a non-default confidence level
    pub fn with_z(mut self, z: f64) -> Self {
        self.z = z;
        self
    }

    fn design_row(series_start: NaiveDate, day_index: usize) -> [f64; N_COEFFICIENTS] {
        let date = series_start + chrono::Duration::days(day_index as i64);
        let cal = calendar_covariates(date);
        [1.0, day_index as f64, cal[0], cal[1], cal[2]]
    }
}

impl ForecastModel for LinearTrend {
    type Trained = TrainedLinearTrend;

    fn fit(&self, series: &MetricSeries) -> Result<Self::Trained> {
        require_observations(self.name(), series, self.minimum_observations())?;

        let values = series.values();
        let n = values.len();
        let feature_rows = FeatureBuilder::new().build(series);

        // Accumulate the normal equations XᵀX w = Xᵀy directly; the
        // system is tiny so there is no need for a matrix library.
        let mut xtx = [[0.0_f64; N_COEFFICIENTS]; N_COEFFICIENTS];
        let mut xty = [0.0_f64; N_COEFFICIENTS];

        for (i, &y) in values.iter().enumerate() {
            let cal = calendar_covariates(feature_rows[i].date);
            let row = [1.0, i as f64, cal[0], cal[1], cal[2]];
            for j in 0..N_COEFFICIENTS {
                xty[j] += row[j] * y;
                for k in 0..N_COEFFICIENTS {
                    xtx[j][k] += row[j] * row[k];
                }
            }
        }

        let coefficients = solve_symmetric(xtx, xty)?;

        // Residual standard error, with the usual degrees-of-freedom
        // correction when the sample allows it
        let mut sse = 0.0;
        for (i, &y) in values.iter().enumerate() {
            let row = Self::design_row(series.start(), i);
            let fitted: f64 = row
                .iter()
                .zip(coefficients.iter())
                .map(|(x, w)| x * w)
                .sum();
            sse += (y - fitted).powi(2);
        }
        let dof = if n > N_COEFFICIENTS {
            (n - N_COEFFICIENTS) as f64
        } else {
            n as f64
        };
        let residual_se = (sse / dof).sqrt();

        Ok(TrainedLinearTrend {
            coefficients,
            residual_se,
            n_observations: n,
            series_start: series.start(),
            z: self.z,
        })
    }

    fn minimum_observations(&self) -> usize {
        7
    }

    fn name(&self) -> &'static str {
        "linear_trend"
    }
}

impl TrainedForecastModel for TrainedLinearTrend {
    fn forecast(&self, horizon: usize) -> Result<ForecastPath> {
        require_positive_horizon(horizon)?;

        let mut values = Vec::with_capacity(horizon);
        let mut margins = Vec::with_capacity(horizon);

        for h in 1..=horizon {
            let day_index = self.n_observations + h - 1;
            let row = LinearTrend::design_row(self.series_start, day_index);
            let point: f64 = row
                .iter()
                .zip(self.coefficients.iter())
                .map(|(x, w)| x * w)
                .sum();
            values.push(point);

            // Interval widens with distance from the training window
            let inflation = (1.0 + h as f64 / self.n_observations as f64).sqrt();
            margins.push(self.z * self.residual_se * inflation);
        }

        ForecastPath::from_margins(values, margins)
    }

    fn name(&self) -> &str {
        "linear_trend"
    }
}

/// Solve a small symmetric positive system by Gaussian elimination with
/// partial pivoting. Errors on a singular design (collinear covariates).
fn solve_symmetric(
    mut a: [[f64; N_COEFFICIENTS]; N_COEFFICIENTS],
    mut b: [f64; N_COEFFICIENTS],
) -> Result<[f64; N_COEFFICIENTS]> {
    const EPS: f64 = 1e-10;
    let n = N_COEFFICIENTS;

    for col in 0..n {
        // Pivot on the largest remaining magnitude in this column
        let mut pivot_row = col;
        for row in col + 1..n {
            if a[row][col].abs() > a[pivot_row][col].abs() {
                pivot_row = row;
            }
        }
        if a[pivot_row][col].abs() < EPS {
            return Err(ForecastError::ForecastingError(
                "Singular design matrix in linear trend fit".to_string(),
            ));
        }
        a.swap(col, pivot_row);
        b.swap(col, pivot_row);

        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    // Back substitution
    let mut x = [0.0_f64; N_COEFFICIENTS];
    for col in (0..n).rev() {
        let mut sum = b[col];
        for k in col + 1..n {
            sum -= a[col][k] * x[k];
        }
        x[col] = sum / a[col][col];
    }

    Ok(x)
}
