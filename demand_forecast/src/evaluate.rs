//! Holdout backtesting of the candidate pool
//!
//! Each candidate is fit on the series truncated before the holdout
//! window and scored against the held-out actuals. Candidates that
//! cannot meet their minimum window are recorded as unusable rather
//! than silently dropped, and one candidate's failure never aborts the
//! others.

use crate::error::{ForecastError, Result};
use crate::metrics::forecast_accuracy;
use crate::models::Candidate;
use crate::series::MetricSeries;
use serde::Serialize;

/// Default holdout window: the most recent observed week
pub const DEFAULT_HOLDOUT_DAYS: usize = 7;

/// Accuracy summary for one candidate. Metric fields are `None` exactly
/// when the candidate was unusable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreCard {
    pub model_name: String,
    pub mae: Option<f64>,
    pub rmse: Option<f64>,
    pub r_squared: Option<f64>,
    pub usable: bool,
}

impl ScoreCard {
    /// Card for a candidate that could not be fit
    pub fn unusable(model_name: &str) -> Self {
        Self {
            model_name: model_name.to_string(),
            mae: None,
            rmse: None,
            r_squared: None,
            usable: false,
        }
    }
}

/// One candidate's holdout fit, kept only for the duration of a single
/// engine invocation
#[derive(Debug, Clone)]
pub struct CandidateFit {
    pub model_name: String,
    pub holdout_predictions: Vec<f64>,
    pub holdout_actuals: Vec<f64>,
}

/// Everything the evaluator learned in one pass
#[derive(Debug)]
pub struct EvaluationReport {
    pub scorecards: Vec<ScoreCard>,
    pub fits: Vec<CandidateFit>,
}

/// Backtests candidates over a trailing holdout window
#[derive(Debug, Clone)]
pub struct Evaluator {
    holdout: usize,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self {
            holdout: DEFAULT_HOLDOUT_DAYS,
        }
    }
}

impl Evaluator {
    pub fn new(holdout: usize) -> Result<Self> {
        if holdout == 0 {
            return Err(ForecastError::InvalidParameter(
                "Holdout window must be positive".to_string(),
            ));
        }
        Ok(Self { holdout })
    }

    pub fn holdout(&self) -> usize {
        self.holdout
    }

    /// Score every candidate against the trailing holdout window.
    ///
    /// Fails with `InsufficientData` when the series leaves no training
    /// prefix at all; otherwise always returns one scorecard per
    /// candidate, usable or not.
    pub fn evaluate(
        &self,
        series: &MetricSeries,
        candidates: &[Box<dyn Candidate>],
    ) -> Result<EvaluationReport> {
        if series.len() <= self.holdout {
            return Err(ForecastError::InsufficientData(format!(
                "series of {} observations cannot spare a {}-day holdout",
                series.len(),
                self.holdout
            )));
        }

        let train_len = series.len() - self.holdout;
        let training = series.head(train_len);
        let actuals = series.tail(self.holdout);

        let mut scorecards = Vec::with_capacity(candidates.len());
        let mut fits = Vec::new();

        for candidate in candidates {
            if train_len < candidate.minimum_observations() {
                scorecards.push(ScoreCard::unusable(candidate.name()));
                continue;
            }

            // Failures stay local to the candidate that produced them
            let path = candidate
                .fit_boxed(&training)
                .and_then(|trained| trained.forecast(self.holdout));

            match path {
                Ok(path) => {
                    let accuracy = forecast_accuracy(path.values(), actuals)?;
                    scorecards.push(ScoreCard {
                        model_name: candidate.name().to_string(),
                        mae: Some(accuracy.mae),
                        rmse: Some(accuracy.rmse),
                        r_squared: Some(accuracy.r_squared),
                        usable: true,
                    });
                    fits.push(CandidateFit {
                        model_name: candidate.name().to_string(),
                        holdout_predictions: path.values().to_vec(),
                        holdout_actuals: actuals.to_vec(),
                    });
                }
                Err(_) => scorecards.push(ScoreCard::unusable(candidate.name())),
            }
        }

        Ok(EvaluationReport { scorecards, fits })
    }
}
