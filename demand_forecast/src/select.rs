//! Deterministic model selection over evaluator scorecards
//!
//! Lowest MAE wins; MAE ties within epsilon are broken by lowest RMSE,
//! and RMSE ties by a fixed priority order, so the same scorecards
//! always produce the same winner.

use crate::error::{ForecastError, Result};
use crate::evaluate::ScoreCard;
use std::cmp::Ordering;

/// Default epsilon under which two error values count as tied
pub const DEFAULT_TIE_EPSILON: f64 = 1e-6;

/// Fixed tie-break priority, earlier wins
const PRIORITY: [&str; 4] = [
    "linear_trend",
    "simple_exponential_smoothing",
    "ets",
    "theta",
];

/// Applies the selection policy to a set of scorecards
#[derive(Debug, Clone)]
pub struct ModelSelector {
    epsilon: f64,
}

impl Default for ModelSelector {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_TIE_EPSILON,
        }
    }
}

impl ModelSelector {
    pub fn new(epsilon: f64) -> Result<Self> {
        if !epsilon.is_finite() || epsilon < 0.0 {
            return Err(ForecastError::InvalidParameter(
                "Tie epsilon must be a non-negative finite number".to_string(),
            ));
        }
        Ok(Self { epsilon })
    }

    /// Pick the winning scorecard, or `NoUsableModel` when every card is
    /// unusable. The caller (the engine) converts that into the naive
    /// fallback; it never surfaces to API consumers.
    pub fn select<'a>(&self, scorecards: &'a [ScoreCard]) -> Result<&'a ScoreCard> {
        let mut winner: Option<&ScoreCard> = None;

        for card in scorecards.iter().filter(|c| c.usable) {
            winner = Some(match winner {
                None => card,
                Some(best) => {
                    if self.beats(card, best) {
                        card
                    } else {
                        best
                    }
                }
            });
        }

        winner.ok_or(ForecastError::NoUsableModel)
    }

    /// Whether `challenger` outranks `incumbent` under the policy
    fn beats(&self, challenger: &ScoreCard, incumbent: &ScoreCard) -> bool {
        match self.compare_metric(challenger.mae, incumbent.mae) {
            Some(Ordering::Less) => return true,
            Some(Ordering::Greater) => return false,
            _ => {}
        }
        match self.compare_metric(challenger.rmse, incumbent.rmse) {
            Some(Ordering::Less) => return true,
            Some(Ordering::Greater) => return false,
            _ => {}
        }
        priority_index(&challenger.model_name) < priority_index(&incumbent.model_name)
    }

    /// Compare two metric values, treating differences within epsilon
    /// as a tie (`None`)
    fn compare_metric(&self, a: Option<f64>, b: Option<f64>) -> Option<Ordering> {
        let (a, b) = (a?, b?);
        if (a - b).abs() <= self.epsilon {
            None
        } else {
            a.partial_cmp(&b)
        }
    }
}

/// Position in the fixed priority order; unknown names sort last
fn priority_index(name: &str) -> usize {
    PRIORITY
        .iter()
        .position(|p| *p == name)
        .unwrap_or(PRIORITY.len())
}
