//! Metric-driven early stopping.
//!
//! The stopping rule reads its direction from the objective's metadata, so a
//! minimized loss such as the negative-binomial metric never has to be
//! negated by the caller.

use super::objectives::{MetricDirection, ObjectiveInfo};

/// Early stopping state.
///
/// # Example
///
/// ```
/// use boosters_objectives::training::{EarlyStopping, NegativeBinomialLoss};
///
/// let info = NegativeBinomialLoss::<f64>::INFO;
/// let mut early_stop = EarlyStopping::for_objective(2, &info);
///
/// let mut stopped_at = None;
/// for (round, metric) in [3.0, 2.5, 2.6, 2.7, 2.8].into_iter().enumerate() {
///     if early_stop.should_stop(metric) {
///         stopped_at = Some(round);
///         break;
///     }
/// }
/// assert_eq!(stopped_at, Some(3));
/// assert_eq!(early_stop.best_round(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct EarlyStopping {
    /// Rounds without improvement tolerated before stopping.
    patience: usize,
    direction: MetricDirection,
    best_value: Option<f64>,
    best_round: usize,
    current_round: usize,
}

impl EarlyStopping {
    pub fn new(patience: usize, direction: MetricDirection) -> Self {
        Self {
            patience,
            direction,
            best_value: None,
            best_round: 0,
            current_round: 0,
        }
    }

    /// Early stopping in the direction `info` declares for its metric.
    pub fn for_objective(patience: usize, info: &ObjectiveInfo) -> Self {
        Self::new(patience, info.direction)
    }

    /// Record this round's metric; returns `true` once `patience` rounds have
    /// passed without improvement.
    ///
    /// A `NaN` metric never counts as an improvement.
    pub fn should_stop(&mut self, value: f64) -> bool {
        let improved = match self.best_value {
            None => !value.is_nan(),
            Some(best) => self.direction.is_improvement(value, best),
        };

        if improved {
            self.best_value = Some(value);
            self.best_round = self.current_round;
        }
        self.current_round += 1;

        let stop = self.current_round - self.best_round > self.patience;
        if stop {
            log::info!(
                "early stopping at round {}, best round {} ({:?})",
                self.current_round - 1,
                self.best_round,
                self.best_value
            );
        }
        stop
    }

    pub fn direction(&self) -> MetricDirection {
        self.direction
    }

    pub fn best_value(&self) -> Option<f64> {
        self.best_value
    }

    pub fn best_round(&self) -> usize {
        self.best_round
    }

    pub fn current_round(&self) -> usize {
        self.current_round
    }

    pub fn reset(&mut self) {
        self.best_value = None;
        self.best_round = 0;
        self.current_round = 0;
    }
}
