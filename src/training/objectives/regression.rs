//! Regression objective functions.
//!
//! Scores live in link space; for log-link objectives the prediction is
//! `exp(score)`.

use super::{
    GradientHessian, LinkFunction, MetricDirection, Objective, ObjectiveConfig, ObjectiveError,
    ObjectiveInfo, ObjectiveKind, TaskKind,
};
use crate::numeric::Numeric;

// =============================================================================
// Negative Binomial Loss
// =============================================================================

/// Negative-binomial regression for over-dispersed counts, log link.
///
/// With `p = exp(score)` and dispersion `alpha > 0`:
///
/// - Gradient: `p - target`
/// - Hessian: `p + alpha * p²`
/// - Metric: `(target + 1/alpha) * ln(target + alpha * p) - target * ln(p)`
///
/// The gradient has the Poisson form; over-dispersion only adds curvature,
/// and `alpha → 0` recovers the Poisson Hessian `p`.
///
/// `ln(0)` is reachable when `target = 0` and `p → 0`. Keeping scores bounded
/// is the engine's job.
#[derive(Debug, Clone, Copy)]
pub struct NegativeBinomialLoss<T: Numeric> {
    alpha: T,
    inv_alpha: T,
    alpha_host: f64,
}

impl<T: Numeric> NegativeBinomialLoss<T> {
    pub const INFO: ObjectiveInfo = ObjectiveInfo {
        name: "negative_binomial",
        direction: MetricDirection::Minimize,
        kind: ObjectiveKind::Other,
        task: TaskKind::Regression,
        link: LinkFunction::Log,
        dp_eligible: false,
        has_hessian: true,
    };

    /// Create the objective for `config` with dispersion `alpha`.
    ///
    /// # Errors
    ///
    /// - [`ObjectiveError::NonPrivate`] if `config.differential_privacy` is set.
    /// - [`ObjectiveError::ParamMismatch`] if `config.n_outputs != 1`.
    /// - [`ObjectiveError::InvalidParameter`] if `alpha` is not finite and positive.
    pub fn new(config: &ObjectiveConfig, alpha: f64) -> Result<Self, ObjectiveError> {
        let name = Self::INFO.name;

        // Not proven safe under DP; reject before anything else.
        if config.differential_privacy {
            log::warn!("{name}: rejecting differential-privacy configuration");
            return Err(ObjectiveError::NonPrivate { objective: name });
        }

        if config.n_outputs != 1 {
            log::warn!("{name}: expected 1 output, config has {}", config.n_outputs);
            return Err(ObjectiveError::ParamMismatch {
                objective: name,
                expected: 1,
                got: config.n_outputs,
            });
        }

        if !(alpha.is_finite() && alpha > 0.0) {
            return Err(ObjectiveError::InvalidParameter {
                objective: name,
                name: "alpha",
                value: alpha,
                reason: "must be finite and > 0",
            });
        }

        log::debug!("{name}: constructed with alpha={alpha}");

        Ok(Self {
            alpha: T::splat(alpha),
            inv_alpha: T::splat(1.0 / alpha),
            alpha_host: alpha,
        })
    }

    /// Dispersion parameter.
    #[inline]
    pub fn alpha(&self) -> f64 {
        self.alpha_host
    }
}

impl<T: Numeric> Objective for NegativeBinomialLoss<T> {
    type Value = T;

    fn info(&self) -> ObjectiveInfo {
        Self::INFO
    }

    #[inline]
    fn check_target(&self, target: f64) -> bool {
        target.is_nan() || target.is_infinite()
    }

    #[inline]
    fn calc_metric(&self, score: T, target: T) -> T {
        let prediction = score.exp();
        (target + self.inv_alpha) * (target + self.alpha * prediction).ln()
            - target * prediction.ln()
    }

    #[inline]
    fn calc_gradient(&self, score: T, target: T) -> T {
        score.exp() - target
    }

    #[inline]
    fn calc_gradient_hessian(&self, score: T, target: T) -> GradientHessian<T> {
        let prediction = score.exp();
        GradientHessian::new(
            prediction - target,
            prediction + self.alpha * prediction * prediction,
        )
    }
}

// =============================================================================
// Tests
// =============================================================================
