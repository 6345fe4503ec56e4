//! Objective (loss) functions for gradient boosting.
//!
//! An objective tells the boosting engine, per sample, the gradient and
//! Hessian of the loss with respect to the raw score, plus a contribution to
//! the early-stopping metric.
//!
//! # Backends
//!
//! Objectives are generic over a [`Numeric`] backend. The same formula is
//! instantiated for scalar `f64`/`f32` and for SIMD lane groups; per-sample
//! methods are `#[inline]`, allocation-free and never branch on the backend.
//!
//! # Metadata
//!
//! Each objective declares an [`ObjectiveInfo`] constant (metric direction,
//! family, task, link, privacy eligibility). The [`registry`] reads these
//! without constructing anything.
//!
//! # Available Objectives
//!
//! ## Regression
//! - [`NegativeBinomialLoss`]: Over-dispersed count regression (log link)

mod config;
mod error;
mod link;
mod regression;
pub mod registry;

pub use config::ObjectiveConfig;
pub use error::{EvalError, ObjectiveError, RegistryError};
pub use link::{LinkFunction, ParseLinkError};
pub use regression::NegativeBinomialLoss;

use approx::{AbsDiffEq, RelativeEq};
use serde::Serialize;

use crate::numeric::Numeric;

// =============================================================================
// Task + Metadata
// =============================================================================

/// High-level task kind implied by an objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Regression,
    BinaryClassification,
    MulticlassClassification,
    Ranking,
}

/// Which way the metric should move for early stopping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricDirection {
    Minimize,
    Maximize,
}

impl MetricDirection {
    #[inline]
    pub fn higher_is_better(self) -> bool {
        matches!(self, Self::Maximize)
    }

    /// Whether `value` is strictly better than `best`.
    #[inline]
    pub fn is_improvement(self, value: f64, best: f64) -> bool {
        match self {
            Self::Minimize => value < best,
            Self::Maximize => value > best,
        }
    }
}

/// Objective family tag.
///
/// Engines may special-case known families; everything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveKind {
    Other,
    Rmse,
    LogLossBinary,
    LogLossMulticlass,
}

/// Registration metadata, declared once per objective type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ObjectiveInfo {
    /// Registry name.
    pub name: &'static str,
    /// Early-stopping direction of the metric.
    pub direction: MetricDirection,
    pub kind: ObjectiveKind,
    pub task: TaskKind,
    pub link: LinkFunction,
    /// Whether the objective may be used under differential privacy.
    pub dp_eligible: bool,
    /// Whether `calc_gradient_hessian` yields a true second derivative.
    pub has_hessian: bool,
}

/// Boosting regime an adjustment factor applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoostingRegime {
    GradientBoosting,
    HessianBoosting,
    DifferentialPrivacy,
}

// =============================================================================
// GradientHessian
// =============================================================================

/// Per-sample (gradient, Hessian) pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientHessian<T> {
    pub gradient: T,
    pub hessian: T,
}

impl<T> GradientHessian<T> {
    #[inline]
    pub fn new(gradient: T, hessian: T) -> Self {
        Self { gradient, hessian }
    }
}

impl<T> AbsDiffEq for GradientHessian<T>
where
    T: AbsDiffEq<Epsilon = T> + Copy,
{
    type Epsilon = T;

    fn default_epsilon() -> T {
        T::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: T) -> bool {
        self.gradient.abs_diff_eq(&other.gradient, epsilon)
            && self.hessian.abs_diff_eq(&other.hessian, epsilon)
    }
}

impl<T> RelativeEq for GradientHessian<T>
where
    T: RelativeEq<Epsilon = T> + Copy,
{
    fn default_max_relative() -> T {
        T::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: T, max_relative: T) -> bool {
        self.gradient.relative_eq(&other.gradient, epsilon, max_relative)
            && self.hessian.relative_eq(&other.hessian, epsilon, max_relative)
    }
}

// =============================================================================
// Objective Trait
// =============================================================================

/// A loss function the boosting engine can drive without knowing which
/// objective or backend it is.
///
/// Host-side getters return `f64` and are called once per boosting phase.
/// The `calc_*` methods are called once per sample (or lane group) and must
/// stay pure: no allocation, no panics, no shared mutable state. An instance
/// is immutable after construction, so it can be shared across threads.
///
/// Construction is objective-specific (each type has a fallible `new`), and
/// is where the configuration is validated.
pub trait Objective: Send + Sync {
    /// Numeric backend the per-sample methods run on.
    type Value: Numeric;

    /// Registration metadata.
    fn info(&self) -> ObjectiveInfo;

    /// Returns `true` if `target` must be rejected before training.
    fn check_target(&self, target: f64) -> bool;

    /// Shape parameter for parameterized links, `NaN` when not applicable.
    fn link_param(&self) -> f64 {
        f64::NAN
    }

    /// Learning-rate multiplier under differential privacy.
    ///
    /// WARNING: changing this for a DP-eligible objective without re-deriving
    /// the privacy budget voids the privacy guarantee.
    fn learning_rate_adjustment_differential_privacy(&self) -> f64 {
        1.0
    }

    /// Learning-rate multiplier for gradient-only boosting.
    fn learning_rate_adjustment_gradient_boosting(&self) -> f64 {
        1.0
    }

    /// Learning-rate multiplier for Newton (Hessian) boosting.
    fn learning_rate_adjustment_hessian_boosting(&self) -> f64 {
        1.0
    }

    fn gain_adjustment_gradient_boosting(&self) -> f64 {
        1.0
    }

    fn gain_adjustment_hessian_boosting(&self) -> f64 {
        1.0
    }

    /// Constant factor pulled out of every gradient; the engine applies it once.
    fn gradient_constant(&self) -> f64 {
        1.0
    }

    /// Constant factor pulled out of every Hessian; the engine applies it once.
    fn hessian_constant(&self) -> f64 {
        1.0
    }

    /// Turn an accumulated per-sample metric sum into the reported value.
    fn finish_metric(&self, metric_sum: f64) -> f64 {
        metric_sum
    }

    /// Per-sample metric contribution. Only defined for targets that pass
    /// [`check_target`](Self::check_target).
    fn calc_metric(&self, score: Self::Value, target: Self::Value) -> Self::Value;

    /// First derivative of the loss with respect to the score.
    fn calc_gradient(&self, score: Self::Value, target: Self::Value) -> Self::Value;

    /// First and second derivatives, sharing the inverse-link evaluation.
    fn calc_gradient_hessian(
        &self,
        score: Self::Value,
        target: Self::Value,
    ) -> GradientHessian<Self::Value>;

    /// Snapshot of all host-side getters.
    fn summary(&self) -> ObjectiveSummary
    where
        Self: Sized,
    {
        ObjectiveSummary::of(self)
    }
}

// =============================================================================
// ObjectiveSummary
// =============================================================================

/// Host-side view of an objective, captured once at setup.
///
/// Engines read scaling factors from here instead of calling back into the
/// objective every round.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ObjectiveSummary {
    pub info: ObjectiveInfo,
    pub link_param: f64,
    pub learning_rate_adjustment_differential_privacy: f64,
    pub learning_rate_adjustment_gradient_boosting: f64,
    pub learning_rate_adjustment_hessian_boosting: f64,
    pub gain_adjustment_gradient_boosting: f64,
    pub gain_adjustment_hessian_boosting: f64,
    pub gradient_constant: f64,
    pub hessian_constant: f64,
}

impl ObjectiveSummary {
    pub fn of<O: Objective + ?Sized>(objective: &O) -> Self {
        Self {
            info: objective.info(),
            link_param: objective.link_param(),
            learning_rate_adjustment_differential_privacy: objective
                .learning_rate_adjustment_differential_privacy(),
            learning_rate_adjustment_gradient_boosting: objective
                .learning_rate_adjustment_gradient_boosting(),
            learning_rate_adjustment_hessian_boosting: objective
                .learning_rate_adjustment_hessian_boosting(),
            gain_adjustment_gradient_boosting: objective.gain_adjustment_gradient_boosting(),
            gain_adjustment_hessian_boosting: objective.gain_adjustment_hessian_boosting(),
            gradient_constant: objective.gradient_constant(),
            hessian_constant: objective.hessian_constant(),
        }
    }

    /// Learning-rate multiplier for `regime`.
    pub fn learning_rate_adjustment(&self, regime: BoostingRegime) -> f64 {
        match regime {
            BoostingRegime::GradientBoosting => self.learning_rate_adjustment_gradient_boosting,
            BoostingRegime::HessianBoosting => self.learning_rate_adjustment_hessian_boosting,
            BoostingRegime::DifferentialPrivacy => {
                self.learning_rate_adjustment_differential_privacy
            }
        }
    }

    /// Split-gain multiplier for `regime`.
    ///
    /// Differential-privacy boosting is gradient-only, so it shares the
    /// gradient-boosting factor.
    pub fn gain_adjustment(&self, regime: BoostingRegime) -> f64 {
        match regime {
            BoostingRegime::GradientBoosting | BoostingRegime::DifferentialPrivacy => {
                self.gain_adjustment_gradient_boosting
            }
            BoostingRegime::HessianBoosting => self.gain_adjustment_hessian_boosting,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
