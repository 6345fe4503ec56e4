//! Training-side objective machinery.
//!
//! ## Shared Infrastructure
//!
//! - [`Gradients`]: Structure-of-arrays gradient/Hessian storage
//! - [`Objective`]: Per-sample loss, gradient and Hessian on a [`Numeric`] backend
//! - [`registry`]: Name-based lookup and construction of objectives
//! - [`EarlyStopping`]: Callback for stopping when the metric plateaus
//!
//! ## Batch Evaluation
//!
//! - [`compute_gradient_hessian_into`], [`compute_gradients_into`]: Fill a [`Gradients`] buffer
//! - [`compute_metric`], [`metric_sum`]: Early-stopping metric over a batch
//! - [`check_targets`]: Validate targets before training
//! - [`transform_predictions_inplace`]: Raw scores to the natural scale
//!
//! ## Objectives (Loss Functions)
//!
//! Regression:
//! - [`NegativeBinomialLoss`]: Over-dispersed count regression
//!
//! [`Numeric`]: crate::numeric::Numeric

mod callback;
mod eval;
mod gradients;
mod objectives;

pub use callback::EarlyStopping;
pub use eval::{
    check_targets, compute_gradient_hessian_into, compute_gradients_into, compute_metric,
    metric_sum, transform_predictions_inplace,
};
pub use gradients::Gradients;
pub use objectives::{
    registry, BoostingRegime, EvalError, GradientHessian, LinkFunction, MetricDirection,
    NegativeBinomialLoss, Objective, ObjectiveConfig, ObjectiveError, ObjectiveInfo,
    ObjectiveKind, ObjectiveSummary, ParseLinkError, RegistryError, TaskKind,
};
