//! boosters-objectives: gradient-boosting objectives for Rust.
//!
//! Loss functions supply per-sample gradients, Hessians and metric
//! contributions to a boosting engine, on scalar or SIMD backends.
//!
//! # Key Types
//!
//! - [`Objective`] - The contract every loss function implements
//! - [`NegativeBinomialLoss`] - Over-dispersed count regression, log link
//! - [`ObjectiveConfig`] - Engine-side configuration validated at construction
//! - [`Gradients`] - Output buffer for the batch kernels
//!
//! # Construction by name
//!
//! Use [`training::registry::create`] with strings such as
//! `"negative_binomial:alpha=0.5"`.
//!
//! # Backends
//!
//! See [`numeric::Numeric`]: `f64`, `f32`, `wide::f64x4` and `wide::f32x8`.

// Re-export approx traits for users who want to compare gradients
pub use approx;

pub mod numeric;
pub mod training;
pub mod utils;

// =============================================================================
// Convenience Re-exports
// =============================================================================

pub use numeric::{Element, Numeric};

pub use training::{
    EarlyStopping, GradientHessian, Gradients, MetricDirection, NegativeBinomialLoss, Objective,
    ObjectiveConfig, ObjectiveError, ObjectiveInfo, ObjectiveSummary, RegistryError,
};

// Shared utilities
pub use utils::{Parallelism, run_with_threads};
