//! Batch evaluation of objectives over score/target columns.
//!
//! This is the engine-facing hot path: it walks the input in fixed-size
//! blocks (one rayon task per block in parallel mode), and within a block
//! feeds the objective one backend value at a time, `LANES` samples per
//! call. The final partial lane group is padded by [`Numeric::load`] and
//! trimmed by [`Numeric::store`], so there is no scalar tail loop.
//!
//! Results do not depend on [`Parallelism`], except for the summation order
//! of metric partial sums.

use std::borrow::Cow;

use ndarray::{ArrayView1, ArrayViewMut1};
use rayon::prelude::*;

use super::gradients::Gradients;
use super::objectives::{EvalError, LinkFunction, Objective};
use crate::numeric::{Element, Numeric};
use crate::utils::Parallelism;

/// Samples per parallel task. A multiple of every built-in backend's lane count.
const BLOCK_SIZE: usize = 4096;

/// Lane element type of an objective's backend.
type Elem<O> = <<O as Objective>::Value as Numeric>::Element;

// =============================================================================
// Public API
// =============================================================================

/// Reject the first target the objective marks invalid.
pub fn check_targets<O, E>(objective: &O, targets: ArrayView1<'_, E>) -> Result<(), EvalError>
where
    O: Objective + ?Sized,
    E: Element,
{
    match targets.iter().position(|&t| objective.check_target(t.into())) {
        Some(row) => {
            let value: f64 = targets[row].into();
            log::warn!(
                "{}: invalid target {value} at row {row}",
                objective.info().name
            );
            Err(EvalError::InvalidTarget { row, value })
        }
        None => Ok(()),
    }
}

/// Fill `gradients` with per-sample gradients and Hessians.
pub fn compute_gradient_hessian_into<O: Objective>(
    objective: &O,
    scores: ArrayView1<'_, Elem<O>>,
    targets: ArrayView1<'_, Elem<O>>,
    gradients: &mut Gradients<Elem<O>>,
    parallelism: Parallelism,
) -> Result<(), EvalError> {
    check_len(scores.len(), targets.len())?;
    check_len(scores.len(), gradients.n_samples())?;

    let scores = contiguous(scores);
    let targets = contiguous(targets);
    let (grads, hess) = gradients.slices_mut();

    if parallelism.is_parallel() {
        scores
            .par_chunks(BLOCK_SIZE)
            .zip(targets.par_chunks(BLOCK_SIZE))
            .zip(grads.par_chunks_mut(BLOCK_SIZE).zip(hess.par_chunks_mut(BLOCK_SIZE)))
            .for_each(|((s, t), (g, h))| gradient_hessian_block(objective, s, t, g, h));
    } else {
        scores
            .chunks(BLOCK_SIZE)
            .zip(targets.chunks(BLOCK_SIZE))
            .zip(grads.chunks_mut(BLOCK_SIZE).zip(hess.chunks_mut(BLOCK_SIZE)))
            .for_each(|((s, t), (g, h))| gradient_hessian_block(objective, s, t, g, h));
    }
    Ok(())
}

/// Gradient-only pass. Hessians are set to one.
pub fn compute_gradients_into<O: Objective>(
    objective: &O,
    scores: ArrayView1<'_, Elem<O>>,
    targets: ArrayView1<'_, Elem<O>>,
    gradients: &mut Gradients<Elem<O>>,
    parallelism: Parallelism,
) -> Result<(), EvalError> {
    check_len(scores.len(), targets.len())?;
    check_len(scores.len(), gradients.n_samples())?;

    let scores = contiguous(scores);
    let targets = contiguous(targets);
    let (grads, hess) = gradients.slices_mut();
    hess.fill(<Elem<O> as Element>::ONE);

    if parallelism.is_parallel() {
        scores
            .par_chunks(BLOCK_SIZE)
            .zip(targets.par_chunks(BLOCK_SIZE))
            .zip(grads.par_chunks_mut(BLOCK_SIZE))
            .for_each(|((s, t), g)| gradient_block(objective, s, t, g));
    } else {
        scores
            .chunks(BLOCK_SIZE)
            .zip(targets.chunks(BLOCK_SIZE))
            .zip(grads.chunks_mut(BLOCK_SIZE))
            .for_each(|((s, t), g)| gradient_block(objective, s, t, g));
    }
    Ok(())
}

/// Raw sum of per-sample metric contributions, accumulated in `f64`.
pub fn metric_sum<O: Objective>(
    objective: &O,
    scores: ArrayView1<'_, Elem<O>>,
    targets: ArrayView1<'_, Elem<O>>,
    parallelism: Parallelism,
) -> Result<f64, EvalError> {
    check_len(scores.len(), targets.len())?;

    let scores = contiguous(scores);
    let targets = contiguous(targets);

    let sum: f64 = if parallelism.is_parallel() {
        scores
            .par_chunks(BLOCK_SIZE)
            .zip(targets.par_chunks(BLOCK_SIZE))
            .map(|(s, t)| metric_block(objective, s, t))
            .sum()
    } else {
        scores
            .chunks(BLOCK_SIZE)
            .zip(targets.chunks(BLOCK_SIZE))
            .map(|(s, t)| metric_block(objective, s, t))
            .sum()
    };
    Ok(sum)
}

/// Reported metric: [`Objective::finish_metric`] of the summed contributions.
pub fn compute_metric<O: Objective>(
    objective: &O,
    scores: ArrayView1<'_, Elem<O>>,
    targets: ArrayView1<'_, Elem<O>>,
    parallelism: Parallelism,
) -> Result<f64, EvalError> {
    let sum = metric_sum(objective, scores, targets, parallelism)?;
    Ok(objective.finish_metric(sum))
}

/// Map raw scores to the natural scale through `link`.
///
/// Returns `false`, leaving `scores` untouched, for [`LinkFunction::Custom`].
pub fn transform_predictions_inplace(
    link: LinkFunction,
    link_param: f64,
    mut scores: ArrayViewMut1<'_, f64>,
) -> bool {
    if link == LinkFunction::Custom {
        return false;
    }
    scores.mapv_inplace(|s| link.inverse(s, link_param).unwrap_or(s));
    true
}

// =============================================================================
// Block kernels
// =============================================================================

#[inline]
fn gradient_hessian_block<O: Objective>(
    objective: &O,
    scores: &[Elem<O>],
    targets: &[Elem<O>],
    grads: &mut [Elem<O>],
    hess: &mut [Elem<O>],
) {
    let lanes = <O::Value as Numeric>::LANES;
    for (((s, t), g), h) in scores
        .chunks(lanes)
        .zip(targets.chunks(lanes))
        .zip(grads.chunks_mut(lanes))
        .zip(hess.chunks_mut(lanes))
    {
        let gh = objective.calc_gradient_hessian(
            <O::Value as Numeric>::load(s),
            <O::Value as Numeric>::load(t),
        );
        gh.gradient.store(g);
        gh.hessian.store(h);
    }
}

#[inline]
fn gradient_block<O: Objective>(
    objective: &O,
    scores: &[Elem<O>],
    targets: &[Elem<O>],
    grads: &mut [Elem<O>],
) {
    let lanes = <O::Value as Numeric>::LANES;
    for ((s, t), g) in scores
        .chunks(lanes)
        .zip(targets.chunks(lanes))
        .zip(grads.chunks_mut(lanes))
    {
        objective
            .calc_gradient(<O::Value as Numeric>::load(s), <O::Value as Numeric>::load(t))
            .store(g);
    }
}

#[inline]
fn metric_block<O: Objective>(objective: &O, scores: &[Elem<O>], targets: &[Elem<O>]) -> f64 {
    let lanes = <O::Value as Numeric>::LANES;
    // Sized by the backend, which may be wider than any built-in one.
    let mut lane_values = vec![<Elem<O> as Element>::ONE; lanes];
    let mut sum = 0.0f64;
    for (s, t) in scores.chunks(lanes).zip(targets.chunks(lanes)) {
        let n = s.len();
        objective
            .calc_metric(<O::Value as Numeric>::load(s), <O::Value as Numeric>::load(t))
            .store(&mut lane_values[..n]);
        sum += lane_values[..n]
            .iter()
            .map(|&v| Into::<f64>::into(v))
            .sum::<f64>();
    }
    sum
}

// =============================================================================
// Helpers
// =============================================================================

#[inline]
fn check_len(expected: usize, got: usize) -> Result<(), EvalError> {
    if expected == got {
        Ok(())
    } else {
        Err(EvalError::LengthMismatch { expected, got })
    }
}

/// Borrow the view as a slice, copying only if it is strided.
fn contiguous<E: Clone>(view: ArrayView1<'_, E>) -> Cow<'_, [E]> {
    match view.to_slice() {
        Some(slice) => Cow::Borrowed(slice),
        None => Cow::Owned(view.to_vec()),
    }
}

// =============================================================================
// Tests
// =============================================================================
