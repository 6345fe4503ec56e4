//! Property-based tests for the objective contract.
//!
//! Checks the algebraic laws of the negative-binomial objective over random
//! inputs, and that batch results do not depend on backend or parallelism.

use std::sync::Arc;
use std::thread;

use approx::relative_eq;
use ndarray::Array1;
use proptest::collection::vec as prop_vec;
use proptest::prelude::*;
use wide::{f32x8, f64x4};

use boosters_objectives::training::{
    compute_gradient_hessian_into, compute_metric, Gradients, NegativeBinomialLoss, Objective,
    ObjectiveConfig,
};
use boosters_objectives::Parallelism;

// =============================================================================
// Strategies
// =============================================================================

fn arb_score() -> impl Strategy<Value = f64> {
    -10.0f64..10.0
}

fn arb_target() -> impl Strategy<Value = f64> {
    prop_oneof![(0u32..50).prop_map(f64::from), 0.0f64..100.0]
}

fn arb_alpha() -> impl Strategy<Value = f64> {
    prop_oneof![1e-6f64..1e-2, 1e-2f64..10.0]
}

fn arb_batch() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    (1usize..300).prop_flat_map(|n| (prop_vec(-5.0f64..5.0, n), prop_vec(0u32..20, n)))
        .prop_map(|(scores, targets)| (scores, targets.into_iter().map(f64::from).collect()))
}

fn loss<T: boosters_objectives::Numeric>(alpha: f64) -> NegativeBinomialLoss<T> {
    NegativeBinomialLoss::new(&ObjectiveConfig::default(), alpha).unwrap()
}

// =============================================================================
// Per-sample laws
// =============================================================================

proptest! {
    #[test]
    fn gradient_paths_agree(score in arb_score(), target in arb_target(), alpha in arb_alpha()) {
        let obj = loss::<f64>(alpha);
        prop_assert_eq!(
            obj.calc_gradient(score, target),
            obj.calc_gradient_hessian(score, target).gradient
        );
    }

    #[test]
    fn hessian_dominates_poisson(score in arb_score(), target in arb_target(), alpha in arb_alpha()) {
        let gh = loss::<f64>(alpha).calc_gradient_hessian(score, target);
        let poisson_hessian = score.exp();
        prop_assert!(gh.hessian >= poisson_hessian);
    }

    #[test]
    fn hessian_monotone_in_alpha(
        score in arb_score(),
        target in arb_target(),
        a in arb_alpha(),
        b in arb_alpha(),
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let h_lo = loss::<f64>(lo).calc_gradient_hessian(score, target).hessian;
        let h_hi = loss::<f64>(hi).calc_gradient_hessian(score, target).hessian;
        prop_assert!(h_hi >= h_lo);
    }

    #[test]
    fn finish_metric_is_identity(x in prop::num::f64::NORMAL | prop::num::f64::ZERO) {
        prop_assert_eq!(loss::<f64>(1.0).finish_metric(x), x);
    }

    #[test]
    fn repeated_calls_are_bit_identical(score in arb_score(), target in arb_target()) {
        let obj = loss::<f64>(0.7);
        let first = (obj.calc_metric(score, target), obj.calc_gradient_hessian(score, target));
        let _ = obj.calc_gradient(score + 1.0, target + 1.0);
        let second = (obj.calc_metric(score, target), obj.calc_gradient_hessian(score, target));
        prop_assert_eq!(first.0.to_bits(), second.0.to_bits());
        prop_assert_eq!(first.1.gradient.to_bits(), second.1.gradient.to_bits());
        prop_assert_eq!(first.1.hessian.to_bits(), second.1.hessian.to_bits());
    }

    #[test]
    fn f64_lanes_match_scalar(
        scores in prop::array::uniform4(arb_score()),
        targets in prop::array::uniform4(arb_target()),
        alpha in arb_alpha(),
    ) {
        let scalar = loss::<f64>(alpha);
        let simd = loss::<f64x4>(alpha);
        let gh = simd.calc_gradient_hessian(f64x4::from(scores), f64x4::from(targets));
        let (grads, hess) = (gh.gradient.to_array(), gh.hessian.to_array());
        for i in 0..4 {
            let expected = scalar.calc_gradient_hessian(scores[i], targets[i]);
            prop_assert!(relative_eq!(grads[i], expected.gradient, epsilon = 1e-9, max_relative = 1e-9));
            prop_assert!(relative_eq!(hess[i], expected.hessian, epsilon = 1e-9, max_relative = 1e-9));
        }
    }

    #[test]
    fn f32_lanes_match_scalar(
        scores in prop::array::uniform8(-5.0f32..5.0),
        targets in prop::array::uniform8((0u8..30).prop_map(f32::from)),
    ) {
        let scalar = loss::<f32>(0.5);
        let simd = loss::<f32x8>(0.5);
        let gh = simd.calc_gradient_hessian(f32x8::from(scores), f32x8::from(targets));
        let (grads, hess) = (gh.gradient.to_array(), gh.hessian.to_array());
        for i in 0..8 {
            let expected = scalar.calc_gradient_hessian(scores[i], targets[i]);
            prop_assert!(relative_eq!(grads[i], expected.gradient, epsilon = 1e-3, max_relative = 1e-4));
            prop_assert!(relative_eq!(hess[i], expected.hessian, epsilon = 1e-3, max_relative = 1e-4));
        }
    }
}

// =============================================================================
// Batch laws
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn batch_independent_of_backend_and_parallelism((scores, targets) in arb_batch()) {
        let n = scores.len();
        let scores = Array1::from(scores);
        let targets = Array1::from(targets);

        let mut sequential = Gradients::new(n);
        compute_gradient_hessian_into(
            &loss::<f64>(0.9),
            scores.view(),
            targets.view(),
            &mut sequential,
            Parallelism::Sequential,
        )
        .unwrap();

        let mut parallel = Gradients::new(n);
        compute_gradient_hessian_into(
            &loss::<f64x4>(0.9),
            scores.view(),
            targets.view(),
            &mut parallel,
            Parallelism::Parallel,
        )
        .unwrap();

        for i in 0..n {
            let (sg, sh) = sequential.get(i);
            let (pg, ph) = parallel.get(i);
            prop_assert!(relative_eq!(sg, pg, epsilon = 1e-9, max_relative = 1e-9));
            prop_assert!(relative_eq!(sh, ph, epsilon = 1e-9, max_relative = 1e-9));
        }

        let m_seq = compute_metric(&loss::<f64>(0.9), scores.view(), targets.view(), Parallelism::Sequential).unwrap();
        let m_par = compute_metric(&loss::<f64x4>(0.9), scores.view(), targets.view(), Parallelism::Parallel).unwrap();
        prop_assert!(relative_eq!(m_seq, m_par, epsilon = 1e-9, max_relative = 1e-9));
    }
}

// =============================================================================
// Shared instance
// =============================================================================

#[test]
fn concurrent_readers_see_identical_results() {
    let obj = Arc::new(loss::<f64>(0.3));
    let inputs: Vec<(f64, f64)> = (0..64)
        .map(|i| ((i as f64 - 32.0) / 8.0, (i % 9) as f64))
        .collect();
    let expected: Vec<_> = inputs
        .iter()
        .map(|&(s, t)| obj.calc_gradient_hessian(s, t))
        .collect();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let obj = Arc::clone(&obj);
            let inputs = inputs.clone();
            thread::spawn(move || {
                inputs
                    .iter()
                    .rev()
                    .map(|&(s, t)| obj.calc_gradient_hessian(s, t))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        let mut got = handle.join().unwrap();
        got.reverse();
        assert_eq!(got, expected);
    }
}
