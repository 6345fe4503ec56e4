//! Structure-of-Arrays gradient buffer.
//!
//! Gradients and Hessians live in separate contiguous arrays so backends can
//! store whole lane groups with a single slice copy:
//!
//! ```text
//! grads: [s0, s1, s2, ..., sN]
//! hess:  [s0, s1, s2, ..., sN]
//! ```

use ndarray::ArrayView1;

use crate::numeric::Element;

/// Single-output gradient/Hessian buffer.
///
/// # Example
///
/// ```
/// use boosters_objectives::training::Gradients;
///
/// let mut buffer = Gradients::<f64>::new(100);
/// buffer.set(0, -0.5, 1.0);
/// assert_eq!(buffer.get(0), (-0.5, 1.0));
/// assert_eq!(buffer.grads().len(), 100);
/// ```
#[derive(Debug, Clone)]
pub struct Gradients<E: Element> {
    /// Gradient values (∂L/∂score).
    grads: Vec<E>,
    /// Hessian values (∂²L/∂score²).
    hess: Vec<E>,
}

impl<E: Element> Gradients<E> {
    /// Create a zero-initialized buffer for `n_samples` samples.
    pub fn new(n_samples: usize) -> Self {
        Self {
            grads: vec![E::default(); n_samples],
            hess: vec![E::default(); n_samples],
        }
    }

    #[inline]
    pub fn n_samples(&self) -> usize {
        self.grads.len()
    }

    #[inline]
    pub fn get(&self, sample: usize) -> (E, E) {
        (self.grads[sample], self.hess[sample])
    }

    #[inline]
    pub fn set(&mut self, sample: usize, grad: E, hess: E) {
        self.grads[sample] = grad;
        self.hess[sample] = hess;
    }

    #[inline]
    pub fn grads(&self) -> ArrayView1<'_, E> {
        ArrayView1::from(self.grads.as_slice())
    }

    #[inline]
    pub fn hess(&self) -> ArrayView1<'_, E> {
        ArrayView1::from(self.hess.as_slice())
    }

    /// Sum of gradients and Hessians, accumulated in `f64`.
    pub fn sum(&self) -> (f64, f64) {
        self.grads
            .iter()
            .zip(self.hess.iter())
            .fold((0.0, 0.0), |(sg, sh), (&g, &h)| {
                (sg + Into::<f64>::into(g), sh + Into::<f64>::into(h))
            })
    }

    /// Mutable gradient and Hessian slices, for batch kernels.
    #[inline]
    pub(crate) fn slices_mut(&mut self) -> (&mut [E], &mut [E]) {
        (self.grads.as_mut_slice(), self.hess.as_mut_slice())
    }

    /// Reset all values to zero.
    pub fn reset(&mut self) {
        self.grads.fill(E::default());
        self.hess.fill(E::default());
    }
}
