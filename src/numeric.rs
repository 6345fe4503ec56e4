//! Numeric backends for objective kernels.
//!
//! Objectives are written once against [`Numeric`] and instantiated per
//! backend at compile time. A backend is either a plain scalar (`f64`, `f32`)
//! or a fixed-width SIMD lane group (`wide::f64x4`, `wide::f32x8`). Kernels
//! never branch on which backend they run on.
//!
//! # Lanes
//!
//! Every backend carries `LANES` elements of type [`Numeric::Element`]. Batch
//! code moves data in and out through [`Numeric::load`] and [`Numeric::store`],
//! which accept partial chunks so the tail of a batch needs no scalar fallback.

use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Sub};

use wide::{f32x8, f64x4};

// =============================================================================
// Element
// =============================================================================

/// Scalar lane type stored in input and output buffers.
pub trait Element:
    Copy + Debug + Default + PartialEq + PartialOrd + Send + Sync + Into<f64> + 'static
{
    /// Padding value for unused lanes. Safe under both `exp` and `ln`.
    const ONE: Self;
}

impl Element for f64 {
    const ONE: Self = 1.0;
}

impl Element for f32 {
    const ONE: Self = 1.0;
}

// =============================================================================
// Numeric
// =============================================================================

/// Arithmetic capability set required by objective kernels.
///
/// Implementations must be pure: no allocation, no panics, no I/O.
pub trait Numeric:
    Copy
    + Debug
    + Send
    + Sync
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + 'static
{
    /// Lane element type.
    type Element: Element;

    /// Number of elements processed per value.
    const LANES: usize;

    /// Broadcast a literal constant to every lane.
    fn splat(value: f64) -> Self;

    /// Lane-wise natural exponential.
    fn exp(self) -> Self;

    /// Lane-wise natural logarithm.
    fn ln(self) -> Self;

    /// Load up to `LANES` elements; missing lanes are padded with
    /// [`Element::ONE`].
    ///
    /// `src` must hold between 1 and `LANES` elements.
    fn load(src: &[Self::Element]) -> Self;

    /// Write the first `dst.len()` lanes into `dst`.
    ///
    /// `dst` must hold at most `LANES` elements.
    fn store(self, dst: &mut [Self::Element]);
}

impl Numeric for f64 {
    type Element = f64;
    const LANES: usize = 1;

    #[inline]
    fn splat(value: f64) -> Self {
        value
    }

    #[inline]
    fn exp(self) -> Self {
        f64::exp(self)
    }

    #[inline]
    fn ln(self) -> Self {
        f64::ln(self)
    }

    #[inline]
    fn load(src: &[f64]) -> Self {
        src[0]
    }

    #[inline]
    fn store(self, dst: &mut [f64]) {
        dst[0] = self;
    }
}

impl Numeric for f32 {
    type Element = f32;
    const LANES: usize = 1;

    #[inline]
    fn splat(value: f64) -> Self {
        value as f32
    }

    #[inline]
    fn exp(self) -> Self {
        f32::exp(self)
    }

    #[inline]
    fn ln(self) -> Self {
        f32::ln(self)
    }

    #[inline]
    fn load(src: &[f32]) -> Self {
        src[0]
    }

    #[inline]
    fn store(self, dst: &mut [f32]) {
        dst[0] = self;
    }
}

impl Numeric for f64x4 {
    type Element = f64;
    const LANES: usize = 4;

    #[inline]
    fn splat(value: f64) -> Self {
        f64x4::splat(value)
    }

    #[inline]
    fn exp(self) -> Self {
        f64x4::exp(self)
    }

    #[inline]
    fn ln(self) -> Self {
        f64x4::ln(self)
    }

    #[inline]
    fn load(src: &[f64]) -> Self {
        let mut lanes = [<f64 as Element>::ONE; 4];
        lanes[..src.len()].copy_from_slice(src);
        f64x4::from(lanes)
    }

    #[inline]
    fn store(self, dst: &mut [f64]) {
        let lanes = self.to_array();
        dst.copy_from_slice(&lanes[..dst.len()]);
    }
}

impl Numeric for f32x8 {
    type Element = f32;
    const LANES: usize = 8;

    #[inline]
    fn splat(value: f64) -> Self {
        f32x8::splat(value as f32)
    }

    #[inline]
    fn exp(self) -> Self {
        f32x8::exp(self)
    }

    #[inline]
    fn ln(self) -> Self {
        f32x8::ln(self)
    }

    #[inline]
    fn load(src: &[f32]) -> Self {
        let mut lanes = [<f32 as Element>::ONE; 8];
        lanes[..src.len()].copy_from_slice(src);
        f32x8::from(lanes)
    }

    #[inline]
    fn store(self, dst: &mut [f32]) {
        let lanes = self.to_array();
        dst.copy_from_slice(&lanes[..dst.len()]);
    }
}
