//! Weight kernels for CINPACT blending.
//!
//! Two scalar kernels drive every curve sample:
//! - [`falloff_weight`]: the compactly supported bump `A(u, i, c, k)` that makes
//!   the blend local.
//! - [`interpolation_factor`]: the normalized sinc `I(u, i)` that pulls the
//!   curve through its control points when interpolation is enabled.
//!
//! [`BlendFactor`] selects between plain approximation and interpolation once
//! per generation call.

use std::f64::consts::PI;

use super::core::Tolerance;

/// Compact-support falloff weight of control point `i` at parameter `u`.
///
/// Returns exactly `0.0` outside `[i - c, i + c]`. Inside the support the
/// weight is `exp(-k·d² / (c² - d²))` with `d = u - i`, which is `1.0` at the
/// anchor and decays towards the boundary.
///
/// At the support boundary `c² - d²` is zero. Any denominator at or below
/// `f64::EPSILON` is replaced by `f64::EPSILON`, so the result is always finite
/// and lies in `[0, 1]` for `k >= 0`.
///
/// # Examples
///
/// ```
/// use cinpact_engine::geom::falloff_weight;
///
/// assert_eq!(falloff_weight(2.0, 2.0, 1.0, 1.0), 1.0);
/// assert_eq!(falloff_weight(3.5, 2.0, 1.0, 1.0), 0.0);
/// ```
#[must_use]
pub fn falloff_weight(u: f64, i: f64, c: f64, k: f64) -> f64 {
    if u < i - c || u > i + c {
        return 0.0;
    }

    let d = u - i;
    let d_squared = d * d;

    let mut denominator = c * c - d_squared;
    if denominator <= f64::EPSILON {
        denominator = f64::EPSILON;
    }

    (-k * d_squared / denominator).exp()
}

/// Normalized sinc factor `sin(π·d) / (π·d)` with `d = u - i`.
///
/// The singularity at `d = 0` is removed by an explicit branch: whenever
/// `|d| <= Tolerance::SINC_SINGULARITY` the limit value `1.0` is returned.
/// The factor is zero (up to rounding) at every nonzero integer `d` and goes
/// negative between some of those crossings.
///
/// # Examples
///
/// ```
/// use cinpact_engine::geom::interpolation_factor;
///
/// assert_eq!(interpolation_factor(4.0, 4.0), 1.0);
/// assert!(interpolation_factor(5.0, 4.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn interpolation_factor(u: f64, i: f64) -> f64 {
    let d = u - i;
    if Tolerance::SINC_SINGULARITY.approx_zero_f64(d) {
        return 1.0;
    }

    let x = PI * d;
    x.sin() / x
}

/// Per-call choice of the multiplier applied on top of the falloff weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendFactor {
    /// Plain falloff weights; the curve approximates its control points.
    #[default]
    Approximate,
    /// Falloff weights scaled by the sinc factor; the curve passes through
    /// control points at integer parameters.
    Interpolate,
}

impl BlendFactor {
    #[must_use]
    pub const fn from_interpolate(interpolate: bool) -> Self {
        if interpolate {
            Self::Interpolate
        } else {
            Self::Approximate
        }
    }

    #[must_use]
    pub const fn is_interpolating(self) -> bool {
        matches!(self, Self::Interpolate)
    }

    /// Multiplier for the pair `(u, i)`.
    #[inline]
    #[must_use]
    pub fn factor(self, u: f64, i: f64) -> f64 {
        match self {
            Self::Approximate => Unit::factor(u, i),
            Self::Interpolate => Sinc::factor(u, i),
        }
    }

    /// Full blend weight of one control point at `u`.
    ///
    /// Branches on the mode for every call; loops over many samples resolve
    /// the mode once and use [`blend_weight`] with a [`WeightFactor`] instead.
    #[inline]
    #[must_use]
    pub fn weight(self, u: f64, i: f64, c: f64, k: f64) -> f64 {
        match self {
            Self::Approximate => blend_weight::<Unit>(u, i, c, k),
            Self::Interpolate => blend_weight::<Sinc>(u, i, c, k),
        }
    }
}

/// Compile-time choice of the multiplier applied on top of the falloff.
pub(crate) trait WeightFactor: Copy + Send + Sync {
    fn factor(u: f64, i: f64) -> f64;
}

/// Multiplier `1`; plain approximation.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Unit;

impl WeightFactor for Unit {
    #[inline]
    fn factor(_u: f64, _i: f64) -> f64 {
        1.0
    }
}

/// Sinc multiplier; interpolation.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Sinc;

impl WeightFactor for Sinc {
    #[inline]
    fn factor(u: f64, i: f64) -> f64 {
        interpolation_factor(u, i)
    }
}

/// Falloff weight times `F`'s multiplier, skipping the multiplier outside
/// the support.
#[inline]
pub(crate) fn blend_weight<F: WeightFactor>(u: f64, i: f64, c: f64, k: f64) -> f64 {
    let falloff = falloff_weight(u, i, c, k);
    if falloff == 0.0 {
        return 0.0;
    }
    falloff * F::factor(u, i)
}
