//! CINPACT curve generation.
//!
//! A CINPACT curve blends an ordered list of control points with compactly
//! supported weights. Control point `i` sits at parameter `u = i` and only
//! influences `u` in `[i - c, i + c]`. For each parameter sample the weights of
//! all control points are summed and the weighted positions are divided by that
//! sum (partition of unity).
//!
//! Generation runs in two passes:
//!
//! 1. **Evaluation**: every sample `k` owns slot `k` in two pre-sized buffers
//!    (blended position and raw weight sum). Samples are independent, so with
//!    the `parallel` feature the buffers are filled by rayon without locking.
//! 2. **Compaction**: after all slots are written, one sequential pass keeps the
//!    samples whose weight sum is strictly positive, in ascending parameter
//!    order.
//!
//! The sampling domain is `[delta_u, N - 1 - delta_u]` for `N` control points.
//! Fewer than two control points, or a domain that collapses, produce an empty
//! curve rather than an error.

use serde::Serialize;

use super::core::{Point3, Tolerance, Vec3};
use super::diagnostics::CinpactDiagnostics;
use super::kernel::{BlendFactor, Sinc, Unit, WeightFactor, blend_weight};
use super::metrics::{CurveMetrics, TimingBucket};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// One blend anchor: a position plus its shape parameters.
///
/// The control point's index in the input slice is its parameter-domain
/// anchor; it is not stored here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ControlPoint {
    pub position: Point3,
    /// Sharpness. Larger values give a peakier, narrower influence.
    pub k: f64,
    /// Support radius along the parameter axis.
    pub c: f64,
}

impl ControlPoint {
    #[must_use]
    pub const fn new(position: Point3, k: f64, c: f64) -> Self {
        Self { position, k, c }
    }
}

/// Options for one generation call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CinpactOptions {
    /// Parameter step between samples. Must be finite and `> 0`.
    pub delta_u: f64,
    /// Multiply falloff weights by the sinc factor so the curve passes
    /// through its control points.
    pub interpolate: bool,
}

impl Default for CinpactOptions {
    fn default() -> Self {
        Self {
            delta_u: 0.01,
            interpolate: false,
        }
    }
}

impl CinpactOptions {
    #[must_use]
    pub const fn new(delta_u: f64, interpolate: bool) -> Self {
        Self {
            delta_u,
            interpolate,
        }
    }

    #[must_use]
    pub const fn with_interpolate(mut self, interpolate: bool) -> Self {
        self.interpolate = interpolate;
        self
    }

    #[must_use]
    pub const fn with_delta_u(mut self, delta_u: f64) -> Self {
        self.delta_u = delta_u;
        self
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CinpactError {
    #[error(
        "control point arrays differ in length: {positions} positions, {c_values} c values, {k_values} k values"
    )]
    LengthMismatch {
        positions: usize,
        c_values: usize,
        k_values: usize,
    },
    #[error("delta_u must be finite and > 0, got {0}")]
    InvalidDeltaU(f64),
    #[error("control point {index} has a non-finite position")]
    NonFinitePosition { index: usize },
    #[error("control point {index}: k must be finite and >= 0, got {k}")]
    InvalidSharpness { index: usize, k: f64 },
    #[error("control point {index}: c must be finite and > 0, got {c}")]
    InvalidSupport { index: usize, c: f64 },
    #[error("{count} samples exceed the limit of {MAX_SAMPLE_COUNT}; increase delta_u")]
    TooManySamples { count: usize },
}

/// Largest number of parameter samples one generation call will allocate.
pub const MAX_SAMPLE_COUNT: usize = 1 << 24;

/// Number of parameter samples for `control_point_count` points at step
/// `delta_u`.
///
/// The domain is `[delta_u, N - 1 - delta_u]` with both ends included, so the
/// count is `floor(span / delta_u) + 1` where `span = N - 1 - 2·delta_u`.
/// Returns 0 for fewer than two points, a non-positive span, or an invalid
/// `delta_u`. Saturates at `usize::MAX` for steps too small to count.
///
/// # Examples
///
/// ```
/// use cinpact_engine::geom::sample_count;
///
/// assert_eq!(sample_count(2, 0.1), 9);
/// assert_eq!(sample_count(1, 0.1), 0);
/// assert_eq!(sample_count(2, 0.5), 0);
/// ```
#[must_use]
pub fn sample_count(control_point_count: usize, delta_u: f64) -> usize {
    if control_point_count < 2 || !delta_u.is_finite() || delta_u <= 0.0 {
        return 0;
    }

    let span = (control_point_count - 1) as f64 - 2.0 * delta_u;
    if span <= 0.0 {
        return 0;
    }

    let steps = (span / delta_u + Tolerance::SAMPLE_COUNT.eps).floor();
    if !steps.is_finite() || steps >= usize::MAX as f64 {
        return usize::MAX;
    }
    (steps as usize).saturating_add(1)
}

/// Parameter value of sample `k`: `delta_u + k·delta_u`.
#[inline]
#[must_use]
pub fn sample_parameter(k: usize, delta_u: f64) -> f64 {
    delta_u + k as f64 * delta_u
}

/// Generates the curve for `points`.
///
/// # Errors
///
/// Returns [`CinpactError`] when `delta_u` or a control point's parameters
/// are invalid, or [`CinpactError::TooManySamples`] when the domain holds more
/// than [`MAX_SAMPLE_COUNT`] samples. Degenerate domains are not errors; they
/// yield an empty curve.
///
/// # Examples
///
/// ```
/// use cinpact_engine::geom::{CinpactOptions, ControlPoint, Point3, generate};
///
/// let points = [
///     ControlPoint::new(Point3::new(0.0, 0.0, 0.0), 1.0, 1.0),
///     ControlPoint::new(Point3::new(1.0, 0.0, 0.0), 1.0, 1.0),
/// ];
/// let curve = generate(&points, CinpactOptions::new(0.1, false)).unwrap();
/// assert_eq!(curve.len(), 9);
/// ```
pub fn generate(points: &[ControlPoint], options: CinpactOptions) -> Result<Vec<Point3>, CinpactError> {
    generate_with_diagnostics(points, options).map(|(curve, _)| curve)
}

/// Array form of [`generate`]: positions and per-point `c`/`k` values in
/// parallel slices of equal length.
///
/// # Errors
///
/// Returns [`CinpactError::LengthMismatch`] when the slices differ in length,
/// plus every error [`generate`] can return.
pub fn generate_from_arrays(
    positions: &[Point3],
    c_values: &[f64],
    k_values: &[f64],
    delta_u: f64,
    interpolate: bool,
) -> Result<Vec<Point3>, CinpactError> {
    if positions.len() != c_values.len() || positions.len() != k_values.len() {
        return Err(CinpactError::LengthMismatch {
            positions: positions.len(),
            c_values: c_values.len(),
            k_values: k_values.len(),
        });
    }

    let points: Vec<ControlPoint> = positions
        .iter()
        .zip(c_values.iter().zip(k_values))
        .map(|(&position, (&c, &k))| ControlPoint::new(position, k, c))
        .collect();

    generate(&points, CinpactOptions::new(delta_u, interpolate))
}

/// Generates the curve and reports per-call statistics.
///
/// # Errors
///
/// See [`generate`].
pub fn generate_with_diagnostics(
    points: &[ControlPoint],
    options: CinpactOptions,
) -> Result<(Vec<Point3>, CinpactDiagnostics), CinpactError> {
    validate_options(options)?;
    validate_control_points(points)?;

    let blend = BlendFactor::from_interpolate(options.interpolate);
    let count = sample_count(points.len(), options.delta_u);

    let mut diagnostics = CinpactDiagnostics {
        sample_count: count,
        interpolated: blend.is_interpolating(),
        ..CinpactDiagnostics::default()
    };

    if count == 0 {
        log::debug!(
            "cinpact: empty domain for {} control points at delta_u {}",
            points.len(),
            options.delta_u
        );
        return Ok((Vec::new(), diagnostics));
    }

    if count > MAX_SAMPLE_COUNT {
        return Err(CinpactError::TooManySamples { count });
    }

    let mut positions = sample_buffer(count, Point3::ORIGIN)?;
    let mut weight_sums = sample_buffer(count, 0.0_f64)?;

    let mut metrics = CurveMetrics::default();
    metrics.begin();

    metrics.time(TimingBucket::Evaluation, || match blend {
        BlendFactor::Approximate => {
            evaluate_samples::<Unit>(points, options.delta_u, &mut positions, &mut weight_sums);
        }
        BlendFactor::Interpolate => {
            evaluate_samples::<Sinc>(points, options.delta_u, &mut positions, &mut weight_sums);
        }
    });

    let curve = metrics.time(TimingBucket::Compaction, || {
        compact_samples(positions, &weight_sums, &mut diagnostics)
    });

    diagnostics.dropped_count = count - diagnostics.valid_count;
    diagnostics.timing = metrics.end();

    if diagnostics.subnormal_weight_count > 0 {
        log::warn!(
            "cinpact: {} samples normalized by a subnormal weight sum",
            diagnostics.subnormal_weight_count
        );
    }
    log::debug!("cinpact: {}", diagnostics.summary());

    Ok((curve, diagnostics))
}

/// Blended position and raw weight sum at parameter `u`.
///
/// The position is normalized when the weight sum is strictly positive and
/// left at the origin otherwise.
pub(crate) fn blend_sample(points: &[ControlPoint], blend: BlendFactor, u: f64) -> (Point3, f64) {
    match blend {
        BlendFactor::Approximate => blend_sample_with::<Unit>(points, u),
        BlendFactor::Interpolate => blend_sample_with::<Sinc>(points, u),
    }
}

#[inline]
fn blend_sample_with<F: WeightFactor>(points: &[ControlPoint], u: f64) -> (Point3, f64) {
    let mut weight_sum = 0.0;
    let mut weighted = Vec3::ZERO;

    for (index, point) in points.iter().enumerate() {
        let weight = blend_weight::<F>(u, index as f64, point.c, point.k);
        if weight == 0.0 {
            continue;
        }
        weight_sum += weight;
        weighted += point.position.to_vec3() * weight;
    }

    if weight_sum > 0.0 {
        (Point3::from(weighted / weight_sum), weight_sum)
    } else {
        (Point3::ORIGIN, weight_sum)
    }
}

/// Raw blend weight of every control point at `u`, in input order.
#[must_use]
pub fn blend_weights(points: &[ControlPoint], u: f64, interpolate: bool) -> Vec<f64> {
    if interpolate {
        weights_with::<Sinc>(points, u)
    } else {
        weights_with::<Unit>(points, u)
    }
}

fn weights_with<F: WeightFactor>(points: &[ControlPoint], u: f64) -> Vec<f64> {
    points
        .iter()
        .enumerate()
        .map(|(index, point)| blend_weight::<F>(u, index as f64, point.c, point.k))
        .collect()
}

/// Pre-sized slot buffer; allocation failure is reported instead of aborting.
fn sample_buffer<T: Clone>(count: usize, fill: T) -> Result<Vec<T>, CinpactError> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(count)
        .map_err(|_| CinpactError::TooManySamples { count })?;
    buffer.resize(count, fill);
    Ok(buffer)
}

#[cfg(feature = "parallel")]
fn evaluate_samples<F: WeightFactor>(
    points: &[ControlPoint],
    delta_u: f64,
    positions: &mut [Point3],
    weight_sums: &mut [f64],
) {
    positions
        .par_iter_mut()
        .zip(weight_sums.par_iter_mut())
        .enumerate()
        .for_each(|(k, (position, weight_sum))| {
            (*position, *weight_sum) = blend_sample_with::<F>(points, sample_parameter(k, delta_u));
        });
}

#[cfg(not(feature = "parallel"))]
fn evaluate_samples<F: WeightFactor>(
    points: &[ControlPoint],
    delta_u: f64,
    positions: &mut [Point3],
    weight_sums: &mut [f64],
) {
    for (k, (position, weight_sum)) in positions.iter_mut().zip(weight_sums.iter_mut()).enumerate() {
        (*position, *weight_sum) = blend_sample_with::<F>(points, sample_parameter(k, delta_u));
    }
}

fn compact_samples(
    positions: Vec<Point3>,
    weight_sums: &[f64],
    diagnostics: &mut CinpactDiagnostics,
) -> Vec<Point3> {
    let mut curve = Vec::with_capacity(positions.len());
    for (position, &weight_sum) in positions.into_iter().zip(weight_sums) {
        if weight_sum > 0.0 {
            diagnostics.record_weight_sum(weight_sum);
            curve.push(position);
        }
    }
    curve
}

fn validate_options(options: CinpactOptions) -> Result<(), CinpactError> {
    if !options.delta_u.is_finite() || options.delta_u <= 0.0 {
        return Err(CinpactError::InvalidDeltaU(options.delta_u));
    }
    Ok(())
}

pub(crate) fn validate_control_points(points: &[ControlPoint]) -> Result<(), CinpactError> {
    for (index, point) in points.iter().enumerate() {
        if !point.position.is_finite() {
            return Err(CinpactError::NonFinitePosition { index });
        }
        if !point.k.is_finite() || point.k < 0.0 {
            return Err(CinpactError::InvalidSharpness { index, k: point.k });
        }
        if !point.c.is_finite() || point.c <= 0.0 {
            return Err(CinpactError::InvalidSupport { index, c: point.c });
        }
    }
    Ok(())
}
