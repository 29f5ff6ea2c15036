use super::cinpact::{CinpactError, ControlPoint, blend_sample, validate_control_points};
use super::core::{Point3, Tolerance, Vec3};
use super::kernel::BlendFactor;

pub trait Curve3 {
    fn point_at(&self, t: f64) -> Point3;

    #[must_use]
    fn domain(&self) -> (f64, f64) {
        (0.0, 1.0)
    }

    #[must_use]
    fn derivative_at(&self, t: f64) -> Vec3 {
        let (a, b) = self.domain();
        let span = b - a;
        if !span.is_finite() || span == 0.0 {
            return Vec3::ZERO;
        }

        let h = Tolerance::DERIVATIVE.relative_to(span);
        if !h.is_finite() || h == 0.0 {
            return Vec3::ZERO;
        }

        let t0 = (t - h).max(a);
        let t1 = (t + h).min(b);
        if t1 == t0 {
            return Vec3::ZERO;
        }

        let p0 = self.point_at(t0);
        let p1 = self.point_at(t1);
        p1.sub_point(p0).mul_scalar(1.0 / (t1 - t0))
    }

    /// Unit tangent at `t`, or `None` where the derivative vanishes.
    #[must_use]
    fn tangent_at(&self, t: f64) -> Option<Vec3> {
        self.derivative_at(t).normalized()
    }
}

/// Continuous view of a CINPACT curve.
///
/// Holds a validated snapshot of the control points and evaluates the blend at
/// any parameter, instead of only on the `delta_u` grid used by
/// [`generate`](super::generate). The domain is `[0, N - 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct CinpactCurve3 {
    points: Vec<ControlPoint>,
    blend: BlendFactor,
}

impl CinpactCurve3 {
    /// # Errors
    ///
    /// Returns [`CinpactError`] when a control point has a non-finite position
    /// or invalid `k`/`c`.
    pub fn new(points: Vec<ControlPoint>, interpolate: bool) -> Result<Self, CinpactError> {
        validate_control_points(&points)?;
        Ok(Self {
            points,
            blend: BlendFactor::from_interpolate(interpolate),
        })
    }

    #[must_use]
    pub fn control_points(&self) -> &[ControlPoint] {
        &self.points
    }

    #[must_use]
    pub const fn is_interpolating(&self) -> bool {
        self.blend.is_interpolating()
    }

    /// Blended position at `u`, or `None` when no control point's support
    /// gives a positive weight sum there.
    #[must_use]
    pub fn try_point_at(&self, u: f64) -> Option<Point3> {
        let (position, weight_sum) = blend_sample(&self.points, self.blend, u);
        (weight_sum > 0.0).then_some(position)
    }
}

impl Curve3 for CinpactCurve3 {
    fn point_at(&self, t: f64) -> Point3 {
        self.try_point_at(t).unwrap_or(Point3::ORIGIN)
    }

    fn domain(&self) -> (f64, f64) {
        (0.0, self.points.len().saturating_sub(1) as f64)
    }
}

/// Samples `curve` at `steps + 1` evenly spaced parameters over its domain,
/// both ends included.
#[must_use]
pub fn tessellate_curve_uniform(curve: &impl Curve3, steps: usize) -> Vec<Point3> {
    let steps = steps.max(1);
    let (a, b) = curve.domain();
    (0..=steps)
        .map(|i| {
            let t = if i == steps {
                b
            } else {
                a + (b - a) * (i as f64 / steps as f64)
            };
            curve.point_at(t)
        })
        .collect()
}
