use std::ops::{Add, AddAssign, Div, Mul, Sub};

use serde::Serialize;

// ─────────────────────────────────────────────────────────────────────────────
// Vec3
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    /// Zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    #[must_use]
    pub const fn length_squared(self) -> f64 {
        self.dot(self)
    }

    #[must_use]
    pub const fn dot(self, rhs: Self) -> f64 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    #[must_use]
    pub fn normalized(self) -> Option<Self> {
        let len = self.length();
        if len.is_finite() && len > 0.0 {
            Some(self.div_scalar(len))
        } else {
            None
        }
    }

    #[must_use]
    pub const fn mul_scalar(self, s: f64) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s)
    }

    #[must_use]
    pub const fn div_scalar(self, s: f64) -> Self {
        Self::new(self.x / s, self.y / s, self.z / s)
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Default for Vec3 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self::Output {
        self.mul_scalar(rhs)
    }
}

impl Div<f64> for Vec3 {
    type Output = Self;
    fn div(self, rhs: f64) -> Self::Output {
        self.div_scalar(rhs)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Point3
// ─────────────────────────────────────────────────────────────────────────────

/// A position in model space. Control points and curve samples are both
/// stored as `Point3`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    /// The origin point (0, 0, 0).
    pub const ORIGIN: Self = Self::new(0.0, 0.0, 0.0);

    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub const fn from_array(arr: [f64; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }

    #[must_use]
    pub const fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Position vector from the origin.
    #[must_use]
    pub const fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    #[must_use]
    pub const fn sub_point(self, rhs: Self) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }

    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        self.sub_point(other).length()
    }

    /// Squared distance measured in the XY plane only.
    #[must_use]
    pub fn distance_squared_xy(self, x: f64, y: f64) -> f64 {
        let dx = self.x - x;
        let dy = self.y - y;
        dx * dx + dy * dy
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Default for Point3 {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl From<[f64; 3]> for Point3 {
    fn from(arr: [f64; 3]) -> Self {
        Self::from_array(arr)
    }
}

impl From<Point3> for [f64; 3] {
    fn from(p: Point3) -> Self {
        p.to_array()
    }
}

impl From<Vec3> for Point3 {
    fn from(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl Sub for Point3 {
    type Output = Vec3;
    fn sub(self, rhs: Self) -> Self::Output {
        self.sub_point(rhs)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tolerance
// ─────────────────────────────────────────────────────────────────────────────

/// Tolerance configuration for curve evaluation.
///
/// Use the named constants instead of scattering literals:
/// - `Tolerance::DEFAULT` - General comparisons (1e-9)
/// - `Tolerance::SINC_SINGULARITY` - Distance below which the sinc kernel returns its limit (1e-9)
/// - `Tolerance::SAMPLE_COUNT` - Snap applied to `span / delta_u` before flooring (1e-9)
/// - `Tolerance::DERIVATIVE` - First derivative numerical step size (1e-6)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    pub eps: f64,
}

impl Tolerance {
    /// Default tolerance (1e-9).
    pub const DEFAULT: Self = Self { eps: 1e-9 };

    /// Below this `|u - i|` the sinc kernel is evaluated as its limit value 1.
    pub const SINC_SINGULARITY: Self = Self { eps: 1e-9 };

    /// Absorbs rounding in `span / delta_u` so an exactly divisible span
    /// still samples its far end.
    pub const SAMPLE_COUNT: Self = Self { eps: 1e-9 };

    /// Step size for numerical differentiation, relative to the domain span.
    pub const DERIVATIVE: Self = Self { eps: 1e-6 };

    #[must_use]
    pub const fn new(eps: f64) -> Self {
        Self { eps }
    }

    #[must_use]
    pub const fn eps_squared(self) -> f64 {
        self.eps * self.eps
    }

    /// Tolerance relative to a span, e.g. a derivative step.
    #[must_use]
    pub fn relative_to(self, span: f64) -> f64 {
        self.eps * span.abs()
    }

    #[must_use]
    pub fn approx_eq_f64(self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.eps
    }

    #[must_use]
    pub fn approx_zero_f64(self, a: f64) -> bool {
        a.abs() <= self.eps
    }

    #[must_use]
    pub fn approx_eq_point3(self, a: Point3, b: Point3) -> bool {
        a.sub_point(b).length_squared() <= self.eps_squared()
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec3_accumulates_in_place() {
        let mut acc = Vec3::ZERO;
        acc += Vec3::new(1.0, 2.0, 3.0) * 0.5;
        acc += Vec3::new(1.0, 0.0, -1.0);
        assert_eq!(acc, Vec3::new(1.5, 1.0, 0.5));
        assert_eq!(Point3::from(acc / 0.5), Point3::new(3.0, 2.0, 1.0));
    }

    #[test]
    fn xy_distance_ignores_depth() {
        let p = Point3::new(3.0, 4.0, 100.0);
        assert_eq!(p.distance_squared_xy(0.0, 0.0), 25.0);
    }

    #[test]
    fn tolerance_point_comparison() {
        let tol = Tolerance::new(1e-6);
        assert!(tol.approx_eq_point3(Point3::new(1.0, 1.0, 1.0), Point3::new(1.0, 1.0, 1.0 + 1e-7)));
        assert!(!tol.approx_eq_point3(Point3::ORIGIN, Point3::new(1e-3, 0.0, 0.0)));
        assert!(Tolerance::default().approx_zero_f64(5e-10));
    }

    #[test]
    fn normalized_rejects_zero_vector() {
        assert!(Vec3::ZERO.normalized().is_none());
        let n = Vec3::new(0.0, 3.0, 4.0).normalized().unwrap();
        assert!(Tolerance::DEFAULT.approx_eq_f64(n.length(), 1.0));
    }
}
