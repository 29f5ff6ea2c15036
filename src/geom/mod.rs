mod cinpact;
mod core;
mod curve;
mod diagnostics;
mod kernel;
mod metrics;

pub use cinpact::{
    CinpactError, CinpactOptions, ControlPoint, MAX_SAMPLE_COUNT, blend_weights, generate,
    generate_from_arrays, generate_with_diagnostics, sample_count, sample_parameter,
};
pub use self::core::{Point3, Tolerance, Vec3};
pub use curve::{CinpactCurve3, Curve3, tessellate_curve_uniform};
pub use diagnostics::CinpactDiagnostics;
pub use kernel::{BlendFactor, falloff_weight, interpolation_factor};
pub use metrics::{CurveMetrics, CurveTimingReport, TimingBucket};

#[cfg(test)]
mod tests;
