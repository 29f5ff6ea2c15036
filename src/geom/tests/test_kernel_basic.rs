use crate::geom::{BlendFactor, falloff_weight, interpolation_factor};

#[test]
fn falloff_is_zero_outside_support() {
    let (i, c, k) = (3.0, 1.5, 2.0);
    for u in [-10.0, 0.0, 1.49, 4.51, 5.0, 100.0] {
        assert_eq!(falloff_weight(u, i, c, k), 0.0, "u = {u}");
    }
}

#[test]
fn falloff_is_one_at_anchor() {
    for (c, k) in [(0.1, 0.5), (1.0, 1.0), (3.0, 40.0)] {
        let w = falloff_weight(2.0, 2.0, c, k);
        assert!(w > 0.0);
        assert_eq!(w, 1.0);
    }
}

#[test]
fn falloff_is_symmetric_around_anchor() {
    let (i, c, k) = (4.0, 2.0, 1.5);
    for d in [0.25, 0.5, 0.75, 1.0, 1.5, 1.75] {
        assert_eq!(falloff_weight(i + d, i, c, k), falloff_weight(i - d, i, c, k), "d = {d}");
    }
    for d in [0.1, 0.33, 1.9] {
        let diff = falloff_weight(i + d, i, c, k) - falloff_weight(i - d, i, c, k);
        assert!(diff.abs() < 1e-12, "d = {d}");
    }
}

#[test]
fn falloff_strictly_decreases_towards_boundary() {
    let (i, c, k) = (0.0, 1.0, 1.0);
    let mut previous = falloff_weight(i, i, c, k);
    for step in 1..=19 {
        let d = f64::from(step) * 0.05;
        let w = falloff_weight(i + d, i, c, k);
        assert!(w < previous, "not decreasing at d = {d}");
        assert!(w > 0.0);
        previous = w;
    }
}

#[test]
fn falloff_stays_in_unit_interval_at_boundary() {
    for (c, k) in [(1.0, 1.0), (0.5, 10.0), (2.0, 0.1)] {
        for u in [-c, c] {
            let w = falloff_weight(u, 0.0, c, k);
            assert!(w.is_finite());
            assert!((0.0..=1.0).contains(&w));
        }
    }
}

#[test]
fn sharper_kernel_is_narrower() {
    let soft = falloff_weight(0.5, 0.0, 1.0, 1.0);
    let sharp = falloff_weight(0.5, 0.0, 1.0, 10.0);
    assert!(sharp < soft);
}

#[test]
fn sinc_limit_at_anchor() {
    assert_eq!(interpolation_factor(2.0, 2.0), 1.0);
    assert_eq!(interpolation_factor(2.0 + 1e-12, 2.0), 1.0);
    let near = interpolation_factor(2.0 + 1e-6, 2.0);
    assert!((near - 1.0).abs() < 1e-10);
    assert!(near <= 1.0);
}

#[test]
fn sinc_vanishes_at_nonzero_integers() {
    let i = 3.0;
    for n in (-5..=5).filter(|n| *n != 0) {
        let value = interpolation_factor(i + f64::from(n), i);
        assert!(value.abs() < 1e-12, "n = {n}, value = {value}");
    }
}

#[test]
fn sinc_is_symmetric_and_bounded() {
    for d in [0.1, 0.5, 1.3, 2.7] {
        let a = interpolation_factor(d, 0.0);
        let b = interpolation_factor(-d, 0.0);
        assert!((a - b).abs() < 1e-15);
        assert!(a <= 1.0 && a > -0.25);
    }
    assert!(interpolation_factor(1.5, 0.0) < 0.0);
}

#[test]
fn interpolate_blend_multiplies_both_kernels() {
    let (u, i, c, k) = (1.3, 1.0, 2.0, 1.0);
    let expected = falloff_weight(u, i, c, k) * interpolation_factor(u, i);
    assert_eq!(BlendFactor::Interpolate.weight(u, i, c, k), expected);
    assert_eq!(BlendFactor::Approximate.weight(u, i, c, k), falloff_weight(u, i, c, k));
}
