use crate::geom::{
    CinpactCurve3, CinpactError, CinpactOptions, ControlPoint, Curve3, Point3, Tolerance, generate,
    sample_parameter, tessellate_curve_uniform,
};

fn zigzag(k: f64, c: f64) -> Vec<ControlPoint> {
    [
        [0.0, 0.0, 0.0],
        [1.0, 2.0, 0.0],
        [2.0, -1.0, 0.5],
        [3.0, 2.0, 0.0],
        [4.0, 0.0, -0.5],
    ]
    .into_iter()
    .map(|p| ControlPoint::new(Point3::from(p), k, c))
    .collect()
}

#[test]
fn interpolating_curve_hits_every_control_point() {
    let points = zigzag(1.0, 2.0);
    let curve = CinpactCurve3::new(points.clone(), true).expect("valid points");
    assert!(curve.is_interpolating());

    let tol = Tolerance::DEFAULT;
    for (index, point) in points.iter().enumerate() {
        let p = curve.point_at(index as f64);
        assert!(tol.approx_eq_point3(p, point.position), "index {index}: {p:?}");
    }
}

#[test]
fn approximating_curve_stays_off_inner_control_points() {
    let points = zigzag(1.0, 2.0);
    let curve = CinpactCurve3::new(points.clone(), false).expect("valid points");
    let p = curve.point_at(1.0);
    assert!(p.distance_to(points[1].position) > 0.1);
}

#[test]
fn domain_spans_control_point_indices() {
    let curve = CinpactCurve3::new(zigzag(1.0, 1.0), false).unwrap();
    assert_eq!(curve.domain(), (0.0, 4.0));
    assert_eq!(curve.control_points().len(), 5);

    let empty = CinpactCurve3::new(Vec::new(), false).unwrap();
    assert_eq!(empty.domain(), (0.0, 0.0));
    assert_eq!(empty.try_point_at(0.0), None);
}

#[test]
fn uncovered_parameters_have_no_point() {
    let curve = CinpactCurve3::new(zigzag(1.0, 0.3), false).unwrap();
    assert_eq!(curve.try_point_at(-5.0), None);
    assert_eq!(curve.try_point_at(0.5), None);
    assert_eq!(curve.point_at(0.5), Point3::ORIGIN);
    assert!(curve.try_point_at(1.1).is_some());
}

#[test]
fn continuous_view_matches_sampled_curve() {
    let points = zigzag(2.0, 1.5);
    let delta_u = 0.05;
    for interpolate in [false, true] {
        let sampled = generate(&points, CinpactOptions::new(delta_u, interpolate)).unwrap();
        let curve = CinpactCurve3::new(points.clone(), interpolate).unwrap();
        for (k, sample) in sampled.iter().enumerate() {
            assert_eq!(curve.point_at(sample_parameter(k, delta_u)), *sample, "k = {k}");
        }
    }
}

#[test]
fn tessellation_covers_whole_domain() {
    let points = zigzag(1.0, 2.0);
    let curve = CinpactCurve3::new(points.clone(), true).unwrap();
    let pts = tessellate_curve_uniform(&curve, 8);
    assert_eq!(pts.len(), 9);

    let tol = Tolerance::DEFAULT;
    assert!(tol.approx_eq_point3(pts[0], points[0].position));
    assert!(tol.approx_eq_point3(pts[8], points[4].position));
    assert!(tol.approx_eq_point3(pts[4], points[2].position));
}

#[test]
fn tangent_follows_colinear_points() {
    let points: Vec<ControlPoint> = (0..4)
        .map(|i| ControlPoint::new(Point3::new(f64::from(i), 0.0, 0.0), 1.0, 1.5))
        .collect();
    let curve = CinpactCurve3::new(points, false).unwrap();
    let tangent = curve.tangent_at(1.5).expect("non-degenerate tangent");
    assert!(tangent.x > 0.99);
    assert_eq!(tangent.y, 0.0);
    assert_eq!(tangent.z, 0.0);
}

#[test]
fn construction_rejects_invalid_points() {
    let mut points = zigzag(1.0, 1.0);
    points[3].k = f64::INFINITY;
    assert_eq!(
        CinpactCurve3::new(points, true),
        Err(CinpactError::InvalidSharpness {
            index: 3,
            k: f64::INFINITY
        })
    );
}
