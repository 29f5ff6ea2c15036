use cinpact_engine::Engine;
use cinpact_engine::editor::{CurveEditor, EditorError};
use cinpact_engine::geom::{
    CinpactCurve3, CinpactOptions, ControlPoint, Curve3, Point3, Tolerance, generate,
    generate_from_arrays, sample_count,
};

#[test]
fn engine_initializes() {
    let engine = Engine::new();
    assert!(engine.is_initialized());
    assert!(engine.curve_points().is_empty());
    assert_eq!(engine.get_summary(), None);
}

#[test]
fn engine_interpolates_through_added_points() {
    let mut engine = Engine::new();
    engine.add_point(0.0, 0.0, 0.5).expect("add p0");
    engine.add_point(1.0, 1.0, 0.5).expect("add p1");
    engine.add_point(2.0, 0.0, 0.5).expect("add p2");
    engine.set_interpolate(true);
    engine.evaluate().expect("evaluate");

    let curve = engine.curve_points();
    assert_eq!(curve.len(), sample_count(3, 0.01));

    // Sample 99 of the default 0.01 step sits on the middle control point.
    let middle = Point3::from(curve[99]);
    assert!(Tolerance::DEFAULT.approx_eq_point3(middle, Point3::new(1.0, 1.0, 0.5)));
}

#[test]
fn engine_curve_requires_evaluation() {
    let mut engine = Engine::new();
    engine.add_point(0.0, 0.0, 0.0).unwrap();
    assert!(engine.get_curve().is_err(), "curve is stale until evaluate");
}

#[test]
fn engine_matches_library_generation() {
    let mut engine = Engine::new();
    engine.set_delta_u(0.05).unwrap();
    let positions = [[0.0, 0.0, 0.0], [1.0, 2.0, 0.0], [3.0, 1.0, 1.0], [4.0, 3.0, 0.0]];
    for p in positions {
        engine.add_point(p[0], p[1], p[2]).unwrap();
    }
    engine.set_shape(2, 3.0, 0.8).unwrap();
    engine.evaluate().unwrap();

    let mut points: Vec<ControlPoint> = positions
        .iter()
        .map(|&p| ControlPoint::new(Point3::from(p), 1.0, 2.0))
        .collect();
    points[2].k = 3.0;
    points[2].c = 0.8;
    let expected: Vec<[f64; 3]> = generate(&points, CinpactOptions::new(0.05, false))
        .unwrap()
        .into_iter()
        .map(Point3::to_array)
        .collect();

    assert_eq!(engine.curve_points(), expected);
}

#[test]
fn removing_a_point_shifts_later_points_down() {
    let mut engine = Engine::new();
    engine.set_delta_u(0.1).unwrap();
    for x in 0..4 {
        engine.add_point(f64::from(x), f64::from(x % 2), 0.0).unwrap();
    }
    engine.remove_point(1).unwrap();
    engine.evaluate().unwrap();

    let remaining = engine.editor().control_points();
    assert_eq!(remaining.len(), 3);
    assert_eq!(remaining[1].position, Point3::new(2.0, 0.0, 0.0));

    let expected = generate(&remaining, CinpactOptions::new(0.1, false)).unwrap();
    assert_eq!(engine.curve_points().len(), expected.len());
}

#[test]
fn clearing_leaves_an_empty_curve() {
    let mut engine = Engine::new();
    engine.add_point(0.0, 0.0, 0.0).unwrap();
    engine.add_point(1.0, 0.0, 0.0).unwrap();
    engine.evaluate().unwrap();
    assert!(!engine.curve_points().is_empty());

    engine.clear();
    engine.evaluate().unwrap();
    assert!(engine.curve_points().is_empty());
    assert_eq!(engine.get_summary().as_deref(), Some("S:0 kept:0"));
}

#[test]
fn engine_pick_and_selection() {
    let mut engine = Engine::new();
    engine.add_point(0.0, 0.0, 0.5).unwrap();
    engine.add_point(0.5, 0.5, 0.5).unwrap();
    assert_eq!(engine.selected(), Some(1));
    assert_eq!(engine.pick(0.01, 0.0), Some(0));
    assert_eq!(engine.pick(0.25, 0.25), None);
}

#[test]
fn editor_reports_generation_state() {
    let mut editor = CurveEditor::new(CinpactOptions::new(0.1, false));
    editor.add_point(Point3::new(0.0, 0.0, 0.0)).unwrap();
    editor.add_point(Point3::new(1.0, 0.0, 0.0)).unwrap();
    editor.set_shape(0, 1.0, 0.2).unwrap();
    editor.set_shape(1, 1.0, 0.2).unwrap();

    let curve_len = editor.regenerate().unwrap().len();
    let diag = editor.diagnostics().expect("diagnostics after regenerate");
    assert_eq!(diag.sample_count, 9);
    assert_eq!(diag.valid_count, curve_len);
    assert!(diag.dropped_count > 0, "middle of the segment has no support");

    assert_eq!(
        editor.move_point(42, Point3::ORIGIN),
        Err(EditorError::UnknownPoint(42))
    );
}

#[test]
fn array_api_and_curve_view_agree() {
    let positions = [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
        Point3::new(2.0, 0.0, 1.0),
    ];
    let c_values = [1.5, 1.5, 1.5];
    let k_values = [2.0, 2.0, 2.0];
    let sampled = generate_from_arrays(&positions, &c_values, &k_values, 0.25, true).unwrap();
    assert_eq!(sampled.len(), 7);

    let points: Vec<ControlPoint> = positions
        .iter()
        .map(|&p| ControlPoint::new(p, 2.0, 1.5))
        .collect();
    let curve = CinpactCurve3::new(points, true).unwrap();
    assert_eq!(curve.point_at(0.25), sampled[0]);
    assert_eq!(curve.point_at(1.75), sampled[6]);
}
