#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(err) = native::run() {
        eprintln!("curve_cli error: {err}");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use cinpact_engine::geom::{
        CinpactDiagnostics, CinpactOptions, ControlPoint, Point3, generate_with_diagnostics,
    };
    use std::fmt::Write as _;
    use std::fs::{self, File};
    use std::io::{BufWriter, Write};
    use std::path::{Path, PathBuf};

    const SNAPSHOT_QUANTIZE: f64 = 1e-6;
    const SNAPSHOT_DECIMALS: usize = 6;

    const USAGE: &str = r"curve_cli (cinpact-engine)

USAGE:
  curve_cli list
  curve_cli run <scenario|all> [options]

SCENARIOS:
  two_point_segment
  colinear_interpolate
  zigzag_approximate
  zigzag_interpolate
  wide_support_spiral

OPTIONS (run):
  --out-dir <dir>    Write <scenario>.obj and/or <scenario>.snap to this dir (required for `all`)
  --obj <path>       Write OBJ polyline (single scenario only)
  --snap <path>      Write golden-style snapshot (single scenario only)
  --no-obj           Skip OBJ when using --out-dir
  --no-snap          Skip snapshot when using --out-dir
  --overwrite        Overwrite existing output files
  --interpolate      Force interpolation on for every scenario
  --delta-u <value>  Override the scenario parameter step
  -h, --help         Show this help
";

    pub fn run() -> Result<(), String> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut args = Args::new(args);

        let Some(command) = args.next() else {
            print_usage();
            return Ok(());
        };

        match command.as_str() {
            "list" => {
                print_scenarios();
                Ok(())
            }
            "run" => cmd_run(&mut args),
            "-h" | "--help" | "help" => {
                print_usage();
                Ok(())
            }
            other => Err(format!("unknown command `{other}`\n\n{USAGE}")),
        }
    }

    fn print_usage() {
        println!("{USAGE}");
    }

    fn print_scenarios() {
        for scenario in Scenario::ALL {
            println!("{}", scenario.name());
        }
    }

    #[derive(Debug, Clone, Copy, Default)]
    struct Overrides {
        interpolate: bool,
        delta_u: Option<f64>,
    }

    impl Overrides {
        fn apply(self, mut options: CinpactOptions) -> CinpactOptions {
            if self.interpolate {
                options.interpolate = true;
            }
            if let Some(delta_u) = self.delta_u {
                options.delta_u = delta_u;
            }
            options
        }
    }

    fn cmd_run(args: &mut Args) -> Result<(), String> {
        let scenario_name = args.next().ok_or("missing scenario name")?;

        let mut out_dir: Option<PathBuf> = None;
        let mut obj_path: Option<PathBuf> = None;
        let mut snap_path: Option<PathBuf> = None;
        let mut overwrite = false;
        let mut write_obj = true;
        let mut write_snap = true;
        let mut overrides = Overrides::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--out-dir" => out_dir = Some(PathBuf::from(args.value("--out-dir")?)),
                "--obj" => obj_path = Some(PathBuf::from(args.value("--obj")?)),
                "--snap" => snap_path = Some(PathBuf::from(args.value("--snap")?)),
                "--overwrite" => overwrite = true,
                "--no-obj" => write_obj = false,
                "--no-snap" => write_snap = false,
                "--interpolate" => overrides.interpolate = true,
                "--delta-u" => {
                    let raw = args.value("--delta-u")?;
                    let delta_u = raw
                        .parse::<f64>()
                        .map_err(|e| format!("invalid --delta-u `{raw}`: {e}"))?;
                    overrides.delta_u = Some(delta_u);
                }
                "-h" | "--help" => {
                    print_usage();
                    return Ok(());
                }
                other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
            }
        }

        if let Some(dir) = out_dir.as_ref() {
            if obj_path.is_some() || snap_path.is_some() {
                return Err("use either --out-dir or --obj/--snap (not both)".to_string());
            }
            if !write_obj && !write_snap {
                return Err("nothing to write (both --no-obj and --no-snap set)".to_string());
            }

            fs::create_dir_all(dir).map_err(|e| format!("create out dir: {e}"))?;

            if scenario_name == "all" {
                for scenario in Scenario::ALL {
                    run_one_scenario_to_dir(*scenario, overrides, dir, write_obj, write_snap, overwrite)?;
                }
                return Ok(());
            }

            let scenario = Scenario::from_str(scenario_name.as_str())
                .ok_or_else(|| unknown_scenario(&scenario_name))?;
            return run_one_scenario_to_dir(scenario, overrides, dir, write_obj, write_snap, overwrite);
        }

        if scenario_name == "all" {
            return Err("`run all` requires --out-dir".to_string());
        }

        let scenario =
            Scenario::from_str(scenario_name.as_str()).ok_or_else(|| unknown_scenario(&scenario_name))?;
        let output = run_scenario(scenario, overrides)?;

        if let Some(path) = snap_path.as_deref() {
            write_text_file(path, &output.snapshot, overwrite)?;
            eprintln!("wrote {}", path.display());
        } else {
            print!("{}", output.snapshot);
        }

        if let Some(path) = obj_path.as_deref() {
            write_obj_file(path, &output.curve, output.name, overwrite)?;
            eprintln!("wrote {}", path.display());
        }

        eprintln!("{}: {}", output.name, output.diagnostics.summary());
        Ok(())
    }

    fn run_one_scenario_to_dir(
        scenario: Scenario,
        overrides: Overrides,
        dir: &Path,
        write_obj: bool,
        write_snap: bool,
        overwrite: bool,
    ) -> Result<(), String> {
        let output = run_scenario(scenario, overrides)?;

        if write_snap {
            let path = dir.join(format!("{}.snap", output.name));
            write_text_file(&path, &output.snapshot, overwrite)?;
            eprintln!("wrote {}", path.display());
        }

        if write_obj {
            let path = dir.join(format!("{}.obj", output.name));
            write_obj_file(&path, &output.curve, output.name, overwrite)?;
            eprintln!("wrote {}", path.display());
        }

        eprintln!("{}: {}", output.name, output.diagnostics.summary());
        Ok(())
    }

    fn unknown_scenario(name: &str) -> String {
        let mut msg = format!("unknown scenario `{name}`\n\navailable scenarios:\n");
        for scenario in Scenario::ALL {
            let _ = writeln!(msg, "  {}", scenario.name());
        }
        msg
    }

    fn write_text_file(path: &Path, text: &str, overwrite: bool) -> Result<(), String> {
        if path.exists() && !overwrite {
            return Err(format!(
                "refusing to overwrite existing file {} (use --overwrite)",
                path.display()
            ));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| format!("create dir {}: {e}", parent.display()))?;
        }
        fs::write(path, normalize_snapshot_text(text)).map_err(|e| format!("write {}: {e}", path.display()))
    }

    fn write_obj_file(path: &Path, curve: &[Point3], name: &str, overwrite: bool) -> Result<(), String> {
        if path.exists() && !overwrite {
            return Err(format!(
                "refusing to overwrite existing file {} (use --overwrite)",
                path.display()
            ));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| format!("create dir {}: {e}", parent.display()))?;
        }

        let file = File::create(path).map_err(|e| format!("create {}: {e}", path.display()))?;
        let mut w = BufWriter::new(file);

        writeln!(w, "# cinpact-engine curve_cli").map_err(|e| format!("write obj: {e}"))?;
        writeln!(w, "o {name}").map_err(|e| format!("write obj: {e}"))?;

        for p in curve {
            writeln!(w, "v {} {} {}", p.x, p.y, p.z).map_err(|e| format!("write obj: {e}"))?;
        }

        if curve.len() >= 2 {
            let mut line = String::from("l");
            for index in 1..=curve.len() {
                let _ = write!(line, " {index}");
            }
            writeln!(w, "{line}").map_err(|e| format!("write obj: {e}"))?;
        }

        w.flush().map_err(|e| format!("flush {}: {e}", path.display()))
    }

    fn normalize_snapshot_text(text: &str) -> String {
        let normalized = text.replace("\r\n", "\n");
        if normalized.ends_with('\n') {
            normalized
        } else {
            format!("{normalized}\n")
        }
    }

    fn quantize_f64(value: f64) -> f64 {
        if !value.is_finite() {
            return value;
        }
        let value = if value == -0.0 { 0.0 } else { value };
        let q = (value / SNAPSHOT_QUANTIZE).round() * SNAPSHOT_QUANTIZE;
        if q == -0.0 { 0.0 } else { q }
    }

    fn write_f64(out: &mut String, value: f64) {
        let value = quantize_f64(value);
        let _ = write!(out, "{value:.SNAPSHOT_DECIMALS$}");
    }

    fn write_vec3_line(out: &mut String, prefix: &str, v: [f64; 3]) {
        let _ = write!(out, "{prefix} ");
        write_f64(out, v[0]);
        out.push(' ');
        write_f64(out, v[1]);
        out.push(' ');
        write_f64(out, v[2]);
        out.push('\n');
    }

    fn write_options(out: &mut String, options: CinpactOptions) {
        out.push_str("options.delta_u ");
        write_f64(out, options.delta_u);
        out.push('\n');
        let _ = writeln!(out, "options.interpolate {}", options.interpolate);
    }

    fn write_control_points(out: &mut String, points: &[ControlPoint]) {
        let _ = writeln!(out, "control_points {}", points.len());
        for point in points {
            write_vec3_line(out, "cp", point.position.to_array());
            out.push_str("shape ");
            write_f64(out, point.k);
            out.push(' ');
            write_f64(out, point.c);
            out.push('\n');
        }
    }

    fn write_diagnostics(out: &mut String, diag: &CinpactDiagnostics) {
        let _ = writeln!(out, "diag.sample_count {}", diag.sample_count);
        let _ = writeln!(out, "diag.valid_count {}", diag.valid_count);
        let _ = writeln!(out, "diag.dropped_count {}", diag.dropped_count);
        let _ = writeln!(out, "diag.subnormal_weight_count {}", diag.subnormal_weight_count);
    }

    fn write_curve(out: &mut String, curve: &[Point3]) {
        let _ = writeln!(out, "curve.points {}", curve.len());
        for p in curve {
            write_vec3_line(out, "p", p.to_array());
        }
    }

    fn snapshot(op: &str, sections: impl FnOnce(&mut String)) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# cinpact-engine golden v1");
        let _ = writeln!(out, "op {op}");
        let _ = writeln!(out, "quantize {SNAPSHOT_QUANTIZE:.1e}");
        sections(&mut out);
        normalize_snapshot_text(&out)
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Scenario {
        TwoPointSegment,
        ColinearInterpolate,
        ZigzagApproximate,
        ZigzagInterpolate,
        WideSupportSpiral,
    }

    impl Scenario {
        const ALL: &'static [Scenario] = &[
            Scenario::TwoPointSegment,
            Scenario::ColinearInterpolate,
            Scenario::ZigzagApproximate,
            Scenario::ZigzagInterpolate,
            Scenario::WideSupportSpiral,
        ];

        fn name(self) -> &'static str {
            match self {
                Scenario::TwoPointSegment => "two_point_segment",
                Scenario::ColinearInterpolate => "colinear_interpolate",
                Scenario::ZigzagApproximate => "zigzag_approximate",
                Scenario::ZigzagInterpolate => "zigzag_interpolate",
                Scenario::WideSupportSpiral => "wide_support_spiral",
            }
        }

        fn from_str(name: &str) -> Option<Self> {
            match name {
                "two_point_segment" => Some(Scenario::TwoPointSegment),
                "colinear_interpolate" => Some(Scenario::ColinearInterpolate),
                "zigzag_approximate" => Some(Scenario::ZigzagApproximate),
                "zigzag_interpolate" => Some(Scenario::ZigzagInterpolate),
                "wide_support_spiral" => Some(Scenario::WideSupportSpiral),
                _ => None,
            }
        }

        fn setup(self) -> (Vec<ControlPoint>, CinpactOptions) {
            match self {
                Scenario::TwoPointSegment => (
                    uniform_points(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]], 1.0, 1.0),
                    CinpactOptions::new(0.1, false),
                ),
                Scenario::ColinearInterpolate => (
                    uniform_points(
                        &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0], [3.0, 0.0, 0.0]],
                        1.0,
                        2.0,
                    ),
                    CinpactOptions::new(0.1, true),
                ),
                Scenario::ZigzagApproximate => {
                    (uniform_points(&ZIGZAG, 1.0, 2.0), CinpactOptions::new(0.1, false))
                }
                Scenario::ZigzagInterpolate => {
                    (uniform_points(&ZIGZAG, 1.0, 2.0), CinpactOptions::new(0.1, true))
                }
                Scenario::WideSupportSpiral => (uniform_points(&SPIRAL, 0.5, 3.0), CinpactOptions::new(0.1, false)),
            }
        }
    }

    const ZIGZAG: [[f64; 3]; 5] = [
        [0.0, 0.0, 0.0],
        [1.0, 2.0, 0.0],
        [2.0, -1.0, 0.5],
        [3.0, 2.0, 0.0],
        [4.0, 0.0, -0.5],
    ];

    const SPIRAL: [[f64; 3]; 8] = [
        [1.0, 0.0, 0.0],
        [0.707, 0.707, 0.25],
        [0.0, 1.0, 0.5],
        [-0.707, 0.707, 0.75],
        [-1.0, 0.0, 1.0],
        [-0.707, -0.707, 1.25],
        [0.0, -1.0, 1.5],
        [0.707, -0.707, 1.75],
    ];

    fn uniform_points(positions: &[[f64; 3]], k: f64, c: f64) -> Vec<ControlPoint> {
        positions
            .iter()
            .map(|&p| ControlPoint::new(Point3::from(p), k, c))
            .collect()
    }

    struct ScenarioOutput {
        name: &'static str,
        curve: Vec<Point3>,
        diagnostics: CinpactDiagnostics,
        snapshot: String,
    }

    fn run_scenario(scenario: Scenario, overrides: Overrides) -> Result<ScenarioOutput, String> {
        let (points, options) = scenario.setup();
        let options = overrides.apply(options);
        let (curve, diagnostics) = generate_with_diagnostics(&points, options).map_err(|e| e.to_string())?;

        let snap = snapshot(scenario.name(), |out| {
            write_options(out, options);
            write_control_points(out, &points);
            write_diagnostics(out, &diagnostics);
            write_curve(out, &curve);
        });

        Ok(ScenarioOutput {
            name: scenario.name(),
            curve,
            diagnostics,
            snapshot: snap,
        })
    }

    struct Args {
        args: Vec<String>,
        pos: usize,
    }

    impl Args {
        fn new(args: Vec<String>) -> Self {
            Self { args, pos: 0 }
        }

        fn next(&mut self) -> Option<String> {
            let arg = self.args.get(self.pos)?.clone();
            self.pos += 1;
            Some(arg)
        }

        fn value(&mut self, flag: &str) -> Result<String, String> {
            self.next().ok_or_else(|| format!("missing value for {flag}"))
        }
    }
}
