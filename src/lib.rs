#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod editor;
pub mod geom;

use std::fmt;

use editor::{CurveEditor, EditorControlPoint};
use geom::{CinpactOptions, Point3};
use serde::Serialize;
use wasm_bindgen::JsError;
use wasm_bindgen::prelude::*;

cfg_if::cfg_if! {
    if #[cfg(all(feature = "console_error_panic_hook", target_arch = "wasm32"))] {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            console_error_panic_hook::set_once();
            init_logger();
        }
    } else {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            init_logger();
        }
    }
}

#[cfg(all(feature = "debug_logs", target_arch = "wasm32"))]
fn init_logger() {
    use log::LevelFilter;
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    if log::set_logger(&DEFAULT_LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}

#[cfg(not(all(feature = "debug_logs", target_arch = "wasm32")))]
fn init_logger() {}

#[cfg(all(feature = "parallel", target_arch = "wasm32"))]
#[wasm_bindgen]
pub async fn initialize_parallel(worker_count: Option<u32>) -> Result<(), JsError> {
    let threads = worker_count
        .map(|count| count.max(1) as usize)
        .or_else(|| {
            std::thread::available_parallelism()
                .map(|value| value.get())
                .ok()
        })
        .unwrap_or(1);

    wasm_bindgen_rayon::init_thread_pool(threads)
        .await
        .map_err(|err| JsError::new(&format!("kon rayon threadpool niet initialiseren: {err}")))
}

#[derive(Debug, Serialize, Clone, PartialEq)]
struct ControlPointExport {
    id: u32,
    name: String,
    position: [f64; 3],
    k: f64,
    c: f64,
}

impl From<&EditorControlPoint> for ControlPointExport {
    fn from(point: &EditorControlPoint) -> Self {
        Self {
            id: point.id,
            name: point.name.clone(),
            position: point.position.to_array(),
            k: point.k,
            c: point.c,
        }
    }
}

/// Public entry point for consumers.
#[wasm_bindgen]
pub struct Engine {
    initialized: bool,
    editor: CurveEditor,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl Engine {
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> Engine {
        Engine {
            initialized: true,
            editor: CurveEditor::new(CinpactOptions::default()),
        }
    }

    /// Geeft terug of de engine de minimale initialisatie heeft doorlopen.
    #[wasm_bindgen]
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Voeg een controlepunt toe aan het einde van de curve. Geeft het id terug.
    #[wasm_bindgen]
    pub fn add_point(&mut self, x: f64, y: f64, z: f64) -> Result<u32, JsValue> {
        self.editor.add_point(Point3::new(x, y, z)).map_err(to_js_error)
    }

    #[wasm_bindgen]
    pub fn move_point(&mut self, id: u32, x: f64, y: f64, z: f64) -> Result<(), JsValue> {
        self.editor
            .move_point(id, Point3::new(x, y, z))
            .map_err(to_js_error)
    }

    /// Stel scherpte `k` en bereik `c` van een controlepunt in.
    #[wasm_bindgen]
    pub fn set_shape(&mut self, id: u32, k: f64, c: f64) -> Result<(), JsValue> {
        self.editor.set_shape(id, k, c).map_err(to_js_error)
    }

    #[wasm_bindgen]
    pub fn set_defaults(&mut self, k: f64, c: f64) -> Result<(), JsValue> {
        self.editor.set_defaults(k, c).map_err(to_js_error)
    }

    #[wasm_bindgen]
    pub fn remove_point(&mut self, id: u32) -> Result<(), JsValue> {
        self.editor.remove_point(id).map(|_| ()).map_err(to_js_error)
    }

    /// Verwijder alle controlepunten.
    #[wasm_bindgen]
    pub fn clear(&mut self) {
        self.editor.clear();
    }

    #[wasm_bindgen]
    pub fn set_interpolate(&mut self, interpolate: bool) {
        self.editor.set_interpolate(interpolate);
    }

    #[wasm_bindgen]
    pub fn set_delta_u(&mut self, delta_u: f64) -> Result<(), JsValue> {
        self.editor.set_delta_u(delta_u).map_err(to_js_error)
    }

    /// Zoek het dichtstbijzijnde controlepunt rond `(x, y)`.
    #[wasm_bindgen]
    #[must_use]
    pub fn pick(&self, x: f64, y: f64) -> Option<u32> {
        self.editor.pick(x, y)
    }

    #[wasm_bindgen]
    #[must_use]
    pub fn selected(&self) -> Option<u32> {
        self.editor.selected()
    }

    /// Genereer de curve opnieuw als er sinds de vorige evaluatie iets is gewijzigd.
    #[wasm_bindgen]
    pub fn evaluate(&mut self) -> Result<(), JsValue> {
        self.editor.regenerate().map(|_| ()).map_err(to_js_error)
    }

    /// Haalt de punten van de laatste evaluatie op als `[[x, y, z], ...]`.
    #[wasm_bindgen]
    pub fn get_curve(&self) -> Result<JsValue, JsValue> {
        if self.editor.is_dirty() {
            return Err(js_error("curve is nog niet geëvalueerd"));
        }

        serde_wasm_bindgen::to_value(&self.curve_points())
            .map_err(|err| JsError::new(&err.to_string()).into())
    }

    #[wasm_bindgen]
    pub fn get_control_points(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.control_point_exports())
            .map_err(|err| JsError::new(&err.to_string()).into())
    }

    /// Korte samenvatting van de laatste evaluatie, bijvoorbeeld `S:9 kept:9`.
    #[wasm_bindgen]
    #[must_use]
    pub fn get_summary(&self) -> Option<String> {
        self.editor.diagnostics().map(geom::CinpactDiagnostics::summary)
    }
}

impl Engine {
    /// Curve of the last evaluation as plain coordinate triples.
    #[must_use]
    pub fn curve_points(&self) -> Vec<[f64; 3]> {
        self.editor.curve().iter().map(|p| p.to_array()).collect()
    }

    #[must_use]
    pub fn editor(&self) -> &CurveEditor {
        &self.editor
    }

    fn control_point_exports(&self) -> Vec<ControlPointExport> {
        self.editor.points().iter().map(ControlPointExport::from).collect()
    }
}

fn to_js_error<E: fmt::Display>(error: E) -> JsValue {
    js_error(&error.to_string())
}

fn js_error(message: &str) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    {
        JsError::new(message).into()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
        JsValue::NULL
    }
}

#[cfg(test)]
mod tests {
    use super::{ControlPointExport, Engine};

    #[test]
    fn exports_control_points_in_curve_order() {
        let mut engine = Engine::new();
        engine.add_point(0.0, 0.0, 0.5).unwrap();
        engine.add_point(1.0, 2.0, 0.5).unwrap();
        engine.set_shape(1, 4.0, 1.5).unwrap();

        let exports = engine.control_point_exports();
        assert_eq!(
            exports[1],
            ControlPointExport {
                id: 1,
                name: "Point1".to_owned(),
                position: [1.0, 2.0, 0.5],
                k: 4.0,
                c: 1.5,
            }
        );
    }

    #[test]
    fn evaluate_fills_curve_points() {
        let mut engine = Engine::new();
        engine.set_delta_u(0.1).unwrap();
        engine.add_point(0.0, 0.0, 0.0).unwrap();
        engine.add_point(1.0, 0.0, 0.0).unwrap();
        assert!(engine.curve_points().is_empty());

        engine.evaluate().unwrap();
        assert_eq!(engine.curve_points().len(), 9);
        assert_eq!(engine.get_summary().as_deref(), Some("S:9 kept:9"));
    }

    #[test]
    fn errors_surface_as_js_values() {
        let mut engine = Engine::new();
        assert!(engine.remove_point(3).is_err());
        assert!(engine.set_delta_u(-1.0).is_err());
        assert!(engine.add_point(f64::NAN, 0.0, 0.0).is_err());
    }
}
