//! Headless editing model for a single CINPACT curve.
//!
//! [`CurveEditor`] owns the ordered control point list plus the generation
//! settings. Every edit marks the editor dirty and [`CurveEditor::regenerate`]
//! rebuilds the cached curve at most once per batch of edits, so callers can
//! poll it every frame.

use serde::Serialize;

use crate::geom::{
    CinpactDiagnostics, CinpactError, CinpactOptions, ControlPoint, Point3, generate_with_diagnostics,
};

/// Squared XY distance below which [`CurveEditor::pick`] hits a point.
pub const PICK_RADIUS_SQUARED: f64 = 1e-3;

/// Shape values given to newly added control points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorDefaults {
    pub k: f64,
    pub c: f64,
    /// Depth used by [`CurveEditor::add_point_xy`].
    pub z: f64,
}

impl Default for EditorDefaults {
    fn default() -> Self {
        Self {
            k: 1.0,
            c: 2.0,
            z: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditorControlPoint {
    pub id: u32,
    pub name: String,
    pub position: Point3,
    pub k: f64,
    pub c: f64,
}

impl EditorControlPoint {
    #[must_use]
    pub const fn to_control_point(&self) -> ControlPoint {
        ControlPoint::new(self.position, self.k, self.c)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditorError {
    #[error("unknown control point id {0}")]
    UnknownPoint(u32),
    #[error("position must be finite")]
    NonFinitePosition,
    #[error("invalid shape values: k must be finite and >= 0, c must be finite and > 0 (k = {k}, c = {c})")]
    InvalidShape { k: f64, c: f64 },
    #[error("delta_u must be finite and > 0, got {0}")]
    InvalidDeltaU(f64),
    #[error("control point ids exhausted")]
    IdsExhausted,
    #[error(transparent)]
    Generation(#[from] CinpactError),
}

#[derive(Debug, Clone)]
pub struct CurveEditor {
    points: Vec<EditorControlPoint>,
    next_id: u32,
    selected: Option<u32>,
    defaults: EditorDefaults,
    options: CinpactOptions,
    dirty: bool,
    curve: Vec<Point3>,
    diagnostics: Option<CinpactDiagnostics>,
}

impl Default for CurveEditor {
    fn default() -> Self {
        Self::new(CinpactOptions::default())
    }
}

impl CurveEditor {
    #[must_use]
    pub fn new(options: CinpactOptions) -> Self {
        Self {
            points: Vec::new(),
            next_id: 0,
            selected: None,
            defaults: EditorDefaults::default(),
            options,
            dirty: true,
            curve: Vec::new(),
            diagnostics: None,
        }
    }

    #[must_use]
    pub fn points(&self) -> &[EditorControlPoint] {
        &self.points
    }

    #[must_use]
    pub fn point(&self, id: u32) -> Option<&EditorControlPoint> {
        self.points.iter().find(|point| point.id == id)
    }

    /// Control points in curve order, ready for generation.
    #[must_use]
    pub fn control_points(&self) -> Vec<ControlPoint> {
        self.points.iter().map(EditorControlPoint::to_control_point).collect()
    }

    #[must_use]
    pub const fn options(&self) -> CinpactOptions {
        self.options
    }

    #[must_use]
    pub const fn defaults(&self) -> EditorDefaults {
        self.defaults
    }

    #[must_use]
    pub const fn selected(&self) -> Option<u32> {
        self.selected
    }

    /// Whether an edit happened since the last successful regeneration.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Last generated curve. May be stale while [`Self::is_dirty`] is true.
    #[must_use]
    pub fn curve(&self) -> &[Point3] {
        &self.curve
    }

    #[must_use]
    pub const fn diagnostics(&self) -> Option<&CinpactDiagnostics> {
        self.diagnostics.as_ref()
    }

    /// Appends a control point with the default shape values and selects it.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::NonFinitePosition`] for NaN or infinite
    /// coordinates, or [`EditorError::IdsExhausted`] once every id below
    /// `u32::MAX` has been handed out.
    pub fn add_point(&mut self, position: Point3) -> Result<u32, EditorError> {
        if !position.is_finite() {
            return Err(EditorError::NonFinitePosition);
        }

        let id = self.next_id;
        self.next_id = id.checked_add(1).ok_or(EditorError::IdsExhausted)?;
        self.points.push(EditorControlPoint {
            id,
            name: format!("Point{id}"),
            position,
            k: self.defaults.k,
            c: self.defaults.c,
        });
        self.selected = Some(id);
        self.mark_dirty();

        log::trace!("editor: added Point{id} at {position:?}");
        Ok(id)
    }

    /// [`Self::add_point`] on the editing plane at the default depth.
    ///
    /// # Errors
    ///
    /// See [`Self::add_point`].
    pub fn add_point_xy(&mut self, x: f64, y: f64) -> Result<u32, EditorError> {
        self.add_point(Point3::new(x, y, self.defaults.z))
    }

    /// # Errors
    ///
    /// Returns [`EditorError::UnknownPoint`] or
    /// [`EditorError::NonFinitePosition`].
    pub fn move_point(&mut self, id: u32, position: Point3) -> Result<(), EditorError> {
        if !position.is_finite() {
            return Err(EditorError::NonFinitePosition);
        }
        let point = self.point_mut(id)?;
        if point.position == position {
            return Ok(());
        }
        point.position = position;
        self.mark_dirty();
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`EditorError::UnknownPoint`] or [`EditorError::InvalidShape`].
    pub fn set_shape(&mut self, id: u32, k: f64, c: f64) -> Result<(), EditorError> {
        validate_shape(k, c)?;
        let point = self.point_mut(id)?;
        if point.k == k && point.c == c {
            return Ok(());
        }
        point.k = k;
        point.c = c;
        self.mark_dirty();
        Ok(())
    }

    /// Removes a control point. Later points shift down one parameter slot.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::UnknownPoint`] when no point has `id`.
    pub fn remove_point(&mut self, id: u32) -> Result<EditorControlPoint, EditorError> {
        let index = self
            .points
            .iter()
            .position(|point| point.id == id)
            .ok_or(EditorError::UnknownPoint(id))?;

        let removed = self.points.remove(index);
        if self.selected == Some(id) {
            self.selected = None;
        }
        self.mark_dirty();
        Ok(removed)
    }

    /// Removes every control point. Ids keep counting up.
    pub fn clear(&mut self) {
        if self.points.is_empty() {
            return;
        }
        self.points.clear();
        self.selected = None;
        self.mark_dirty();
    }

    pub fn set_interpolate(&mut self, interpolate: bool) {
        if self.options.interpolate != interpolate {
            self.options.interpolate = interpolate;
            self.mark_dirty();
        }
    }

    /// # Errors
    ///
    /// Returns [`EditorError::InvalidDeltaU`] unless `delta_u` is finite and
    /// positive.
    pub fn set_delta_u(&mut self, delta_u: f64) -> Result<(), EditorError> {
        if !delta_u.is_finite() || delta_u <= 0.0 {
            return Err(EditorError::InvalidDeltaU(delta_u));
        }
        if self.options.delta_u != delta_u {
            self.options.delta_u = delta_u;
            self.mark_dirty();
        }
        Ok(())
    }

    /// Changes the shape values for points added from now on.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidShape`].
    pub fn set_defaults(&mut self, k: f64, c: f64) -> Result<(), EditorError> {
        validate_shape(k, c)?;
        self.defaults.k = k;
        self.defaults.c = c;
        Ok(())
    }

    /// Selects `id`, or clears the selection with `None`.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::UnknownPoint`] when `id` does not exist.
    pub fn select(&mut self, id: Option<u32>) -> Result<(), EditorError> {
        if let Some(id) = id {
            if self.point(id).is_none() {
                return Err(EditorError::UnknownPoint(id));
            }
        }
        self.selected = id;
        Ok(())
    }

    /// Nearest control point within [`PICK_RADIUS_SQUARED`] of `(x, y)` in
    /// the XY plane.
    #[must_use]
    pub fn pick(&self, x: f64, y: f64) -> Option<u32> {
        self.points
            .iter()
            .map(|point| (point.id, point.position.distance_squared_xy(x, y)))
            .filter(|(_, distance)| *distance < PICK_RADIUS_SQUARED)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    /// Rebuilds the curve if anything changed since the last call.
    ///
    /// On error the editor stays dirty and the previous curve is kept.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Generation`] when generation rejects the
    /// current control points.
    pub fn regenerate(&mut self) -> Result<&[Point3], EditorError> {
        if self.dirty {
            let (curve, diagnostics) = generate_with_diagnostics(&self.control_points(), self.options)?;
            log::debug!(
                "editor: regenerated {} control points -> {}",
                self.points.len(),
                diagnostics.summary()
            );
            self.curve = curve;
            self.diagnostics = Some(diagnostics);
            self.dirty = false;
        }
        Ok(&self.curve)
    }

    fn point_mut(&mut self, id: u32) -> Result<&mut EditorControlPoint, EditorError> {
        self.points
            .iter_mut()
            .find(|point| point.id == id)
            .ok_or(EditorError::UnknownPoint(id))
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

fn validate_shape(k: f64, c: f64) -> Result<(), EditorError> {
    if !k.is_finite() || k < 0.0 || !c.is_finite() || c <= 0.0 {
        return Err(EditorError::InvalidShape { k, c });
    }
    Ok(())
}
