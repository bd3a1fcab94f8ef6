//! Zoom and pan state for the map canvas.
//!
//! Zoom moves in fixed steps inside `[MIN_ZOOM, MAX_ZOOM]`. Panning is only
//! possible while zoomed in, and the pan offset snaps back to the origin as
//! soon as the zoom returns to 1.

use crate::layout::radial::Point;
use crate::tui::input::Direction;

pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 2.5;
pub const ZOOM_STEP: f64 = 0.2;
pub const DEFAULT_ZOOM: f64 = 1.0;

/// Keyboard pan distance in layout units at zoom 1.
const KEY_PAN_STEP: f64 = 20.0;

const ZOOM_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    zoom: f64,
    /// Content translation in layout units (`+y` down).
    pan: Point,
    drag_anchor: Option<(u16, u16)>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            pan: Point::ORIGIN,
            drag_anchor: None,
        }
    }
}

impl ViewState {
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn pan(&self) -> Point {
        self.pan
    }

    pub fn percent(&self) -> u32 {
        (self.zoom * 100.0).round() as u32
    }

    pub fn can_pan(&self) -> bool {
        self.zoom > DEFAULT_ZOOM + ZOOM_EPSILON
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_anchor.is_some()
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom + ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom - ZOOM_STEP);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn set_zoom(&mut self, zoom: f64) {
        // Round to one decimal so repeated steps land exactly on 1.0.
        let zoom = ((zoom * 10.0).round() / 10.0).clamp(MIN_ZOOM, MAX_ZOOM);
        self.zoom = zoom;
        if !self.can_pan() {
            self.pan = Point::ORIGIN;
            self.drag_anchor = None;
        }
    }

    /// Shift the content by `(dx, dy)` layout units. Ignored unless zoomed in.
    pub fn pan_by(&mut self, dx: f64, dy: f64) -> bool {
        if !self.can_pan() {
            return false;
        }
        self.pan.x += dx;
        self.pan.y += dy;
        true
    }

    /// Move the camera one step. Moving the camera left slides the content
    /// right.
    pub fn pan_step(&mut self, direction: Direction) -> bool {
        let step = KEY_PAN_STEP / self.zoom;
        match direction {
            Direction::Left => self.pan_by(step, 0.0),
            Direction::Right => self.pan_by(-step, 0.0),
            Direction::Up => self.pan_by(0.0, step),
            Direction::Down => self.pan_by(0.0, -step),
        }
    }

    pub fn begin_drag(&mut self, column: u16, row: u16) -> bool {
        if !self.can_pan() {
            return false;
        }
        self.drag_anchor = Some((column, row));
        true
    }

    /// Follow the pointer: the content moves with it cell for cell.
    pub fn drag_to(&mut self, column: u16, row: u16, units_per_col: f64, units_per_row: f64) {
        let Some((last_col, last_row)) = self.drag_anchor else {
            return;
        };
        let dx = (column as f64 - last_col as f64) * units_per_col;
        let dy = (row as f64 - last_row as f64) * units_per_row;
        if self.pan_by(dx, dy) {
            self.drag_anchor = Some((column, row));
        }
    }

    pub fn end_drag(&mut self) {
        self.drag_anchor = None;
    }

    /// Visible window in layout coordinates, given the half extents that fit
    /// at zoom 1. Returns `([min_x, max_x], [min_y, max_y])`, `+y` down.
    pub fn window(&self, half_width: f64, half_height: f64) -> ([f64; 2], [f64; 2]) {
        let hw = half_width / self.zoom;
        let hh = half_height / self.zoom;
        let cx = -self.pan.x;
        let cy = -self.pan.y;
        ([cx - hw, cx + hw], [cy - hh, cy + hh])
    }
}
