//! Screen/world coordinate transforms, grid snapping and cursor-anchored
//! zooming.
//!
//! The viewport maps world coordinates to screen coordinates via
//! `translate(pan) scale(zoom)`; `screen_to_world` is the inverse of that
//! mapping.

use crate::geometry::Point;

/// Lower zoom bound
pub const MIN_ZOOM: f64 = 0.1;
/// Upper zoom bound
pub const MAX_ZOOM: f64 = 5.0;
/// Smallest grid step accepted by [`snap`]
pub const MIN_GRID_STEP: f64 = 4.0;

/// Step size in normalized log-space per wheel notch
const ZOOM_STEP: f64 = 0.05;
/// Zoom changes below this are ignored to avoid redundant renders
const ZOOM_EPSILON: f64 = 1e-6;

/// Pan offset and zoom scalar of the viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub pan: Point,
    pub zoom: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            pan: Point::default(),
            zoom: 1.0,
        }
    }
}

impl ViewTransform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a screen-space point (e.g. a pointer event position) into world
    /// coordinates.
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.pan.x) / self.zoom,
            (screen.y - self.pan.y) / self.zoom,
        )
    }

    /// Map a world-space point onto the screen.
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point::new(
            world.x * self.zoom + self.pan.x,
            world.y * self.zoom + self.pan.y,
        )
    }

    /// Apply a wheel-driven zoom step anchored at `screen`.
    ///
    /// The current zoom is mapped into normalized log-space, a fixed step is
    /// added or subtracted there (wheel up zooms in), the result is clamped
    /// back to [0, 1] and exponentiated. The pan offset is then recomputed so
    /// the world point under the cursor stays under the cursor. Returns false
    /// when the effective change is below epsilon and nothing was touched.
    pub fn zoom_at(&mut self, screen: Point, wheel_delta: f64) -> bool {
        let log_min = MIN_ZOOM.ln();
        let log_max = MAX_ZOOM.ln();
        let normalized = (self.zoom.ln() - log_min) / (log_max - log_min);
        let step = if wheel_delta < 0.0 { ZOOM_STEP } else { -ZOOM_STEP };
        let next = (normalized + step).clamp(0.0, 1.0);
        let new_zoom = (log_min + next * (log_max - log_min)).exp();
        if (new_zoom - self.zoom).abs() < ZOOM_EPSILON {
            return false;
        }
        let world = self.screen_to_world(screen);
        self.zoom = new_zoom;
        self.pan.x = screen.x - world.x * new_zoom;
        self.pan.y = screen.y - world.y * new_zoom;
        true
    }

    /// The SVG transform string for the viewport group.
    pub fn svg_transform(&self) -> String {
        format!(
            "translate({},{}) scale({})",
            self.pan.x, self.pan.y, self.zoom
        )
    }
}

/// Snap a value to the nearest multiple of `grid_step`. The step is clamped
/// to a minimum of 4 world units.
pub fn snap(value: f64, grid_step: f64) -> f64 {
    let step = grid_step.max(MIN_GRID_STEP);
    (value / step).round() * step
}
