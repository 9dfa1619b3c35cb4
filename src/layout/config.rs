//! Tunable spacing for the batch layout passes.

use crate::geometry::Point;
use crate::model::DEFAULT_PACKAGE_SIZE;

/// Spacing and sizing knobs shared by the measure/place passes and the
/// bounding-box repair pass.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Top-left corner where the root package grid starts
    pub origin: Point,
    /// Gap between sibling classes inside a package grid
    pub class_gap: f64,
    /// Gap between sibling packages (grid cells and stacked children)
    pub package_gap: f64,
    /// Vertical clearance between the package area and the grid of
    /// unpackaged classes
    pub free_class_gap: f64,
    /// Interior padding on the left/right/bottom of a package
    pub padding: f64,
    /// Vertical room reserved at the top of a package for its header
    pub header_allowance: f64,
    /// Packages never shrink below this, matching the default package size
    pub min_package_size: (f64, f64),
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            origin: Point::new(100.0, 100.0),
            class_gap: 80.0,
            package_gap: 80.0,
            free_class_gap: 200.0,
            padding: 30.0,
            header_allowance: 50.0,
            min_package_size: DEFAULT_PACKAGE_SIZE,
        }
    }
}

impl LayoutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_origin(mut self, x: f64, y: f64) -> Self {
        self.origin = Point::new(x, y);
        self
    }

    pub fn with_class_gap(mut self, gap: f64) -> Self {
        self.class_gap = gap;
        self
    }

    pub fn with_package_gap(mut self, gap: f64) -> Self {
        self.package_gap = gap;
        self
    }

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }
}
