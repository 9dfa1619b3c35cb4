//! Ordered hit-testing over the diagram's typed regions.
//!
//! The pointer-down dispatcher needs a strict precedence because regions
//! overlap on screen: resize handles sit on package borders, class nodes sit
//! above package bodies, and the header band doubles as the package's drag
//! grip. Hits are resolved handle > class node > package header > background,
//! with later-listed (topmost-rendered) entities winning within a layer.

use crate::geometry::{Point, Rect, PACKAGE_HEADER_HEIGHT};
use crate::model::Diagram;

/// Side length of the square resize handles, in world units
pub const RESIZE_HANDLE_SIZE: f64 = 10.0;
/// Height of the rendered package header band used as a drag grip
pub const PACKAGE_HEADER_BAND: f64 = 24.0;
/// Minimum rendered header width
pub const PACKAGE_HEADER_MIN_WIDTH: f64 = 120.0;

/// Active edges of a resize gesture, derived from an 8-way compass handle.
/// Corner handles set two flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResizeDirection {
    pub north: bool,
    pub east: bool,
    pub south: bool,
    pub west: bool,
}

impl ResizeDirection {
    /// Parse a compass key such as `"n"`, `"sw"` or `"se"`.
    pub fn from_key(key: &str) -> Self {
        Self {
            north: key.contains('n'),
            east: key.contains('e'),
            south: key.contains('s'),
            west: key.contains('w'),
        }
    }

    pub fn key(&self) -> String {
        let mut key = String::new();
        if self.north {
            key.push('n');
        }
        if self.south {
            key.push('s');
        }
        if self.west {
            key.push('w');
        }
        if self.east {
            key.push('e');
        }
        key
    }
}

/// The result of a pointer-down hit test
#[derive(Debug, Clone, PartialEq)]
pub enum HitTarget {
    ResizeHandle {
        package_id: String,
        direction: ResizeDirection,
    },
    Class {
        class_id: String,
    },
    PackageHeader {
        package_id: String,
    },
    Background,
}

/// The eight handle center positions for a package, in world coordinates.
/// Handles sit on the body rectangle, which starts below the header band.
pub fn handle_centers(package: Rect) -> [(&'static str, Point); 8] {
    let top = package.y + PACKAGE_HEADER_HEIGHT;
    let bottom = top + package.h;
    let mid_y = top + package.h / 2.0;
    let mid_x = package.x + package.w / 2.0;
    [
        ("nw", Point::new(package.x, top)),
        ("n", Point::new(mid_x, top)),
        ("ne", Point::new(package.right(), top)),
        ("w", Point::new(package.x, mid_y)),
        ("e", Point::new(package.right(), mid_y)),
        ("sw", Point::new(package.x, bottom)),
        ("s", Point::new(mid_x, bottom)),
        ("se", Point::new(package.right(), bottom)),
    ]
}

/// The header/label grip region of a package, in world coordinates.
pub fn header_rect(package: Rect) -> Rect {
    Rect::new(
        package.x,
        package.y,
        (package.w * 0.4).max(PACKAGE_HEADER_MIN_WIDTH),
        PACKAGE_HEADER_BAND,
    )
}

/// Resolve what a world-space pointer position lands on.
pub fn hit_test(diagram: &Diagram, world: Point) -> HitTarget {
    let half = RESIZE_HANDLE_SIZE / 2.0;
    for package in diagram.packages.iter().rev() {
        for (key, center) in handle_centers(package.rect()) {
            let region = Rect::new(
                center.x - half,
                center.y - half,
                RESIZE_HANDLE_SIZE,
                RESIZE_HANDLE_SIZE,
            );
            if region.contains(world) {
                return HitTarget::ResizeHandle {
                    package_id: package.id.clone(),
                    direction: ResizeDirection::from_key(key),
                };
            }
        }
    }
    for class in diagram.classes.iter().rev() {
        if class.rect().contains(world) {
            return HitTarget::Class {
                class_id: class.id.clone(),
            };
        }
    }
    for package in diagram.packages.iter().rev() {
        if header_rect(package.rect()).contains(world) {
            return HitTarget::PackageHeader {
                package_id: package.id.clone(),
            };
        }
    }
    HitTarget::Background
}
