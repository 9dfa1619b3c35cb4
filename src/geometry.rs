//! Pure geometry helpers: rectangle math, edge intersection and the
//! package containment test used by the interaction engine.

/// Height of the package header band in world units. The package body
/// (the region classes are considered members of) starts below it.
pub const PACKAGE_HEADER_HEIGHT: f64 = 16.0;

/// Outward tolerance applied by the containment test when the edge is
/// treated as outside (strict interior tests during drag-out detection).
const CONTAINMENT_EPSILON: f64 = 1e-6;

/// A 2D point in world coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle with top-left origin
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Right edge x-coordinate
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    /// Bottom edge y-coordinate
    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Center point of the rectangle
    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Check whether a point lies within the rectangle (edges inclusive)
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// Check whether this rectangle overlaps another (shared edges do not count)
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Smallest rectangle containing both `self` and `other`
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, right - x, bottom - y)
    }

    /// Rectangle grown by `amount` on every side
    pub fn inflate(&self, amount: f64) -> Rect {
        Rect::new(
            self.x - amount,
            self.y - amount,
            self.w + 2.0 * amount,
            self.h + 2.0 * amount,
        )
    }
}

/// Intersect the ray from `rect`'s center toward `target` with the
/// rectangle boundary.
///
/// Computed via the parametric scale factors `tX = halfWidth / |dx|` and
/// `tY = halfHeight / |dy|` (infinite when the corresponding delta is zero),
/// taking `t = min(tX, tY)`. The result lies exactly on the perimeter as
/// long as `target` differs from the center; for a degenerate ray the
/// center itself is returned.
pub fn intersect_rect_edge(rect: Rect, target: Point) -> Point {
    let center = rect.center();
    let dx = target.x - center.x;
    let dy = target.y - center.y;
    let tx = if dx.abs() > 0.0 {
        (rect.w / 2.0) / dx.abs()
    } else {
        f64::INFINITY
    };
    let ty = if dy.abs() > 0.0 {
        (rect.h / 2.0) / dy.abs()
    } else {
        f64::INFINITY
    };
    let t = tx.min(ty);
    if !t.is_finite() {
        return center;
    }
    Point::new(center.x + dx * t, center.y + dy * t)
}

/// Check whether a class rectangle sits inside a package's body region.
///
/// The test compares the class's *center point* against the package body,
/// which excludes the header band: `[x, x+w] × [y+16, y+h+16]`. With
/// `include_edge` the boundary counts as inside with zero tolerance;
/// without it a small outward epsilon is applied (used by drag-out
/// detection so a class exactly on the boundary is still considered in).
pub fn class_in_package_body(class: Rect, package: Rect, include_edge: bool) -> bool {
    let center = class.center();
    let left = package.x;
    let right = package.x + package.w;
    let top = package.y + PACKAGE_HEADER_HEIGHT;
    let bottom = package.y + package.h + PACKAGE_HEADER_HEIGHT;
    let tolerance = if include_edge { 0.0 } else { CONTAINMENT_EPSILON };
    center.x >= left - tolerance
        && center.x <= right + tolerance
        && center.y >= top - tolerance
        && center.y <= bottom + tolerance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_center() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        let c = r.center();
        assert_eq!(c.x, 60.0);
        assert_eq!(c.y, 45.0);
    }

    #[test]
    fn test_rect_contains() {
        let r = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(r.contains(Point::new(50.0, 50.0)));
        assert!(r.contains(Point::new(0.0, 0.0)));
        assert!(r.contains(Point::new(100.0, 100.0)));
        assert!(!r.contains(Point::new(-1.0, 50.0)));
        assert!(!r.contains(Point::new(50.0, 101.0)));
    }

    #[test]
    fn test_rect_union() {
        let a = Rect::new(0.0, 0.0, 50.0, 50.0);
        let b = Rect::new(100.0, 100.0, 50.0, 50.0);
        let u = a.union(&b);
        assert_eq!(u, Rect::new(0.0, 0.0, 150.0, 150.0));
    }

    #[test]
    fn test_rect_intersects() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(50.0, 50.0, 100.0, 100.0);
        let c = Rect::new(200.0, 200.0, 10.0, 10.0);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_edge_intersection_axis_aligned() {
        let r = Rect::new(0.0, 0.0, 100.0, 50.0);
        // Straight to the right: should exit through the right edge midpoint.
        let p = intersect_rect_edge(r, Point::new(300.0, 25.0));
        assert_eq!(p.x, 100.0);
        assert_eq!(p.y, 25.0);
        // Straight down: bottom edge midpoint.
        let p = intersect_rect_edge(r, Point::new(50.0, 200.0));
        assert_eq!(p.x, 50.0);
        assert_eq!(p.y, 50.0);
    }

    #[test]
    fn test_edge_intersection_diagonal_stays_on_perimeter() {
        let r = Rect::new(10.0, 10.0, 80.0, 40.0);
        let p = intersect_rect_edge(r, Point::new(500.0, 400.0));
        let on_vertical = (p.x - r.x).abs() < 1e-9 || (p.x - r.right()).abs() < 1e-9;
        let on_horizontal = (p.y - r.y).abs() < 1e-9 || (p.y - r.bottom()).abs() < 1e-9;
        assert!(on_vertical || on_horizontal);
        assert!(p.x >= r.x - 1e-9 && p.x <= r.right() + 1e-9);
        assert!(p.y >= r.y - 1e-9 && p.y <= r.bottom() + 1e-9);
    }

    #[test]
    fn test_edge_intersection_degenerate_target() {
        let r = Rect::new(0.0, 0.0, 100.0, 50.0);
        let center = r.center();
        let p = intersect_rect_edge(r, center);
        assert_eq!(p, center);
    }

    #[test]
    fn test_class_in_package_body_header_excluded() {
        let package = Rect::new(0.0, 0.0, 360.0, 240.0);
        // Class whose center sits in the header band (y in 0..16) is outside.
        let in_header = Rect::new(50.0, -45.0, 100.0, 100.0); // center y = 5
        assert!(!class_in_package_body(in_header, package, false));
        // Just below the header band it flips to inside.
        let below_header = Rect::new(50.0, -30.0, 100.0, 100.0); // center y = 20
        assert!(class_in_package_body(below_header, package, false));
    }

    #[test]
    fn test_class_in_package_body_extends_below_rect() {
        // The body region spans y+16 .. y+h+16, so a center slightly below
        // y+h is still inside.
        let package = Rect::new(0.0, 0.0, 360.0, 240.0);
        let low = Rect::new(50.0, 200.0, 100.0, 100.0); // center y = 250
        assert!(class_in_package_body(low, package, false));
        let too_low = Rect::new(50.0, 210.0, 100.0, 100.0); // center y = 260
        assert!(!class_in_package_body(too_low, package, false));
    }

    #[test]
    fn test_class_on_boundary_tolerances() {
        let package = Rect::new(0.0, 0.0, 360.0, 240.0);
        // Center exactly on the right edge.
        let on_edge = Rect::new(310.0, 100.0, 100.0, 100.0); // center x = 360
        assert!(class_in_package_body(on_edge, package, true));
        assert!(class_in_package_body(on_edge, package, false));
        // A hair outside: the epsilon-free test rejects it.
        let outside = Rect::new(310.1, 100.0, 100.0, 100.0);
        assert!(!class_in_package_body(outside, package, true));
    }
}
