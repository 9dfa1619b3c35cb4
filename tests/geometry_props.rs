//! Property tests for the geometry and viewport math.

use proptest::prelude::*;

use umlboard::geometry::{intersect_rect_edge, Point, Rect};
use umlboard::view::{snap, ViewTransform, MAX_ZOOM, MIN_ZOOM};

fn rects() -> impl Strategy<Value = Rect> {
    (
        -500.0..500.0f64,
        -500.0..500.0f64,
        10.0..400.0f64,
        10.0..400.0f64,
    )
        .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
}

proptest! {
    #[test]
    fn edge_intersection_lies_on_perimeter_and_segment(
        rect in rects(),
        px in -2000.0..2000.0f64,
        py in -2000.0..2000.0f64,
    ) {
        let target = Point::new(px, py);
        prop_assume!(!rect.contains(target));

        let hit = intersect_rect_edge(rect, target);
        let eps = 1e-6;

        // On the perimeter: inside the bounds, touching at least one edge.
        prop_assert!(hit.x >= rect.x - eps && hit.x <= rect.right() + eps);
        prop_assert!(hit.y >= rect.y - eps && hit.y <= rect.bottom() + eps);
        let on_vertical = (hit.x - rect.x).abs() < eps || (hit.x - rect.right()).abs() < eps;
        let on_horizontal = (hit.y - rect.y).abs() < eps || (hit.y - rect.bottom()).abs() < eps;
        prop_assert!(on_vertical || on_horizontal, "hit {:?} not on perimeter", hit);

        // On the segment from the center to the target.
        let center = rect.center();
        let dx = target.x - center.x;
        let dy = target.y - center.y;
        let rx = hit.x - center.x;
        let ry = hit.y - center.y;
        let cross = rx * dy - ry * dx;
        let scale = (dx * dx + dy * dy).sqrt().max(1.0);
        prop_assert!(cross.abs() / scale < 1e-6, "hit off the ray: cross={}", cross);
        let dot = rx * dx + ry * dy;
        prop_assert!(dot >= 0.0);
        prop_assert!(dot <= dx * dx + dy * dy + eps);
    }

    #[test]
    fn zoom_keeps_cursor_world_point_fixed(
        pan_x in -1000.0..1000.0f64,
        pan_y in -1000.0..1000.0f64,
        zoom in MIN_ZOOM..MAX_ZOOM,
        cursor_x in 0.0..1600.0f64,
        cursor_y in 0.0..1200.0f64,
        zoom_in in any::<bool>(),
    ) {
        let mut view = ViewTransform {
            pan: Point::new(pan_x, pan_y),
            zoom,
        };
        let cursor = Point::new(cursor_x, cursor_y);
        let before = view.screen_to_world(cursor);
        let delta = if zoom_in { -120.0 } else { 120.0 };
        if view.zoom_at(cursor, delta) {
            let after = view.screen_to_world(cursor);
            prop_assert!((before.x - after.x).abs() < 1e-6);
            prop_assert!((before.y - after.y).abs() < 1e-6);
        }
    }

    #[test]
    fn snap_yields_grid_multiples_within_half_step(
        value in -10_000.0..10_000.0f64,
        step in 0.0..64.0f64,
    ) {
        let snapped = snap(value, step);
        let effective = step.max(4.0);
        let remainder = (snapped / effective).round() * effective - snapped;
        prop_assert!(remainder.abs() < 1e-9);
        prop_assert!((snapped - value).abs() <= effective / 2.0 + 1e-9);
    }
}
