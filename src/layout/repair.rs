//! Bounding-box repair: a correction pass that grows packages around their
//! contents without moving anything.
//!
//! Packages are processed by descending nesting depth so a parent always
//! sees its children's final, already-repaired rectangles. Order matters;
//! shallow-first processing would bake stale child sizes into parents.

use crate::geometry::Rect;
use crate::model::Diagram;

use super::config::LayoutConfig;

/// Grow every package's rectangle to the padded union of its member classes
/// and already-repaired child packages. Empty packages are left alone.
pub fn repair_bounds(diagram: &mut Diagram, config: &LayoutConfig) {
    let mut order: Vec<String> = diagram.packages.iter().map(|p| p.id.clone()).collect();
    order.sort_by_key(|id| std::cmp::Reverse(diagram.package_depth(id)));

    for package_id in order {
        let mut bounds: Option<Rect> = None;
        for class in &diagram.classes {
            if class.package_id.as_deref() == Some(package_id.as_str()) {
                bounds = Some(match bounds {
                    Some(b) => b.union(&class.rect()),
                    None => class.rect(),
                });
            }
        }
        for child in &diagram.packages {
            if child.parent_id.as_deref() == Some(package_id.as_str()) {
                bounds = Some(match bounds {
                    Some(b) => b.union(&child.rect()),
                    None => child.rect(),
                });
            }
        }
        let Some(bounds) = bounds else {
            continue;
        };

        let (min_w, min_h) = config.min_package_size;
        if let Some(package) = diagram.package_by_id_mut(&package_id) {
            package.x = bounds.x - config.padding;
            package.y = bounds.y - config.header_allowance;
            package.w = min_w.max(bounds.w + 2.0 * config.padding);
            package.h = min_h.max(bounds.h + config.header_allowance + config.padding);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_grows_around_stray_class() {
        let mut diagram = Diagram::new();
        let package_id = diagram.add_package(0.0, 0.0, None).id.clone();
        let class_id = diagram.add_class(700.0, 700.0).id.clone();
        diagram.class_by_id_mut(&class_id).unwrap().package_id = Some(package_id.clone());

        repair_bounds(&mut diagram, &LayoutConfig::default());

        let package = diagram.package_by_id(&package_id).unwrap();
        let class = diagram.class_by_id(&class_id).unwrap();
        assert!(package.x <= class.x && package.y <= class.y);
        assert!(package.rect().right() >= class.rect().right());
        assert!(package.rect().bottom() >= class.rect().bottom());
        // The class itself never moves.
        assert_eq!((class.x, class.y), (700.0, 700.0));
    }

    #[test]
    fn test_deepest_first_covers_grandchildren() {
        let mut diagram = Diagram::new();
        let root = diagram.add_package(0.0, 0.0, None).id.clone();
        let mid = diagram.add_package(0.0, 0.0, Some(root.clone())).id.clone();
        let leaf = diagram.add_package(0.0, 0.0, Some(mid.clone())).id.clone();
        let class_id = diagram.add_class(2000.0, 2000.0).id.clone();
        diagram.class_by_id_mut(&class_id).unwrap().package_id = Some(leaf.clone());

        repair_bounds(&mut diagram, &LayoutConfig::default());

        let class_rect = diagram.class_by_id(&class_id).unwrap().rect();
        for package_id in [&root, &mid, &leaf] {
            let rect = diagram.package_by_id(package_id).unwrap().rect();
            assert!(
                rect.x <= class_rect.x
                    && rect.y <= class_rect.y
                    && rect.right() >= class_rect.right()
                    && rect.bottom() >= class_rect.bottom(),
                "{} does not cover the leaf class",
                package_id
            );
        }
    }

    #[test]
    fn test_empty_package_untouched() {
        let mut diagram = Diagram::new();
        diagram.add_package(40.0, 60.0, None);
        repair_bounds(&mut diagram, &LayoutConfig::default());
        let package = &diagram.packages[0];
        assert_eq!((package.x, package.y), (40.0, 60.0));
        assert_eq!((package.w, package.h), (360.0, 240.0));
    }
}
