//! Import-time batch layout over the package containment tree.
//!
//! Two passes: a bottom-up measure pass computes each package's size from
//! its class grid and already-measured children, then a top-down place pass
//! positions everything using those sizes verbatim. Sizes must not go stale
//! between the passes; `arrange` runs both back to back over one borrow of
//! the diagram.

use std::collections::HashMap;

use crate::model::Diagram;

use super::config::LayoutConfig;

/// Measure and place every package and class in the diagram.
pub fn arrange(diagram: &mut Diagram, config: &LayoutConfig) {
    let sizes = measure(diagram, config);
    for (id, (w, h)) in &sizes {
        if let Some(package) = diagram.package_by_id_mut(id) {
            package.w = *w;
            package.h = *h;
        }
    }
    let lowest = place_roots(diagram, config, &sizes);
    place_free_classes(diagram, config, lowest);
    log::debug!(
        "arranged {} packages and {} classes",
        diagram.packages.len(),
        diagram.classes.len()
    );
}

/// Near-square grid column count for `n` items.
fn grid_columns(n: usize) -> usize {
    (n as f64).sqrt().ceil().max(1.0) as usize
}

fn grid_rows(n: usize, columns: usize) -> usize {
    n.div_ceil(columns)
}

/// Footprint of a near-square grid of `n` uniform cells.
fn grid_footprint(n: usize, cell_w: f64, cell_h: f64, gap: f64) -> (f64, f64) {
    if n == 0 {
        return (0.0, 0.0);
    }
    let columns = grid_columns(n);
    let rows = grid_rows(n, columns);
    (
        columns as f64 * cell_w + (columns - 1) as f64 * gap,
        rows as f64 * cell_h + (rows - 1) as f64 * gap,
    )
}

fn member_class_ids(diagram: &Diagram, package_id: &str) -> Vec<String> {
    diagram
        .classes
        .iter()
        .filter(|c| c.package_id.as_deref() == Some(package_id))
        .map(|c| c.id.clone())
        .collect()
}

fn child_package_ids(diagram: &Diagram, package_id: &str) -> Vec<String> {
    diagram
        .packages
        .iter()
        .filter(|p| p.parent_id.as_deref() == Some(package_id))
        .map(|p| p.id.clone())
        .collect()
}

/// Maximum class cell size among a package's direct members.
fn class_cell(diagram: &Diagram, members: &[String]) -> (f64, f64) {
    let mut cell = (0.0_f64, 0.0_f64);
    for id in members {
        if let Some(class) = diagram.class_by_id(id) {
            cell.0 = cell.0.max(class.w);
            cell.1 = cell.1.max(class.h);
        }
    }
    cell
}

/// Bottom-up measure pass. Deeper packages are measured first so each
/// package sees final child sizes.
fn measure(diagram: &Diagram, config: &LayoutConfig) -> HashMap<String, (f64, f64)> {
    let mut order: Vec<String> = diagram.packages.iter().map(|p| p.id.clone()).collect();
    order.sort_by_key(|id| std::cmp::Reverse(diagram.package_depth(id)));

    let mut sizes = HashMap::new();
    for id in order {
        let members = member_class_ids(diagram, &id);
        let (cell_w, cell_h) = class_cell(diagram, &members);
        let (grid_w, grid_h) = grid_footprint(members.len(), cell_w, cell_h, config.class_gap);

        let children = child_package_ids(diagram, &id);
        let mut child_w = 0.0_f64;
        let mut child_h = 0.0_f64;
        for (i, child) in children.iter().enumerate() {
            let (w, h) = sizes.get(child).copied().unwrap_or(config.min_package_size);
            child_w = child_w.max(w);
            child_h += h;
            if i > 0 {
                child_h += config.package_gap;
            }
        }

        let interior_w = grid_w.max(child_w);
        let separator = if grid_h > 0.0 && child_h > 0.0 {
            config.package_gap
        } else {
            0.0
        };
        let interior_h = grid_h + separator + child_h;

        let (min_w, min_h) = config.min_package_size;
        let w = min_w.max(interior_w + 2.0 * config.padding);
        let h = min_h.max(interior_h + config.header_allowance + config.padding);
        sizes.insert(id, (w, h));
    }
    sizes
}

/// Place root packages in a near-square grid of max-size cells. Returns the
/// bottom edge of the lowest occupied row.
fn place_roots(
    diagram: &mut Diagram,
    config: &LayoutConfig,
    sizes: &HashMap<String, (f64, f64)>,
) -> f64 {
    let roots: Vec<String> = diagram
        .packages
        .iter()
        .filter(|p| p.parent_id.is_none())
        .map(|p| p.id.clone())
        .collect();
    if roots.is_empty() {
        return config.origin.y;
    }

    let cell_w = roots
        .iter()
        .filter_map(|id| sizes.get(id))
        .fold(0.0_f64, |acc, (w, _)| acc.max(*w));
    let cell_h = roots
        .iter()
        .filter_map(|id| sizes.get(id))
        .fold(0.0_f64, |acc, (_, h)| acc.max(*h));
    let columns = grid_columns(roots.len());

    let mut bottom = config.origin.y;
    for (i, id) in roots.iter().enumerate() {
        let col = (i % columns) as f64;
        let row = (i / columns) as f64;
        let x = config.origin.x + col * (cell_w + config.package_gap);
        let y = config.origin.y + row * (cell_h + config.package_gap);
        place_package(diagram, config, id, x, y, sizes);
        bottom = bottom.max(y + cell_h);
    }
    bottom
}

/// Position one package, its class grid and its stacked children.
fn place_package(
    diagram: &mut Diagram,
    config: &LayoutConfig,
    package_id: &str,
    x: f64,
    y: f64,
    sizes: &HashMap<String, (f64, f64)>,
) {
    if let Some(package) = diagram.package_by_id_mut(package_id) {
        package.x = x;
        package.y = y;
    } else {
        return;
    }

    let members = member_class_ids(diagram, package_id);
    let (cell_w, cell_h) = class_cell(diagram, &members);
    let columns = grid_columns(members.len());
    for (i, class_id) in members.iter().enumerate() {
        let col = (i % columns) as f64;
        let row = (i / columns) as f64;
        if let Some(class) = diagram.class_by_id_mut(class_id) {
            class.x = x + config.padding + col * (cell_w + config.class_gap);
            class.y = y + config.header_allowance + row * (cell_h + config.class_gap);
        }
    }
    let (_, grid_h) = grid_footprint(members.len(), cell_w, cell_h, config.class_gap);

    let children = child_package_ids(diagram, package_id);
    let mut child_y = y + config.header_allowance + grid_h;
    if grid_h > 0.0 && !children.is_empty() {
        child_y += config.package_gap;
    }
    for child in &children {
        place_package(diagram, config, child, x + config.padding, child_y, sizes);
        let (_, h) = sizes.get(child).copied().unwrap_or(config.min_package_size);
        child_y += h + config.package_gap;
    }
}

/// Unpackaged classes go in their own grid below the package area.
fn place_free_classes(diagram: &mut Diagram, config: &LayoutConfig, packages_bottom: f64) {
    let free: Vec<String> = diagram
        .classes
        .iter()
        .filter(|c| c.package_id.is_none())
        .map(|c| c.id.clone())
        .collect();
    if free.is_empty() {
        return;
    }
    let (cell_w, cell_h) = class_cell(diagram, &free);
    let columns = grid_columns(free.len());
    let start_y = if diagram.packages.is_empty() {
        config.origin.y
    } else {
        packages_bottom + config.free_class_gap
    };
    for (i, class_id) in free.iter().enumerate() {
        let col = (i % columns) as f64;
        let row = (i / columns) as f64;
        if let Some(class) = diagram.class_by_id_mut(class_id) {
            class.x = config.origin.x + col * (cell_w + config.class_gap);
            class.y = start_y + row * (cell_h + config.class_gap);
        }
    }
}
