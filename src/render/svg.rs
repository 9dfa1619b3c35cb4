//! Pure-function SVG rendering of the diagram state.
//!
//! Every entity renders inside a group carrying a stable `data-id`, so an
//! embedder can address a single entity's markup without a full rebuild.
//! [`package_fragment`] is the incremental-update unit used while a resize
//! gesture is in flight.

use crate::geometry::{intersect_rect_edge, Rect, PACKAGE_HEADER_HEIGHT};
use crate::interaction::hit::{handle_centers, header_rect, RESIZE_HANDLE_SIZE};
use crate::model::{ClassNode, EditorState, EntityKind, PackageNode, Relation};
use crate::xml::escape_xml;

const CLASS_TITLE_BAND: f64 = 30.0;
const MEMBER_LINE_HEIGHT: f64 = 18.0;
const TEXT_INSET: f64 = 10.0;

/// Render the full diagram to an SVG document.
pub fn render_svg(state: &EditorState, grid_step: f64) -> String {
    let mut out = String::new();
    out.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" class="diagram">"#);
    out.push('\n');
    out.push_str(&grid_pattern(grid_step));
    out.push_str(&format!(
        "  <g class=\"viewport\" transform=\"{}\">\n",
        state.view.svg_transform()
    ));

    for package in &state.diagram.packages {
        let selected = is_selected(state, EntityKind::Package, &package.id);
        out.push_str(&indent(&package_fragment_with(package, selected), 4));
    }
    for relation in &state.diagram.relations {
        if let Some(edge) = edge_fragment(state, relation) {
            out.push_str(&indent(&edge, 4));
        }
    }
    for class in &state.diagram.classes {
        let selected = is_selected(state, EntityKind::Class, &class.id);
        out.push_str(&indent(&class_fragment(class, selected), 4));
    }
    if let Some(pending) = &state.link.pending {
        if let Some(source) = state.diagram.class_by_id(&pending.source_id) {
            let from = source.rect().center();
            out.push_str(&indent(
                &format!(
                    r#"<line class="edge pending" x1="{}" y1="{}" x2="{}" y2="{}"/>"#,
                    from.x, from.y, pending.free_end.x, pending.free_end.y
                ),
                4,
            ));
        }
    }

    out.push_str("  </g>\n</svg>\n");
    out
}

/// Markup for one package group, the unit swapped in place during resize.
pub fn package_fragment(package: &PackageNode) -> String {
    package_fragment_with(package, false)
}

fn package_fragment_with(package: &PackageNode, selected: bool) -> String {
    let rect = package.rect();
    let header = header_rect(rect);
    let body = Rect::new(
        rect.x,
        rect.y + PACKAGE_HEADER_HEIGHT,
        rect.w,
        rect.h,
    );
    let class_attr = if selected {
        "package selected"
    } else {
        "package"
    };
    let mut out = format!(
        "<g class=\"{}\" data-id=\"{}\">\n",
        class_attr,
        escape_xml(&package.id)
    );
    out.push_str(&format!(
        r#"  <rect class="package-body" x="{}" y="{}" width="{}" height="{}"/>"#,
        body.x, body.y, body.w, body.h
    ));
    out.push('\n');
    out.push_str(&format!(
        r#"  <rect class="package-header" x="{}" y="{}" width="{}" height="{}"/>"#,
        header.x, header.y, header.w, header.h
    ));
    out.push('\n');
    out.push_str(&format!(
        r#"  <text class="package-label" x="{}" y="{}">{}</text>"#,
        header.x + TEXT_INSET,
        header.y + header.h - 7.0,
        escape_xml(&package.name)
    ));
    out.push('\n');
    let half = RESIZE_HANDLE_SIZE / 2.0;
    for (key, center) in handle_centers(rect) {
        out.push_str(&format!(
            r#"  <rect class="handle" data-direction="{}" x="{}" y="{}" width="{}" height="{}"/>"#,
            key,
            center.x - half,
            center.y - half,
            RESIZE_HANDLE_SIZE,
            RESIZE_HANDLE_SIZE
        ));
        out.push('\n');
    }
    out.push_str("</g>\n");
    out
}

fn class_fragment(class: &ClassNode, selected: bool) -> String {
    let class_attr = if selected { "class selected" } else { "class" };
    let mut out = format!(
        "<g class=\"{}\" data-id=\"{}\">\n",
        class_attr,
        escape_xml(&class.id)
    );
    out.push_str(&format!(
        r#"  <rect class="class-box" x="{}" y="{}" width="{}" height="{}"/>"#,
        class.x, class.y, class.w, class.h
    ));
    out.push('\n');
    out.push_str(&format!(
        r#"  <text class="class-title" x="{}" y="{}">{}</text>"#,
        class.x + class.w / 2.0,
        class.y + 20.0,
        escape_xml(&class.name)
    ));
    out.push('\n');
    out.push_str(&format!(
        r#"  <line class="separator" x1="{}" y1="{}" x2="{}" y2="{}"/>"#,
        class.x,
        class.y + CLASS_TITLE_BAND,
        class.x + class.w,
        class.y + CLASS_TITLE_BAND
    ));
    out.push('\n');

    let mut line_y = class.y + CLASS_TITLE_BAND + MEMBER_LINE_HEIGHT - 4.0;
    for attribute in &class.attributes {
        out.push_str(&format!(
            r#"  <text class="member" x="{}" y="{}">{}</text>"#,
            class.x + TEXT_INSET,
            line_y,
            escape_xml(&attribute.to_string())
        ));
        out.push('\n');
        line_y += MEMBER_LINE_HEIGHT;
    }
    out.push_str(&format!(
        r#"  <line class="separator" x1="{}" y1="{}" x2="{}" y2="{}"/>"#,
        class.x,
        line_y - MEMBER_LINE_HEIGHT + 6.0,
        class.x + class.w,
        line_y - MEMBER_LINE_HEIGHT + 6.0
    ));
    out.push('\n');
    line_y += 2.0;
    for operation in &class.operations {
        out.push_str(&format!(
            r#"  <text class="member" x="{}" y="{}">{}</text>"#,
            class.x + TEXT_INSET,
            line_y,
            escape_xml(&operation.signature())
        ));
        out.push('\n');
        line_y += MEMBER_LINE_HEIGHT;
    }
    out.push_str("</g>\n");
    out
}

/// Edge between two class rectangles; dangling relations render nothing.
fn edge_fragment(state: &EditorState, relation: &Relation) -> Option<String> {
    let source = state.diagram.class_by_id(&relation.source)?;
    let target = state.diagram.class_by_id(&relation.target)?;
    let from = intersect_rect_edge(source.rect(), target.rect().center());
    let to = intersect_rect_edge(target.rect(), source.rect().center());
    let selected = is_selected(state, EntityKind::Relation, &relation.id);
    let class_attr = if selected {
        format!("edge {} selected", relation.kind.as_str())
    } else {
        format!("edge {}", relation.kind.as_str())
    };
    Some(format!(
        "<line class=\"{}\" data-id=\"{}\" x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\"/>\n",
        class_attr,
        escape_xml(&relation.id),
        from.x,
        from.y,
        to.x,
        to.y
    ))
}

fn grid_pattern(grid_step: f64) -> String {
    let step = grid_step.max(1.0);
    format!(
        concat!(
            "  <defs>\n",
            "    <pattern id=\"grid\" width=\"{step}\" height=\"{step}\" patternUnits=\"userSpaceOnUse\">\n",
            "      <path class=\"grid-line\" d=\"M {step} 0 L 0 0 0 {step}\"/>\n",
            "    </pattern>\n",
            "  </defs>\n",
            "  <rect class=\"grid-fill\" width=\"100%\" height=\"100%\" fill=\"url(#grid)\"/>\n"
        ),
        step = step
    )
}

fn is_selected(state: &EditorState, kind: EntityKind, id: &str) -> bool {
    state
        .diagram
        .selection
        .as_ref()
        .is_some_and(|s| s.kind == kind && s.id == id)
}

fn indent(fragment: &str, spaces: usize) -> String {
    let pad = " ".repeat(spaces);
    let mut out = String::new();
    for line in fragment.lines() {
        out.push_str(&pad);
        out.push_str(line);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::model::RelationKind;

    #[test]
    fn test_entities_carry_stable_data_ids() {
        let mut state = EditorState::new();
        state.diagram.add_package(80.0, 80.0, None);
        let a = state.diagram.add_class(140.0, 160.0).id.clone();
        let b = state.diagram.add_class(500.0, 160.0).id.clone();
        let relation_id = state
            .diagram
            .add_relation(RelationKind::Association, &a, &b)
            .unwrap()
            .id
            .clone();

        let svg = render_svg(&state, 16.0);
        assert!(svg.contains(r#"data-id="P1""#));
        assert!(svg.contains(&format!(r#"data-id="{}""#, a)));
        assert!(svg.contains(&format!(r#"data-id="{}""#, relation_id)));
    }

    #[test]
    fn test_package_fragment_has_eight_handles() {
        let mut state = EditorState::new();
        state.diagram.add_package(80.0, 80.0, None);
        let fragment = package_fragment(state.diagram.package_by_id("P1").unwrap());
        assert_eq!(fragment.matches(r#"class="handle""#).count(), 8);
        for key in ["nw", "n", "ne", "w", "e", "sw", "s", "se"] {
            assert!(
                fragment.contains(&format!(r#"data-direction="{}""#, key)),
                "missing {} handle",
                key
            );
        }
    }

    #[test]
    fn test_dangling_relation_renders_nothing() {
        let mut state = EditorState::new();
        let a = state.diagram.add_class(0.0, 0.0).id.clone();
        let b = state.diagram.add_class(500.0, 0.0).id.clone();
        state.diagram.add_relation(RelationKind::Dependency, &a, &b);
        state.diagram.classes.retain(|c| c.id != b);

        let svg = render_svg(&state, 16.0);
        assert!(!svg.contains("edge dependency"));
    }

    #[test]
    fn test_viewport_transform_follows_view() {
        let mut state = EditorState::new();
        state.view.pan = Point::new(40.0, -12.0);
        state.view.zoom = 2.0;
        let svg = render_svg(&state, 16.0);
        assert!(svg.contains(&format!("transform=\"{}\"", state.view.svg_transform())));
    }

    #[test]
    fn test_pending_edge_rendered_from_source_center() {
        let mut state = EditorState::new();
        let a = state.diagram.add_class(0.0, 0.0).id.clone();
        state.link.active = true;
        crate::interaction::LinkService::click_class(&mut state, &a);
        crate::interaction::LinkService::update_preview(&mut state, Point::new(400.0, 300.0));

        let svg = render_svg(&state, 16.0);
        assert!(svg.contains(r#"class="edge pending" x1="100" y1="55" x2="400" y2="300""#));
    }

    #[test]
    fn test_selected_entity_marked() {
        let mut state = EditorState::new();
        let a = state.diagram.add_class(0.0, 0.0).id.clone();
        state.diagram.set_selected(EntityKind::Class, &a);
        let svg = render_svg(&state, 16.0);
        assert!(svg.contains(r#"<g class="class selected""#));
    }

    #[test]
    fn test_member_text_is_escaped() {
        let mut state = EditorState::new();
        let a = state.diagram.add_class(0.0, 0.0).id.clone();
        state.diagram.set_class_members(
            &a,
            vec![crate::model::Attribute::parse("items: Vec<T>").unwrap()],
            vec![],
        );
        let svg = render_svg(&state, 16.0);
        assert!(svg.contains("items: Vec&lt;T&gt;"));
    }
}
