//! Serialize a diagram to an XMI 2.1 document.
//!
//! The writer builds the document as indented text. Relations reference
//! their endpoints by class name (the format's `client`/`supplier`
//! convention) and are nested under the package both endpoints share, or
//! under the model root when they differ or either endpoint is unpackaged.

use crate::model::{ClassNode, Diagram, Relation};
use crate::xml::escape_xml;

use super::{UML_NAMESPACE, XMI_NAMESPACE, XMI_VERSION};

/// Render the diagram as an XMI 2.1 document.
pub fn export_xmi(diagram: &Diagram, model_name: &str) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str(&format!(
        r#"<xmi:XMI xmlns:uml="{}" xmlns:xmi="{}" xmi:version="{}">"#,
        UML_NAMESPACE, XMI_NAMESPACE, XMI_VERSION
    ));
    out.push('\n');
    out.push_str(&format!(
        r#"  <uml:Model xmi:id="model1" name="{}">"#,
        escape_xml(model_name)
    ));
    out.push('\n');

    for package in diagram.packages.iter().filter(|p| p.parent_id.is_none()) {
        write_package(diagram, &package.id, &mut out, 2);
    }
    for class in diagram.classes.iter().filter(|c| c.package_id.is_none()) {
        write_class(class, &mut out, 2);
    }
    for relation in &diagram.relations {
        if relation_home(diagram, relation).is_none() {
            write_relation(diagram, relation, &mut out, 2);
        }
    }

    out.push_str("  </uml:Model>\n");
    out.push_str("</xmi:XMI>\n");
    out
}

/// The package a relation is serialized under: the one both endpoint
/// classes directly share.
fn relation_home<'a>(diagram: &'a Diagram, relation: &Relation) -> Option<&'a str> {
    let source = diagram.class_by_id(&relation.source)?;
    let target = diagram.class_by_id(&relation.target)?;
    let home = source.package_id.as_deref()?;
    if target.package_id.as_deref() == Some(home) && diagram.package_by_id(home).is_some() {
        Some(home)
    } else {
        None
    }
}

fn write_package(diagram: &Diagram, package_id: &str, out: &mut String, depth: usize) {
    let Some(package) = diagram.package_by_id(package_id) else {
        return;
    };
    let pad = "  ".repeat(depth);
    out.push_str(&format!(
        r#"{}<packagedElement xmi:type="uml:Package" xmi:id="{}" name="{}">"#,
        pad,
        escape_xml(&package.id),
        escape_xml(&package.name)
    ));
    out.push('\n');

    for child in diagram
        .packages
        .iter()
        .filter(|p| p.parent_id.as_deref() == Some(package_id))
    {
        write_package(diagram, &child.id, out, depth + 1);
    }
    for class in diagram
        .classes
        .iter()
        .filter(|c| c.package_id.as_deref() == Some(package_id))
    {
        write_class(class, out, depth + 1);
    }
    for relation in &diagram.relations {
        if relation_home(diagram, relation) == Some(package_id) {
            write_relation(diagram, relation, out, depth + 1);
        }
    }

    out.push_str(&format!("{}</packagedElement>\n", pad));
}

fn write_class(class: &ClassNode, out: &mut String, depth: usize) {
    let pad = "  ".repeat(depth);
    if class.attributes.is_empty() && class.operations.is_empty() {
        out.push_str(&format!(
            r#"{}<packagedElement xmi:type="uml:Class" xmi:id="{}" name="{}"/>"#,
            pad,
            escape_xml(&class.id),
            escape_xml(&class.name)
        ));
        out.push('\n');
        return;
    }
    out.push_str(&format!(
        r#"{}<packagedElement xmi:type="uml:Class" xmi:id="{}" name="{}">"#,
        pad,
        escape_xml(&class.id),
        escape_xml(&class.name)
    ));
    out.push('\n');

    let inner = "  ".repeat(depth + 1);
    for (i, attribute) in class.attributes.iter().enumerate() {
        let type_attr = if attribute.type_name.is_empty() {
            String::new()
        } else {
            format!(r#" type="{}""#, escape_xml(&attribute.type_name))
        };
        out.push_str(&format!(
            r#"{}<ownedAttribute xmi:id="{}_attr{}" name="{}"{} visibility="{}"/>"#,
            inner,
            escape_xml(&class.id),
            i,
            escape_xml(&attribute.name),
            type_attr,
            attribute.visibility.as_str()
        ));
        out.push('\n');
    }
    for (i, operation) in class.operations.iter().enumerate() {
        out.push_str(&format!(
            r#"{}<ownedOperation xmi:id="{}_op{}" name="{}" visibility="{}">"#,
            inner,
            escape_xml(&class.id),
            i,
            escape_xml(&operation.name),
            operation.visibility.as_str()
        ));
        out.push('\n');
        let param_pad = "  ".repeat(depth + 2);
        for param in &operation.params {
            let type_attr = if param.type_name.is_empty() {
                String::new()
            } else {
                format!(r#" type="{}""#, escape_xml(&param.type_name))
            };
            out.push_str(&format!(
                r#"{}<ownedParameter direction="in" name="{}"{}/>"#,
                param_pad,
                escape_xml(&param.name),
                type_attr
            ));
            out.push('\n');
        }
        if !operation.return_type.is_empty() {
            out.push_str(&format!(
                r#"{}<ownedParameter direction="return" type="{}"/>"#,
                param_pad,
                escape_xml(&operation.return_type)
            ));
            out.push('\n');
        }
        out.push_str(&format!("{}</ownedOperation>\n", inner));
    }
    out.push_str(&format!("{}</packagedElement>\n", pad));
}

fn write_relation(diagram: &Diagram, relation: &Relation, out: &mut String, depth: usize) {
    let (Some(source), Some(target)) = (
        diagram.class_by_id(&relation.source),
        diagram.class_by_id(&relation.target),
    ) else {
        // Dangling endpoints never reach the wire.
        return;
    };
    let pad = "  ".repeat(depth);
    out.push_str(&format!(
        r#"{}<packagedElement xmi:type="{}" xmi:id="{}" name="{}" client="{}" supplier="{}"/>"#,
        pad,
        relation.kind.xmi_type(),
        escape_xml(&relation.id),
        relation.kind.as_str(),
        escape_xml(&source.name),
        escape_xml(&target.name)
    ));
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Attribute, Operation, RelationKind};

    #[test]
    fn test_export_skeleton() {
        let diagram = Diagram::new();
        let xml = export_xmi(&diagram, "Project");
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains(r#"xmi:version="2.1""#));
        assert!(xml.contains(r#"<uml:Model xmi:id="model1" name="Project">"#));
        assert!(xml.trim_end().ends_with("</xmi:XMI>"));
    }

    #[test]
    fn test_export_nested_packages_and_members() {
        let mut diagram = Diagram::new();
        let outer = diagram.add_package(0.0, 0.0, None).id.clone();
        let inner = diagram.add_package(0.0, 0.0, Some(outer.clone())).id.clone();
        let class_id = diagram.add_class(0.0, 0.0).id.clone();
        diagram.class_by_id_mut(&class_id).unwrap().package_id = Some(inner.clone());
        diagram.set_class_members(
            &class_id,
            vec![Attribute::parse("-count: int").unwrap()],
            vec![Operation::parse("convert(input: str): bool").unwrap()],
        );

        let xml = export_xmi(&diagram, "Project");
        let outer_pos = xml.find(&format!(r#"xmi:id="{}""#, outer)).unwrap();
        let inner_pos = xml.find(&format!(r#"xmi:id="{}""#, inner)).unwrap();
        let class_pos = xml.find(&format!(r#"xmi:id="{}""#, class_id)).unwrap();
        assert!(outer_pos < inner_pos && inner_pos < class_pos);
        assert!(xml.contains(r#"name="count" type="int" visibility="private""#));
        assert!(xml.contains(r#"<ownedParameter direction="in" name="input" type="str"/>"#));
        assert!(xml.contains(r#"<ownedParameter direction="return" type="bool"/>"#));
    }

    #[test]
    fn test_relation_placement_and_name_references() {
        let mut diagram = Diagram::new();
        let package = diagram.add_package(0.0, 0.0, None).id.clone();
        let a = diagram.add_class(0.0, 0.0).id.clone();
        let b = diagram.add_class(0.0, 0.0).id.clone();
        let c = diagram.add_class(0.0, 0.0).id.clone();
        diagram.class_by_id_mut(&a).unwrap().package_id = Some(package.clone());
        diagram.class_by_id_mut(&b).unwrap().package_id = Some(package.clone());
        let shared = diagram
            .add_relation(RelationKind::Composition, &a, &b)
            .unwrap()
            .id
            .clone();
        let crossing = diagram
            .add_relation(RelationKind::Dependency, &a, &c)
            .unwrap()
            .id
            .clone();

        let xml = export_xmi(&diagram, "Project");
        let package_close = xml.find("</packagedElement>").unwrap();
        let shared_pos = xml.find(&format!(r#"xmi:id="{}""#, shared)).unwrap();
        let crossing_pos = xml.find(&format!(r#"xmi:id="{}""#, crossing)).unwrap();
        // Shared-package relation nests inside the package, the crossing one
        // lands at the model root.
        assert!(shared_pos < package_close);
        assert!(crossing_pos > package_close);

        let a_name = diagram.class_by_id(&a).unwrap().name.clone();
        let b_name = diagram.class_by_id(&b).unwrap().name.clone();
        assert!(xml.contains(&format!(
            r#"xmi:type="uml:Composition" xmi:id="{}" name="composition" client="{}" supplier="{}""#,
            shared, a_name, b_name
        )));
    }

    #[test]
    fn test_dangling_relation_not_exported() {
        let mut diagram = Diagram::new();
        let a = diagram.add_class(0.0, 0.0).id.clone();
        diagram.add_relation(RelationKind::Association, &a, "C999");
        let xml = export_xmi(&diagram, "Project");
        assert!(!xml.contains("uml:Association"));
    }

    #[test]
    fn test_names_are_escaped() {
        let mut diagram = Diagram::new();
        let id = diagram.add_class(0.0, 0.0).id.clone();
        diagram.class_by_id_mut(&id).unwrap().name = "Logger<T> & Co".to_string();
        let xml = export_xmi(&diagram, "A \"quoted\" model");
        assert!(xml.contains(r#"name="Logger&lt;T&gt; &amp; Co""#));
        assert!(xml.contains(r#"name="A &quot;quoted&quot; model""#));
    }
}
