//! Streaming XMI 2.1 import.
//!
//! The reader walks the document once, materializing packages and classes
//! as their elements open and resolving relations in a second in-memory
//! step. Relations reference endpoints by class name; under duplicate names
//! the first declared class wins, matching the format's known ambiguity.
//! Unresolved relations are dropped, never stored dangling.

use std::collections::{HashMap, HashSet};

use quick_xml::events::{BytesStart, Event as XmlEvent};
use quick_xml::reader::Reader as XmlReader;

use crate::model::{
    Attribute, ClassNode, Diagram, Operation, PackageNode, Parameter, Relation, RelationKind,
    Visibility, DEFAULT_CLASS_SIZE, DEFAULT_PACKAGE_SIZE,
};
use crate::xml::unescape_xml;

use super::XmiError;

type Attrs = Vec<(String, String)>;

fn collect_attrs(e: &BytesStart) -> Attrs {
    e.attributes()
        .filter_map(|a| a.ok())
        .map(|a| {
            (
                String::from_utf8_lossy(a.key.as_ref()).to_string(),
                unescape_xml(&String::from_utf8_lossy(&a.value)),
            )
        })
        .collect()
}

fn get_attr(attrs: &Attrs, name: &str) -> Option<String> {
    attrs.iter().find(|(k, _)| k == name).map(|(_, v)| v.clone())
}

/// What an open element contributes to elements nested inside it.
#[derive(Debug, Clone, PartialEq)]
enum Scope {
    Model,
    Package(String),
    Class(String),
    Operation,
    Ignored,
}

#[derive(Debug)]
struct PendingRelation {
    id: String,
    kind: RelationKind,
    client: String,
    supplier: String,
}

#[derive(Default)]
struct Importer {
    diagram: Diagram,
    scopes: Vec<Scope>,
    saw_model: bool,
    synthetic_ids: u32,
    pending: Vec<PendingRelation>,
    /// Operation under construction, with its owning class id
    operation: Option<(String, Operation)>,
}

/// Parse an XMI document into a fresh diagram. Positions are defaulted;
/// callers run the batch layout before first render.
pub fn import_xmi(xml: &str) -> Result<Diagram, XmiError> {
    let mut reader = XmlReader::from_str(xml);
    reader.config_mut().trim_text(true);
    reader.config_mut().check_end_names = true;

    let mut importer = Importer::default();
    importer.diagram = Diagram::new();
    let mut buf = Vec::new();
    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| XmiError::Xml(e.to_string()))?;
        match event {
            XmlEvent::Start(ref e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                let attrs = collect_attrs(e);
                let scope = importer.open_element(&name, &attrs);
                importer.scopes.push(scope);
            }
            XmlEvent::Empty(ref e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                let attrs = collect_attrs(e);
                let scope = importer.open_element(&name, &attrs);
                importer.close_scope(scope);
            }
            XmlEvent::End(_) => {
                if let Some(scope) = importer.scopes.pop() {
                    importer.close_scope(scope);
                }
            }
            XmlEvent::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !importer.saw_model {
        return Err(XmiError::MissingModel);
    }
    Ok(importer.finish())
}

impl Importer {
    fn current_package(&self) -> Option<String> {
        self.scopes.iter().rev().find_map(|s| match s {
            Scope::Package(id) => Some(id.clone()),
            _ => None,
        })
    }

    fn current_class(&self) -> Option<String> {
        self.scopes.iter().rev().find_map(|s| match s {
            Scope::Class(id) => Some(id.clone()),
            _ => None,
        })
    }

    fn take_id(&mut self, attrs: &Attrs) -> String {
        get_attr(attrs, "xmi:id").unwrap_or_else(|| {
            self.synthetic_ids += 1;
            format!("import{}", self.synthetic_ids)
        })
    }

    fn open_element(&mut self, name: &str, attrs: &Attrs) -> Scope {
        match name {
            "uml:Model" => {
                self.saw_model = true;
                Scope::Model
            }
            "packagedElement" => {
                let xmi_type = get_attr(attrs, "xmi:type").unwrap_or_default();
                match xmi_type.as_str() {
                    "uml:Package" => {
                        let id = self.take_id(attrs);
                        let (w, h) = DEFAULT_PACKAGE_SIZE;
                        self.diagram.push_loaded_package(PackageNode {
                            id: id.clone(),
                            name: get_attr(attrs, "name").unwrap_or_else(|| "Module".to_string()),
                            x: 0.0,
                            y: 0.0,
                            w,
                            h,
                            parent_id: self.current_package(),
                        });
                        Scope::Package(id)
                    }
                    "uml:Class" => {
                        let id = self.take_id(attrs);
                        let (w, h) = DEFAULT_CLASS_SIZE;
                        self.diagram.push_loaded_class(ClassNode {
                            id: id.clone(),
                            name: get_attr(attrs, "name").unwrap_or_else(|| "Class".to_string()),
                            x: 0.0,
                            y: 0.0,
                            w,
                            h,
                            attributes: vec![],
                            operations: vec![],
                            package_id: self.current_package(),
                        });
                        Scope::Class(id)
                    }
                    other => {
                        if let Some(kind) = RelationKind::from_xmi_type(other) {
                            let id = self.take_id(attrs);
                            if let (Some(client), Some(supplier)) =
                                (get_attr(attrs, "client"), get_attr(attrs, "supplier"))
                            {
                                self.pending.push(PendingRelation {
                                    id,
                                    kind,
                                    client,
                                    supplier,
                                });
                            }
                        }
                        Scope::Ignored
                    }
                }
            }
            "ownedAttribute" => {
                if let Some(class_id) = self.current_class() {
                    if let Some(attr_name) = get_attr(attrs, "name") {
                        let attribute = Attribute {
                            name: attr_name,
                            type_name: get_attr(attrs, "type").unwrap_or_default(),
                            visibility: Visibility::from_str(
                                get_attr(attrs, "visibility").unwrap_or_default().as_str(),
                            ),
                        };
                        if let Some(class) = self.diagram.class_by_id_mut(&class_id) {
                            class.attributes.push(attribute);
                        }
                    }
                }
                Scope::Ignored
            }
            "ownedOperation" => {
                if let Some(class_id) = self.current_class() {
                    let operation = Operation {
                        name: get_attr(attrs, "name").unwrap_or_default(),
                        params: vec![],
                        return_type: String::new(),
                        visibility: Visibility::from_str(
                            get_attr(attrs, "visibility").unwrap_or_default().as_str(),
                        ),
                    };
                    self.operation = Some((class_id, operation));
                    return Scope::Operation;
                }
                Scope::Ignored
            }
            "ownedParameter" => {
                if let Some((_, operation)) = &mut self.operation {
                    let direction = get_attr(attrs, "direction").unwrap_or_default();
                    if direction == "return" {
                        operation.return_type = get_attr(attrs, "type").unwrap_or_default();
                    } else {
                        operation.params.push(Parameter {
                            name: get_attr(attrs, "name").unwrap_or_default(),
                            type_name: get_attr(attrs, "type").unwrap_or_default(),
                        });
                    }
                }
                Scope::Ignored
            }
            _ => Scope::Ignored,
        }
    }

    /// Runs when a scope's element closes (or immediately for self-closing
    /// elements).
    fn close_scope(&mut self, scope: Scope) {
        if scope == Scope::Operation {
            if let Some((class_id, operation)) = self.operation.take() {
                if let Some(class) = self.diagram.class_by_id_mut(&class_id) {
                    class.operations.push(operation);
                }
            }
        }
    }

    fn finish(mut self) -> Diagram {
        let mut by_name: HashMap<String, String> = HashMap::new();
        for class in &self.diagram.classes {
            by_name
                .entry(class.name.clone())
                .or_insert_with(|| class.id.clone());
        }
        let mut seen_ids = HashSet::new();
        for pending in self.pending {
            if !seen_ids.insert(pending.id.clone()) {
                continue;
            }
            let (Some(source), Some(target)) =
                (by_name.get(&pending.client), by_name.get(&pending.supplier))
            else {
                log::debug!(
                    "dropping unresolved relation {} ({} -> {})",
                    pending.id,
                    pending.client,
                    pending.supplier
                );
                continue;
            };
            if source == target {
                continue;
            }
            self.diagram.push_loaded_relation(Relation {
                id: pending.id,
                kind: pending.kind,
                source: source.clone(),
                target: target.clone(),
            });
        }
        self.diagram.reset_id_counter();
        log::debug!(
            "imported {} classes, {} packages, {} relations",
            self.diagram.classes.len(),
            self.diagram.packages.len(),
            self.diagram.relations.len()
        );
        self.diagram
    }
}
