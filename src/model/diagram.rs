//! The mutable entity graph: classes, packages, relations, selection and
//! identity generation.

use crate::geometry::{class_in_package_body, Rect};

use super::entities::{
    Attribute, ClassNode, EntityKind, Operation, PackageNode, Relation, RelationKind, Selection,
    DEFAULT_CLASS_SIZE, DEFAULT_PACKAGE_SIZE,
};

/// Central diagram state. All operations are synchronous; missing ids are
/// no-ops rather than errors.
#[derive(Debug, Clone, Default)]
pub struct Diagram {
    pub classes: Vec<ClassNode>,
    pub packages: Vec<PackageNode>,
    pub relations: Vec<Relation>,
    pub selection: Option<Selection>,
    next_id: u64,
}

impl Diagram {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Self::default()
        }
    }

    fn generate_id(&mut self, prefix: char) -> String {
        let id = format!("{}{}", prefix, self.next_id);
        self.next_id += 1;
        id
    }

    /// Create and append a new class at the given world position.
    pub fn add_class(&mut self, x: f64, y: f64) -> &ClassNode {
        let id = self.generate_id('C');
        let (w, h) = DEFAULT_CLASS_SIZE;
        // Default names number from the already-advanced counter.
        let name = format!("Class{}", self.next_id);
        self.classes.push(ClassNode {
            id,
            name,
            x,
            y,
            w,
            h,
            attributes: vec![],
            operations: vec![],
            package_id: None,
        });
        self.classes.last().expect("just pushed")
    }

    /// Create and append a new package, optionally nested under a parent.
    pub fn add_package(&mut self, x: f64, y: f64, parent_id: Option<String>) -> &PackageNode {
        let id = self.generate_id('P');
        let (w, h) = DEFAULT_PACKAGE_SIZE;
        let name = format!("Module{}", self.next_id);
        self.packages.push(PackageNode {
            id,
            name,
            x,
            y,
            w,
            h,
            parent_id,
        });
        self.packages.last().expect("just pushed")
    }

    /// Create a relation between two classes. Returns None (no-op) when the
    /// endpoints are equal or either is empty.
    pub fn add_relation(
        &mut self,
        kind: RelationKind,
        source: &str,
        target: &str,
    ) -> Option<&Relation> {
        if source.is_empty() || target.is_empty() || source == target {
            return None;
        }
        let id = self.generate_id('R');
        self.relations.push(Relation {
            id,
            kind,
            source: source.to_string(),
            target: target.to_string(),
        });
        self.relations.last()
    }

    /// Remove a class along with every relation referencing it.
    pub fn remove_class(&mut self, id: &str) {
        self.classes.retain(|c| c.id != id);
        let removed: Vec<String> = self
            .relations
            .iter()
            .filter(|r| r.source == id || r.target == id)
            .map(|r| r.id.clone())
            .collect();
        self.relations.retain(|r| r.source != id && r.target != id);
        self.drop_selection_if(EntityKind::Class, id);
        for relation_id in removed {
            self.drop_selection_if(EntityKind::Relation, &relation_id);
        }
    }

    /// Remove a package; member classes and child packages are detached,
    /// never deleted.
    pub fn remove_package(&mut self, id: &str) {
        self.packages.retain(|p| p.id != id);
        for class in &mut self.classes {
            if class.package_id.as_deref() == Some(id) {
                class.package_id = None;
            }
        }
        for package in &mut self.packages {
            if package.parent_id.as_deref() == Some(id) {
                package.parent_id = None;
            }
        }
        self.drop_selection_if(EntityKind::Package, id);
    }

    /// Remove a relation by id.
    pub fn remove_relation(&mut self, id: &str) {
        self.relations.retain(|r| r.id != id);
        self.drop_selection_if(EntityKind::Relation, id);
    }

    /// Drop every entity and restart identity generation.
    pub fn clear(&mut self) {
        self.classes.clear();
        self.packages.clear();
        self.relations.clear();
        self.selection = None;
        self.next_id = 1;
    }

    pub fn set_selected(&mut self, kind: EntityKind, id: &str) {
        self.selection = Some(Selection {
            kind,
            id: id.to_string(),
        });
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    fn drop_selection_if(&mut self, kind: EntityKind, id: &str) {
        if let Some(selection) = &self.selection {
            if selection.kind == kind && selection.id == id {
                self.selection = None;
            }
        }
    }

    pub fn class_by_id(&self, id: &str) -> Option<&ClassNode> {
        self.classes.iter().find(|c| c.id == id)
    }

    pub fn class_by_id_mut(&mut self, id: &str) -> Option<&mut ClassNode> {
        self.classes.iter_mut().find(|c| c.id == id)
    }

    pub fn package_by_id(&self, id: &str) -> Option<&PackageNode> {
        self.packages.iter().find(|p| p.id == id)
    }

    pub fn package_by_id_mut(&mut self, id: &str) -> Option<&mut PackageNode> {
        self.packages.iter_mut().find(|p| p.id == id)
    }

    pub fn relation_by_id(&self, id: &str) -> Option<&Relation> {
        self.relations.iter().find(|r| r.id == id)
    }

    /// Nesting depth of a package: 0 for roots, 1 for their children, etc.
    /// Broken parent references terminate the walk.
    pub fn package_depth(&self, id: &str) -> usize {
        let mut depth = 0;
        let mut current = self.package_by_id(id);
        // Bounded by the package count to survive accidental cycles.
        let limit = self.packages.len();
        while let Some(package) = current {
            match package.parent_id.as_deref() {
                Some(parent_id) if depth < limit => {
                    depth += 1;
                    current = self.package_by_id(parent_id);
                }
                _ => break,
            }
        }
        depth
    }

    /// Whether `ancestor_id` appears on `id`'s parent chain (the package
    /// itself does not count as its own ancestor).
    pub fn is_package_ancestor(&self, ancestor_id: &str, id: &str) -> bool {
        let mut current = self.package_by_id(id).and_then(|p| p.parent_id.as_deref());
        let limit = self.packages.len();
        let mut steps = 0;
        while let Some(parent_id) = current {
            if parent_id == ancestor_id {
                return true;
            }
            steps += 1;
            if steps > limit {
                break;
            }
            current = self
                .package_by_id(parent_id)
                .and_then(|p| p.parent_id.as_deref());
        }
        false
    }

    /// Resolve the package a class belongs to geometrically: every package
    /// containing the class's center is considered, and the most deeply
    /// nested one wins (overlapping nested regions are otherwise ambiguous).
    pub fn containing_package_for(&self, class_rect: Rect) -> Option<&PackageNode> {
        self.packages
            .iter()
            .filter(|p| class_in_package_body(class_rect, p.rect(), false))
            .max_by_key(|p| self.package_depth(&p.id))
    }

    /// Append an entity bulk-loaded from an external document, keeping its
    /// document id.
    pub fn push_loaded_class(&mut self, class: ClassNode) {
        self.classes.push(class);
    }

    pub fn push_loaded_package(&mut self, package: PackageNode) {
        self.packages.push(package);
    }

    pub fn push_loaded_relation(&mut self, relation: Relation) {
        self.relations.push(relation);
    }

    /// Reset the identity counter after a bulk load: the next generated id
    /// is one past the largest numeric suffix found on any loaded id.
    pub fn reset_id_counter(&mut self) {
        let max_suffix = self
            .classes
            .iter()
            .map(|c| c.id.as_str())
            .chain(self.packages.iter().map(|p| p.id.as_str()))
            .chain(self.relations.iter().map(|r| r.id.as_str()))
            .filter_map(numeric_suffix)
            .max()
            .unwrap_or(0);
        self.next_id = max_suffix + 1;
    }

    /// Convenience accessors used by the editor facade and tests.
    pub fn set_class_members(
        &mut self,
        id: &str,
        attributes: Vec<Attribute>,
        operations: Vec<Operation>,
    ) {
        if let Some(class) = self.class_by_id_mut(id) {
            class.attributes = attributes;
            class.operations = operations;
        }
    }
}

fn numeric_suffix(id: &str) -> Option<u64> {
    let digits: String = id
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return None;
    }
    digits.chars().rev().collect::<String>().parse().ok()
}
