//! Diagram entity types: classes, packages, relations and their members.

use std::fmt;

use crate::geometry::Rect;

/// Default size for newly created class nodes
pub const DEFAULT_CLASS_SIZE: (f64, f64) = (200.0, 110.0);
/// Default size for newly created package boxes
pub const DEFAULT_PACKAGE_SIZE: (f64, f64) = (360.0, 240.0);
/// Minimum package size enforced by resize
pub const MIN_PACKAGE_SIZE: (f64, f64) = (160.0, 120.0);

/// Member visibility on attributes and operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "private" => Visibility::Private,
            _ => Visibility::Public,
        }
    }
}

/// An operation parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub type_name: String,
}

/// A class attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub type_name: String,
    pub visibility: Visibility,
}

impl Attribute {
    /// Parse an attribute from its `name: type` text form. An optional
    /// leading `-` marks the attribute private (`+` is accepted for public).
    pub fn parse(text: &str) -> Option<Self> {
        let (visibility, rest) = strip_visibility(text.trim());
        let (name, type_name) = split_name_type(rest);
        if name.is_empty() {
            return None;
        }
        Some(Self {
            name,
            type_name,
            visibility,
        })
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.visibility == Visibility::Private {
            write!(f, "-")?;
        }
        write!(f, "{}", self.name)?;
        if !self.type_name.is_empty() {
            write!(f, ": {}", self.type_name)?;
        }
        Ok(())
    }
}

/// A class operation with ordered parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub name: String,
    pub params: Vec<Parameter>,
    pub return_type: String,
    pub visibility: Visibility,
}

impl Operation {
    /// Parse an operation signature of the form
    /// `name(param: type, ...): returnType`.
    ///
    /// Parentheses delimit the parameter list, colons separate names from
    /// types, and a trailing colon after the closing parenthesis introduces
    /// the return type. A signature without parentheses yields an operation
    /// with the whole text as its name. An optional leading `-` marks the
    /// operation private.
    pub fn parse(signature: &str) -> Option<Self> {
        let (visibility, trimmed) = strip_visibility(signature.trim());
        if trimmed.is_empty() {
            return None;
        }
        let open = trimmed.find('(');
        let close = open.and_then(|o| trimmed[o + 1..].find(')').map(|c| o + 1 + c));
        let (open, close) = match (open, close) {
            (Some(o), Some(c)) => (o, c),
            _ => {
                return Some(Self {
                    name: trimmed.to_string(),
                    params: vec![],
                    return_type: String::new(),
                    visibility,
                });
            }
        };

        let name = trimmed[..open].trim().to_string();
        let mut params = vec![];
        let params_part = trimmed[open + 1..close].trim();
        if !params_part.is_empty() {
            for param in params_part.split(',') {
                let (param_name, type_name) = split_name_type(param);
                if !param_name.is_empty() {
                    params.push(Parameter {
                        name: param_name,
                        type_name,
                    });
                }
            }
        }

        let after = trimmed[close + 1..].trim();
        let return_type = after
            .strip_prefix(':')
            .map(|r| r.trim().to_string())
            .unwrap_or_default();

        Some(Self {
            name,
            params,
            return_type,
            visibility,
        })
    }

    /// The `name(param: type, ...): returnType` text form of the operation.
    pub fn signature(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.visibility == Visibility::Private {
            write!(f, "-")?;
        }
        write!(f, "{}(", self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", param.name)?;
            if !param.type_name.is_empty() {
                write!(f, ": {}", param.type_name)?;
            }
        }
        write!(f, ")")?;
        if !self.return_type.is_empty() {
            write!(f, ": {}", self.return_type)?;
        }
        Ok(())
    }
}

fn strip_visibility(text: &str) -> (Visibility, &str) {
    if let Some(rest) = text.strip_prefix('-') {
        (Visibility::Private, rest.trim_start())
    } else if let Some(rest) = text.strip_prefix('+') {
        (Visibility::Public, rest.trim_start())
    } else {
        (Visibility::Public, text)
    }
}

fn split_name_type(text: &str) -> (String, String) {
    match text.split_once(':') {
        Some((name, type_name)) => (name.trim().to_string(), type_name.trim().to_string()),
        None => (text.trim().to_string(), String::new()),
    }
}

/// The fixed set of relation kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    Association,
    Aggregation,
    Composition,
    Dependency,
    Realization,
    Generalization,
}

impl RelationKind {
    pub const ALL: [RelationKind; 6] = [
        RelationKind::Association,
        RelationKind::Aggregation,
        RelationKind::Composition,
        RelationKind::Dependency,
        RelationKind::Realization,
        RelationKind::Generalization,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RelationKind::Association => "association",
            RelationKind::Aggregation => "aggregation",
            RelationKind::Composition => "composition",
            RelationKind::Dependency => "dependency",
            RelationKind::Realization => "realization",
            RelationKind::Generalization => "generalization",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.as_str() == s)
    }

    /// The `xmi:type` value used on the wire.
    pub fn xmi_type(&self) -> &'static str {
        match self {
            RelationKind::Association => "uml:Association",
            RelationKind::Aggregation => "uml:Aggregation",
            RelationKind::Composition => "uml:Composition",
            RelationKind::Dependency => "uml:Dependency",
            RelationKind::Realization => "uml:Realization",
            RelationKind::Generalization => "uml:Generalization",
        }
    }

    /// Parse an `xmi:type` value, with or without the `uml:` prefix.
    pub fn from_xmi_type(s: &str) -> Option<Self> {
        let bare = s.strip_prefix("uml:").unwrap_or(s);
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.xmi_type().strip_prefix("uml:") == Some(bare))
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A class node on the canvas
#[derive(Debug, Clone, PartialEq)]
pub struct ClassNode {
    pub id: String,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub attributes: Vec<Attribute>,
    pub operations: Vec<Operation>,
    /// Owning package, by identity. Membership is recomputed from geometry
    /// during drags, never by containment pointer.
    pub package_id: Option<String>,
}

impl ClassNode {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }
}

/// A package box on the canvas
#[derive(Debug, Clone, PartialEq)]
pub struct PackageNode {
    pub id: String,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    /// Parent package, by identity (enables nesting)
    pub parent_id: Option<String>,
}

impl PackageNode {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }
}

/// A typed relation between two classes
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    pub id: String,
    pub kind: RelationKind,
    pub source: String,
    pub target: String,
}

/// Kind discriminator for selectable entities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Class,
    Package,
    Relation,
}

/// The current selection: at most one entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub kind: EntityKind,
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_operation_full_signature() {
        let op = Operation::parse("do(x: int, y): str").expect("should parse");
        assert_eq!(op.name, "do");
        assert_eq!(op.params.len(), 2);
        assert_eq!(op.params[0].name, "x");
        assert_eq!(op.params[0].type_name, "int");
        assert_eq!(op.params[1].name, "y");
        assert_eq!(op.params[1].type_name, "");
        assert_eq!(op.return_type, "str");
        assert_eq!(op.visibility, Visibility::Public);
    }

    #[test]
    fn test_parse_operation_without_parens() {
        let op = Operation::parse("initialize").expect("should parse");
        assert_eq!(op.name, "initialize");
        assert!(op.params.is_empty());
        assert_eq!(op.return_type, "");
    }

    #[test]
    fn test_parse_operation_empty_params_and_no_return() {
        let op = Operation::parse("run()").expect("should parse");
        assert_eq!(op.name, "run");
        assert!(op.params.is_empty());
        assert_eq!(op.return_type, "");
    }

    #[test]
    fn test_parse_private_operation() {
        let op = Operation::parse("-helper(): bool").expect("should parse");
        assert_eq!(op.visibility, Visibility::Private);
        assert_eq!(op.name, "helper");
        assert_eq!(op.return_type, "bool");
    }

    #[test]
    fn test_operation_signature_roundtrip() {
        let signature = "convert(input: str, strict: bool): Result";
        let op = Operation::parse(signature).expect("should parse");
        assert_eq!(op.signature(), signature);
    }

    #[test]
    fn test_parse_attribute() {
        let attr = Attribute::parse("count: int").expect("should parse");
        assert_eq!(attr.name, "count");
        assert_eq!(attr.type_name, "int");
        assert_eq!(attr.visibility, Visibility::Public);

        let attr = Attribute::parse("-secret").expect("should parse");
        assert_eq!(attr.name, "secret");
        assert_eq!(attr.type_name, "");
        assert_eq!(attr.visibility, Visibility::Private);

        assert!(Attribute::parse("   ").is_none());
    }

    #[test]
    fn test_relation_kind_xmi_mapping() {
        for kind in RelationKind::ALL {
            assert_eq!(RelationKind::from_xmi_type(kind.xmi_type()), Some(kind));
        }
        assert_eq!(
            RelationKind::from_xmi_type("Generalization"),
            Some(RelationKind::Generalization)
        );
        assert_eq!(RelationKind::from_xmi_type("uml:Class"), None);
    }

    #[test]
    fn test_relation_kind_name_mapping() {
        assert_eq!(
            RelationKind::from_str("aggregation"),
            Some(RelationKind::Aggregation)
        );
        assert_eq!(RelationKind::from_str("friendship"), None);
    }
}
