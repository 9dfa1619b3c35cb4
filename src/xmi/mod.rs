//! XMI 2.1 wire format: export to and import from the XML interchange
//! document consumed by external modeling tools.

pub mod export;
pub mod import;

pub use export::export_xmi;
pub use import::import_xmi;

use thiserror::Error;

pub const UML_NAMESPACE: &str = "http://schema.omg.org/spec/UML/2.1";
pub const XMI_NAMESPACE: &str = "http://schema.omg.org/spec/XMI/2.1";
pub const XMI_VERSION: &str = "2.1";

#[derive(Debug, Error)]
pub enum XmiError {
    /// Malformed document; carries the parser's diagnostic. No partial
    /// load is attempted.
    #[error("invalid XML format: {0}")]
    Xml(String),
    /// Structurally valid XML with no `uml:Model` element
    #[error("document contains no uml:Model element")]
    MissingModel,
}
