//! Diagram state model: entities, the mutable entity graph and the owned
//! per-session editor state.

pub mod diagram;
pub mod entities;

pub use diagram::Diagram;
pub use entities::{
    Attribute, ClassNode, EntityKind, Operation, PackageNode, Parameter, Relation, RelationKind,
    Selection, Visibility, DEFAULT_CLASS_SIZE, DEFAULT_PACKAGE_SIZE, MIN_PACKAGE_SIZE,
};

use crate::interaction::engine::Interaction;
use crate::interaction::link::LinkState;
use crate::view::ViewTransform;

/// The single owned state struct for one editor session. Constructed once,
/// passed explicitly to every component, discarded when the session ends.
#[derive(Debug, Default)]
pub struct EditorState {
    pub diagram: Diagram,
    pub view: ViewTransform,
    /// The active pointer interaction, if any. Exclusive: a second
    /// pointer-down while one is active is ignored.
    pub interaction: Option<Interaction>,
    pub link: LinkState,
}

impl EditorState {
    pub fn new() -> Self {
        Self {
            diagram: Diagram::new(),
            view: ViewTransform::new(),
            interaction: None,
            link: LinkState::default(),
        }
    }

    /// Whether the viewport is currently being panned (drives the panning
    /// cursor/visual mode in an embedding UI).
    pub fn is_panning(&self) -> bool {
        matches!(
            self.interaction,
            Some(Interaction {
                mode: crate::interaction::engine::InteractionMode::Pan { .. },
                ..
            })
        )
    }
}
