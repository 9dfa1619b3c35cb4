//! Two-click link creation between classes.
//!
//! While link mode is armed, the first click on a class anchors a pending
//! edge at that class's center; the pending edge's free endpoint follows the
//! pointer until a second class click commits the relation and disarms the
//! mode.

use crate::geometry::Point;
use crate::model::{EditorState, RelationKind};

/// A pending edge anchored at a source class, tracking the pointer
#[derive(Debug, Clone, PartialEq)]
pub struct PendingEdge {
    pub source_id: String,
    pub free_end: Point,
}

/// Link-mode state owned by the editor session
#[derive(Debug, Clone, PartialEq)]
pub struct LinkState {
    pub active: bool,
    pub kind: RelationKind,
    pub pending: Option<PendingEdge>,
}

impl Default for LinkState {
    fn default() -> Self {
        Self {
            active: false,
            kind: RelationKind::Association,
            pending: None,
        }
    }
}

/// Stateless operations over [`LinkState`]
pub struct LinkService;

impl LinkService {
    /// Arm link mode with the given relation kind, or disarm it when the
    /// same kind is toggled again. Switching kinds while armed re-arms
    /// without disturbing an in-flight pending edge's absence.
    pub fn toggle(state: &mut EditorState, kind: RelationKind) {
        if state.link.active && state.link.kind == kind {
            Self::cancel(state);
        } else {
            state.link.active = true;
            state.link.kind = kind;
            state.link.pending = None;
        }
    }

    /// Handle a class click while link mode is armed. Returns the id of the
    /// created relation on the committing (second) click.
    pub fn click_class(state: &mut EditorState, class_id: &str) -> Option<String> {
        if !state.link.active {
            return None;
        }
        let Some(pending) = state.link.pending.clone() else {
            let Some(class) = state.diagram.class_by_id(class_id) else {
                return None;
            };
            let center = class.rect().center();
            state.link.pending = Some(PendingEdge {
                source_id: class_id.to_string(),
                free_end: center,
            });
            return None;
        };
        // Any second class click commits: add_relation refuses self-links,
        // so clicking the source again just tears the preview down.
        let kind = state.link.kind;
        let created = state
            .diagram
            .add_relation(kind, &pending.source_id, class_id)
            .map(|r| r.id.clone());
        state.link.pending = None;
        state.link.active = false;
        created
    }

    /// Move the pending edge's free endpoint to a world position.
    pub fn update_preview(state: &mut EditorState, world: Point) {
        if let Some(pending) = &mut state.link.pending {
            pending.free_end = world;
        }
    }

    /// Disarm link mode and drop any pending edge.
    pub fn cancel(state: &mut EditorState) {
        state.link.active = false;
        state.link.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_arms_and_disarms() {
        let mut state = EditorState::new();
        LinkService::toggle(&mut state, RelationKind::Dependency);
        assert!(state.link.active);
        assert_eq!(state.link.kind, RelationKind::Dependency);

        // Same kind again: off.
        LinkService::toggle(&mut state, RelationKind::Dependency);
        assert!(!state.link.active);

        // Switching kinds while armed stays armed.
        LinkService::toggle(&mut state, RelationKind::Dependency);
        LinkService::toggle(&mut state, RelationKind::Composition);
        assert!(state.link.active);
        assert_eq!(state.link.kind, RelationKind::Composition);
    }

    #[test]
    fn test_two_clicks_create_relation() {
        let mut state = EditorState::new();
        let a = state.diagram.add_class(0.0, 0.0).id.clone();
        let b = state.diagram.add_class(400.0, 0.0).id.clone();
        LinkService::toggle(&mut state, RelationKind::Realization);

        assert_eq!(LinkService::click_class(&mut state, &a), None);
        let pending = state.link.pending.clone().expect("pending edge");
        assert_eq!(pending.source_id, a);
        // Anchored at the source class center.
        assert_eq!(pending.free_end, Point::new(100.0, 55.0));

        let relation_id = LinkService::click_class(&mut state, &b).expect("relation created");
        assert!(state.link.pending.is_none());
        assert!(!state.link.active);
        let relation = state.diagram.relation_by_id(&relation_id).unwrap();
        assert_eq!(relation.kind, RelationKind::Realization);
        assert_eq!(relation.source, a);
        assert_eq!(relation.target, b);
    }

    #[test]
    fn test_second_click_on_source_aborts_cleanly() {
        let mut state = EditorState::new();
        let a = state.diagram.add_class(0.0, 0.0).id.clone();
        LinkService::toggle(&mut state, RelationKind::Association);
        LinkService::click_class(&mut state, &a);
        assert_eq!(LinkService::click_class(&mut state, &a), None);
        // No self-relation, and the preview is gone rather than lingering.
        assert!(state.diagram.relations.is_empty());
        assert!(state.link.pending.is_none());
        assert!(!state.link.active);
    }

    #[test]
    fn test_preview_follows_pointer() {
        let mut state = EditorState::new();
        let a = state.diagram.add_class(0.0, 0.0).id.clone();
        LinkService::toggle(&mut state, RelationKind::Association);
        LinkService::click_class(&mut state, &a);
        LinkService::update_preview(&mut state, Point::new(312.0, -40.0));
        assert_eq!(
            state.link.pending.as_ref().unwrap().free_end,
            Point::new(312.0, -40.0)
        );
    }

    #[test]
    fn test_cancel_drops_pending() {
        let mut state = EditorState::new();
        let a = state.diagram.add_class(0.0, 0.0).id.clone();
        LinkService::toggle(&mut state, RelationKind::Association);
        LinkService::click_class(&mut state, &a);
        LinkService::cancel(&mut state);
        assert!(!state.link.active);
        assert!(state.link.pending.is_none());
    }

    #[test]
    fn test_clicks_ignored_when_disarmed() {
        let mut state = EditorState::new();
        let a = state.diagram.add_class(0.0, 0.0).id.clone();
        assert_eq!(LinkService::click_class(&mut state, &a), None);
        assert!(state.link.pending.is_none());
    }
}
