//! The pointer-driven interaction state machine: panning, dragging classes
//! and packages, and resizing packages.
//!
//! Exactly one interaction is active at a time, keyed by the originating
//! pointer identity. Pointer-down dispatches through the ordered hit test in
//! [`crate::interaction::hit`]; every branch expects the embedder to suppress
//! the platform's native scroll/selection behavior for the event.

use crate::config::EditorConfig;
use crate::geometry::{class_in_package_body, Point, Rect};
use crate::model::{EditorState, EntityKind, MIN_PACKAGE_SIZE};
use crate::scheduler::RenderScheduler;
use crate::view::snap;

use super::hit::{hit_test, HitTarget, ResizeDirection};
use super::link::LinkService;

/// A pointer event in screen coordinates
#[derive(Debug, Clone, Copy)]
pub struct PointerEvent {
    pub pointer_id: u64,
    pub screen: Point,
}

impl PointerEvent {
    pub fn new(pointer_id: u64, x: f64, y: f64) -> Self {
        Self {
            pointer_id,
            screen: Point::new(x, y),
        }
    }
}

/// A wheel event in screen coordinates; positive `delta_y` scrolls down
/// (zooms out)
#[derive(Debug, Clone, Copy)]
pub struct WheelEvent {
    pub screen: Point,
    pub delta_y: f64,
}

/// The active interaction, recorded at pointer-down
#[derive(Debug, Clone, PartialEq)]
pub struct Interaction {
    pub pointer_id: u64,
    pub mode: InteractionMode,
}

/// Start snapshot per interaction mode
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionMode {
    Pan {
        origin_screen: Point,
        origin_pan: Point,
    },
    DragClass {
        class_id: String,
        origin_world: Point,
        origin_pos: Point,
    },
    DragPackage {
        package_id: String,
        origin_world: Point,
        origin_pos: Point,
    },
    ResizePackage {
        package_id: String,
        origin_world: Point,
        origin: Rect,
        direction: ResizeDirection,
    },
}

/// The interaction engine. Stateless itself; the in-progress interaction
/// lives on the [`EditorState`].
#[derive(Debug, Default)]
pub struct InteractionEngine;

impl InteractionEngine {
    pub fn new() -> Self {
        Self
    }

    /// Pointer-down dispatcher. Hit-test precedence: resize handle, class
    /// node, package header, background (pan).
    pub fn pointer_down(
        &self,
        state: &mut EditorState,
        scheduler: &mut RenderScheduler,
        event: PointerEvent,
    ) {
        if state.interaction.is_some() {
            return;
        }
        let world = state.view.screen_to_world(event.screen);
        match hit_test(&state.diagram, world) {
            HitTarget::ResizeHandle {
                package_id,
                direction,
            } => {
                let Some(package) = state.diagram.package_by_id(&package_id) else {
                    return;
                };
                let origin = package.rect();
                state.interaction = Some(Interaction {
                    pointer_id: event.pointer_id,
                    mode: InteractionMode::ResizePackage {
                        package_id,
                        origin_world: world,
                        origin,
                        direction,
                    },
                });
            }
            HitTarget::Class { class_id } => {
                if state.link.active || state.link.pending.is_some() {
                    let _ = LinkService::click_class(state, &class_id);
                    state.diagram.set_selected(EntityKind::Class, &class_id);
                    scheduler.request();
                    return;
                }
                let Some(class) = state.diagram.class_by_id(&class_id) else {
                    return;
                };
                let origin_pos = Point::new(class.x, class.y);
                state.diagram.set_selected(EntityKind::Class, &class_id);
                state.interaction = Some(Interaction {
                    pointer_id: event.pointer_id,
                    mode: InteractionMode::DragClass {
                        class_id,
                        origin_world: world,
                        origin_pos,
                    },
                });
                scheduler.request();
            }
            HitTarget::PackageHeader { package_id } => {
                // Packages are not linkable; swallow the click in link mode.
                if state.link.active {
                    return;
                }
                let Some(package) = state.diagram.package_by_id(&package_id) else {
                    return;
                };
                let origin_pos = Point::new(package.x, package.y);
                state.diagram.set_selected(EntityKind::Package, &package_id);
                state.interaction = Some(Interaction {
                    pointer_id: event.pointer_id,
                    mode: InteractionMode::DragPackage {
                        package_id,
                        origin_world: world,
                        origin_pos,
                    },
                });
                scheduler.request();
            }
            HitTarget::Background => {
                state.interaction = Some(Interaction {
                    pointer_id: event.pointer_id,
                    mode: InteractionMode::Pan {
                        origin_screen: event.screen,
                        origin_pan: state.view.pan,
                    },
                });
            }
        }
    }

    /// Pointer-move handler for live interactions. With no interaction
    /// active, a pending link preview's free endpoint follows the pointer.
    ///
    /// Panning and resizing mutate state without scheduling a full render:
    /// the embedder applies the view transform, respectively a single
    /// package fragment, directly for responsiveness. A state-consistent
    /// render is scheduled on pointer-up.
    pub fn pointer_move(
        &self,
        state: &mut EditorState,
        config: &EditorConfig,
        scheduler: &mut RenderScheduler,
        event: PointerEvent,
    ) {
        let Some(interaction) = &state.interaction else {
            if state.link.pending.is_some() {
                let world = state.view.screen_to_world(event.screen);
                LinkService::update_preview(state, world);
                scheduler.request();
            }
            return;
        };
        let grid_step = config.grid_step();
        match interaction.mode.clone() {
            InteractionMode::Pan {
                origin_screen,
                origin_pan,
            } => {
                state.view.pan = Point::new(
                    origin_pan.x + (event.screen.x - origin_screen.x),
                    origin_pan.y + (event.screen.y - origin_screen.y),
                );
            }
            InteractionMode::DragClass {
                class_id,
                origin_world,
                origin_pos,
            } => {
                let world = state.view.screen_to_world(event.screen);
                let Some(class) = state.diagram.class_by_id_mut(&class_id) else {
                    return;
                };
                class.x = snap(origin_pos.x + (world.x - origin_world.x), grid_step);
                class.y = snap(origin_pos.y + (world.y - origin_world.y), grid_step);
                let rect = class.rect();
                let membership = state
                    .diagram
                    .containing_package_for(rect)
                    .map(|p| p.id.clone());
                if let Some(class) = state.diagram.class_by_id_mut(&class_id) {
                    class.package_id = membership;
                }
                scheduler.request();
            }
            InteractionMode::DragPackage {
                package_id,
                origin_world,
                origin_pos,
            } => {
                let world = state.view.screen_to_world(event.screen);
                let Some(package) = state.diagram.package_by_id_mut(&package_id) else {
                    return;
                };
                let new_x = snap(origin_pos.x + (world.x - origin_world.x), grid_step);
                let new_y = snap(origin_pos.y + (world.y - origin_world.y), grid_step);
                let delta_x = new_x - package.x;
                let delta_y = new_y - package.y;
                package.x = new_x;
                package.y = new_y;
                let moved_rect = package.rect();

                // Classes on or inside the body move with the package.
                for class in &mut state.diagram.classes {
                    if class_in_package_body(class.rect(), moved_rect, true) {
                        class.x += delta_x;
                        class.y += delta_y;
                    }
                }
                // Direct child packages move rigidly with their parent.
                for other in &mut state.diagram.packages {
                    if other.parent_id.as_deref() == Some(package_id.as_str()) {
                        other.x += delta_x;
                        other.y += delta_y;
                    }
                }
                self.reparent_package(state, &package_id, moved_rect.center());
                scheduler.request();
            }
            InteractionMode::ResizePackage {
                package_id,
                origin_world,
                origin,
                direction,
            } => {
                let world = state.view.screen_to_world(event.screen);
                let Some(package) = state.diagram.package_by_id_mut(&package_id) else {
                    return;
                };
                let delta_x = world.x - origin_world.x;
                let delta_y = world.y - origin_world.y;
                let mut x = origin.x;
                let mut y = origin.y;
                let mut w = origin.w;
                let mut h = origin.h;
                if direction.west {
                    x = snap(origin.x + delta_x, grid_step);
                    w = snap(origin.w - delta_x, grid_step);
                }
                if direction.east {
                    w = snap(origin.w + delta_x, grid_step);
                }
                if direction.north {
                    y = snap(origin.y + delta_y, grid_step);
                    h = snap(origin.h - delta_y, grid_step);
                }
                if direction.south {
                    h = snap(origin.h + delta_y, grid_step);
                }
                let (min_w, min_h) = MIN_PACKAGE_SIZE;
                w = w.max(min_w);
                h = h.max(min_h);
                // Keep the opposite edge fixed so the box cannot invert.
                if direction.west {
                    x = x.min(origin.x + origin.w - min_w);
                }
                if direction.north {
                    y = y.min(origin.y + origin.h - min_h);
                }
                package.x = x;
                package.y = y;
                package.w = w;
                package.h = h;
            }
        }
    }

    /// Finish the current interaction if the pointer identity matches;
    /// otherwise the event is ignored.
    pub fn pointer_up(
        &self,
        state: &mut EditorState,
        scheduler: &mut RenderScheduler,
        event: PointerEvent,
    ) {
        let matches = state
            .interaction
            .as_ref()
            .is_some_and(|i| i.pointer_id == event.pointer_id);
        if matches {
            state.interaction = None;
            scheduler.request();
        }
    }

    /// Wheel-driven zoom anchored at the cursor; renders only on an
    /// effective zoom change.
    pub fn wheel(
        &self,
        state: &mut EditorState,
        scheduler: &mut RenderScheduler,
        event: WheelEvent,
    ) {
        if state.view.zoom_at(event.screen, event.delta_y) {
            scheduler.request();
        }
    }

    /// Reclassify a dragged package's own parentage. Containment uses a
    /// plain box test on the center point (packages nest by body and header
    /// as one unit). Among containing candidates the most deeply nested one
    /// wins; candidates whose ancestor chain already includes the dragged
    /// package are rejected so reparenting never creates a cycle. When no
    /// package contains the center, the parent reference is cleared.
    fn reparent_package(&self, state: &mut EditorState, package_id: &str, center: Point) {
        let mut candidates: Vec<(String, usize)> = state
            .diagram
            .packages
            .iter()
            .filter(|p| p.id != package_id && p.rect().contains(center))
            .map(|p| (p.id.clone(), state.diagram.package_depth(&p.id)))
            .collect();
        if candidates.is_empty() {
            if let Some(package) = state.diagram.package_by_id_mut(package_id) {
                package.parent_id = None;
            }
            return;
        }
        candidates.retain(|(id, _)| !state.diagram.is_package_ancestor(package_id, id));
        let choice = candidates
            .into_iter()
            .max_by_key(|(_, depth)| *depth)
            .map(|(id, _)| id);
        // All containing candidates would form a cycle: reject the reparent
        // and keep the current parent.
        if let Some(parent_id) = choice {
            if let Some(package) = state.diagram.package_by_id_mut(package_id) {
                package.parent_id = Some(parent_id);
            }
        }
    }
}
