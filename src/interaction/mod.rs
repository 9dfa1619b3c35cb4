//! Pointer interaction: hit-testing, the drag/pan/resize state machine and
//! two-click link creation.

pub mod engine;
pub mod hit;
pub mod link;

pub use engine::{Interaction, InteractionEngine, InteractionMode, PointerEvent, WheelEvent};
pub use hit::{hit_test, HitTarget, ResizeDirection};
pub use link::{LinkService, LinkState, PendingEdge};
