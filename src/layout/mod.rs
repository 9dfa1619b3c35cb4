//! Batch layout for imported diagrams: recursive measure/place over the
//! package tree plus a bounding-box repair pass.

pub mod config;
pub mod engine;
pub mod repair;

pub use config::LayoutConfig;
pub use engine::arrange;
pub use repair::repair_bounds;
