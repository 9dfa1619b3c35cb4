//! SVG rendering of diagram state.

pub mod svg;

pub use svg::{package_fragment, render_svg};
