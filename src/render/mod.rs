//! Vector rendering of the map.
pub mod svg;

pub use svg::{render_arc, render_map, ArcColor, Svg};
