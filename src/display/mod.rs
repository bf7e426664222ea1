//! Human-readable dumps of map state.
pub mod trace;

pub use trace::format_tree;
