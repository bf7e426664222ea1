//! Marker map core: tags, the measured arcs between them, spanning-tree
//! growth, text/JSON persistence and SVG rendering.
//!
//! With the `python` feature this crate also builds the `_core` Python module.

pub mod config;
pub mod display;
pub mod error;
pub mod graph;
pub mod io;
pub mod render;

#[cfg(feature = "python")]
pub mod bindings;

pub use config::{MapConfig, SvgConfig};
pub use error::{MapError, MapResult};
pub use graph::{Arc, ArcId, Observation, Tag, TagId, TagMap};

#[cfg(feature = "python")]
use pyo3::prelude::*;

// --- Module Definition ---
/// This function defines the `_core` Python module.
/// The name `_core` is chosen to indicate it's an internal, compiled component.
#[cfg(feature = "python")]
#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<bindings::python::PyTagMap>()?;
    Ok(())
}
