//! Persistence: attribute-tag text records and JSON snapshots.
pub mod arc_record;
pub mod map_file;
pub mod record;
pub mod snapshot;

pub use arc_record::{arc_element, read_arc, UNSET_QUALITY};
pub use map_file::{load_map, read_map, save_map, write_map, ReadStats};
