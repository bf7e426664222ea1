//! Defines the core data structures of the marker map.
pub mod batch;
pub mod edge;
pub mod node;
pub mod order;
pub mod storage;
pub mod tree;

// Re-export key types for convenient access
pub use batch::Observation;
pub use edge::{canonical, Arc};
pub use node::{Tag, TagId};
pub use order::{arcs_equal, growth_cmp, growth_less, identity_cmp, identity_less, GrowthKey, HopCounts};
pub use storage::{ArcId, TagMap};
pub use tree::{grow_spanning_tree, TreeSummary};
