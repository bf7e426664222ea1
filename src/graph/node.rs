//! Defines the `Tag`, the node of the map: one fiducial marker's identity,
//! its position on the floor plan, and its place in the spanning tree.

use crate::graph::storage::ArcId;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// The identity a marker encodes. Tags compare by this value alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct TagId(pub u32);

impl TagId {
    pub fn value(&self) -> u32 { self.0 }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for TagId {
    fn from(id: u32) -> Self { Self(id) }
}

/// A marker node.
///
/// The incident arc list holds handles into the owning `TagMap`; a tag never
/// owns its arcs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub x: f64,
    pub y: f64,
    /// Edge distance from the spanning-tree root; `Tag::UNREACHED` until a tree is grown.
    pub hop_count: u32,
    #[serde(skip)]
    pub arcs: SmallVec<[ArcId; 8]>,
    /// Traversal bookkeeping owned by graph algorithms.
    #[serde(skip)]
    pub visit: u32,
}

impl Tag {
    pub const UNREACHED: u32 = u32::MAX;

    pub fn new(id: TagId, x: f64, y: f64) -> Self {
        Self { id, x, y, hop_count: Self::UNREACHED, arcs: SmallVec::new(), visit: 0 }
    }

    pub fn position(&self) -> (f64, f64) { (self.x, self.y) }

    pub fn is_reached(&self) -> bool { self.hop_count != Self::UNREACHED }

    pub(crate) fn arc_append(&mut self, arc: ArcId) {
        self.arcs.push(arc);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tag_is_unreached_and_isolated() {
        let tag = Tag::new(TagId(7), 1.5, -2.0);
        assert!(!tag.is_reached());
        assert!(tag.arcs.is_empty());
        assert_eq!(tag.position(), (1.5, -2.0));
    }

    #[test]
    fn test_tag_ids_order_by_value() {
        assert!(TagId(2) < TagId(10));
        assert_eq!(TagId(3).to_string(), "3");
    }
}
