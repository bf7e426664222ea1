//! Defines the `Arc`, the measured link between two co-observed tags.
//!
//! An arc keeps only the best observation of its tag pair seen so far. Its
//! orientation is canonical: `low` always has the smaller tag id, so lookups
//! and comparisons never depend on the order in which the pair was discovered.

use crate::error::{MapError, MapResult};
use crate::graph::node::TagId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// One end of an arc: the tag and its twist in radians.
pub type ArcEnd = (TagId, f64);

/// Orders two arc ends so the smaller tag id comes first.
///
/// The twist travels with its tag.
pub fn canonical(a: ArcEnd, b: ArcEnd) -> (ArcEnd, ArcEnd) {
    if a.0 > b.0 { (b, a) } else { (a, b) }
}

/// The measured geometry between two tags.
///
/// Equality, hashing and `Ord` use the tag pair only (identity order). The
/// growth order used for spanning trees lives in `graph::order`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arc {
    low: TagId,
    high: TagId,
    low_twist: f64,
    high_twist: f64,
    distance: f64,
    /// Lower is better. `None` until the first observation is merged.
    quality: Option<f64>,
    /// Spanning-tree membership, written by the tree builder.
    pub in_tree: bool,
    /// Traversal bookkeeping owned by graph algorithms.
    #[serde(skip)]
    pub visit: u32,
}

impl Arc {
    /// Builds a measured arc. The ends may be given in either order.
    ///
    /// The measurement passes the same checks as `consider_observation`, and
    /// a NaN quality is rejected since nothing could ever supersede it.
    pub fn create(
        tag_a: TagId,
        twist_a: f64,
        distance: f64,
        tag_b: TagId,
        twist_b: f64,
        quality: f64,
    ) -> MapResult<Self> {
        let mut arc = Self::unmeasured(tag_a, tag_b)?;
        if quality.is_nan() {
            return Err(MapError::corrupt(arc.low, arc.high, "quality is NaN"));
        }
        let ((_, low_twist), (_, high_twist)) = canonical((tag_a, twist_a), (tag_b, twist_b));
        arc.consider_observation(low_twist, distance, high_twist, quality)?;
        Ok(arc)
    }

    /// Builds an arc that has not received an observation yet.
    pub fn unmeasured(tag_a: TagId, tag_b: TagId) -> MapResult<Self> {
        let ((low, _), (high, _)) = canonical((tag_a, 0.0), (tag_b, 0.0));
        if low == high {
            return Err(MapError::Orientation { low, high });
        }
        Ok(Self {
            low,
            high,
            low_twist: 0.0,
            high_twist: 0.0,
            distance: 0.0,
            quality: None,
            in_tree: false,
            visit: 0,
        })
    }

    pub fn low(&self) -> TagId { self.low }
    pub fn high(&self) -> TagId { self.high }
    pub fn ends(&self) -> (TagId, TagId) { (self.low, self.high) }
    pub fn low_twist(&self) -> f64 { self.low_twist }
    pub fn high_twist(&self) -> f64 { self.high_twist }
    pub fn distance(&self) -> f64 { self.distance }
    pub fn quality(&self) -> Option<f64> { self.quality }
    pub fn is_measured(&self) -> bool { self.quality.is_some() }

    /// Returns the tag at the opposite end from `tag`, if `tag` is an end at all.
    pub fn other_end(&self, tag: TagId) -> Option<TagId> {
        if tag == self.low {
            Some(self.high)
        } else if tag == self.high {
            Some(self.low)
        } else {
            None
        }
    }

    /// True when an observation of this `quality` would replace the stored one.
    pub fn is_superseded_by(&self, quality: f64) -> bool {
        match self.quality {
            None => !quality.is_nan(),
            Some(current) => quality < current,
        }
    }

    /// Merges one observation of this pair, given in canonical (low, high) order.
    ///
    /// Returns `Ok(true)` when the observation replaced the stored one and
    /// `Ok(false)` when it was not strictly better. Nothing is written unless
    /// every check passes.
    pub fn consider_observation(
        &mut self,
        low_twist: f64,
        distance: f64,
        high_twist: f64,
        quality: f64,
    ) -> MapResult<bool> {
        if !self.is_superseded_by(quality) {
            return Ok(false);
        }
        if self.low >= self.high {
            return Err(MapError::Orientation { low: self.low, high: self.high });
        }
        if !(distance > 0.0 && distance.is_finite()) {
            return Err(MapError::corrupt(self.low, self.high, format!("distance {} is not positive", distance)));
        }

        self.low_twist = low_twist;
        self.distance = distance;
        self.high_twist = high_twist;
        self.quality = Some(quality);
        Ok(true)
    }
}

impl PartialEq for Arc {
    fn eq(&self, other: &Self) -> bool {
        self.low == other.low && self.high == other.high
    }
}

impl Eq for Arc {}

impl Hash for Arc {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.low.hash(state);
        self.high.hash(state);
    }
}

impl PartialOrd for Arc {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Arc {
    fn cmp(&self, other: &Self) -> Ordering {
        crate::graph::order::identity_cmp(self, other)
    }
}
