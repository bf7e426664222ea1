//! storage.rs
//! Flat tag and arc tables with id and pair indexes.

use crate::error::{MapError, MapResult};
use crate::graph::edge::{canonical, Arc};
use crate::graph::node::{Tag, TagId};
use crate::graph::order::{identity_cmp, HopCounts};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, trace};

/// Handle to an arc inside a `TagMap`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct ArcId(pub u32);

impl ArcId {
    #[inline(always)]
    pub fn index(&self) -> usize { self.0 as usize }
    /// `idx` must be the position of an arc already in a `TagMap`, which
    /// never holds more arcs than `ArcId` can address.
    pub fn new(idx: usize) -> Self { Self(idx as u32) }

    /// The handle for the next arc appended to a table of length `len`.
    fn next(len: usize) -> MapResult<Self> {
        u32::try_from(len).map(Self).map_err(|_| MapError::Capacity(len))
    }
}

/// The owning graph: every tag, every arc, and the lookups between them.
///
/// Arcs and tags reference each other only through `TagId` and `ArcId`
/// handles, so the map alone controls their lifetime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagMap {
    tags: Vec<Tag>,
    arcs: Vec<Arc>,

    // Lookup indexes (Not serialized, rebuilt on load)
    #[serde(skip)]
    tag_index: HashMap<TagId, usize>,
    #[serde(skip)]
    pair_index: HashMap<(TagId, TagId), ArcId>,

    // Arcs whose measurement changed since the last `take_announced`.
    #[serde(skip)]
    announced: Vec<ArcId>,
}

impl TagMap {
    pub fn new() -> Self { Self::default() }
    pub fn tag_count(&self) -> usize { self.tags.len() }
    pub fn arc_count(&self) -> usize { self.arcs.len() }

    /// Rebuilds the lookup indexes and incident lists after deserialization.
    ///
    /// The tables are checked first: duplicate tags or pairs, arcs that are
    /// not canonical, arcs naming a missing tag, and measured arcs without a
    /// positive distance are rejected, leaving the map untouched.
    pub fn rebuild_index(&mut self) -> MapResult<()> {
        let mut tag_index = HashMap::with_capacity(self.tags.len());
        for (i, tag) in self.tags.iter().enumerate() {
            if tag_index.insert(tag.id, i).is_some() {
                return Err(MapError::DuplicateTag(tag.id));
            }
        }

        ArcId::next(self.arcs.len())?;
        let mut pair_index = HashMap::with_capacity(self.arcs.len());
        for (i, arc) in self.arcs.iter().enumerate() {
            let (low, high) = arc.ends();
            if low >= high {
                return Err(MapError::Orientation { low, high });
            }
            if let Some(missing) = [low, high].into_iter().find(|end| !tag_index.contains_key(end)) {
                return Err(MapError::corrupt(low, high, format!("tag {} is not in the map", missing)));
            }
            let distance = arc.distance();
            if arc.is_measured() && !(distance > 0.0 && distance.is_finite()) {
                return Err(MapError::corrupt(low, high, format!("distance {} is not positive", distance)));
            }
            if pair_index.insert((low, high), ArcId::new(i)).is_some() {
                return Err(MapError::DuplicateArc { low, high });
            }
        }

        for tag in &mut self.tags {
            tag.arcs.clear();
        }
        for (i, arc) in self.arcs.iter().enumerate() {
            let (low, high) = arc.ends();
            self.tags[tag_index[&low]].arc_append(ArcId::new(i));
            self.tags[tag_index[&high]].arc_append(ArcId::new(i));
        }
        self.tag_index = tag_index;
        self.pair_index = pair_index;
        Ok(())
    }

    // --- Tags ---

    pub fn add_tag(&mut self, id: TagId, x: f64, y: f64) -> MapResult<TagId> {
        if self.tag_index.contains_key(&id) {
            return Err(MapError::DuplicateTag(id));
        }
        self.tag_index.insert(id, self.tags.len());
        self.tags.push(Tag::new(id, x, y));
        Ok(id)
    }

    pub fn tag(&self, id: TagId) -> Option<&Tag> {
        self.tag_index.get(&id).map(|&i| &self.tags[i])
    }

    pub fn tag_mut(&mut self, id: TagId) -> Option<&mut Tag> {
        self.tag_index.get(&id).map(|&i| &mut self.tags[i])
    }

    /// Like `tag`, but a missing tag is an error.
    pub fn tag_lookup(&self, id: TagId) -> MapResult<&Tag> {
        self.tag(id).ok_or(MapError::UnknownTag(id))
    }

    pub fn tags(&self) -> impl Iterator<Item = &Tag> { self.tags.iter() }

    pub(crate) fn tags_mut(&mut self) -> impl Iterator<Item = &mut Tag> { self.tags.iter_mut() }

    // --- Arcs ---

    /// Creates and registers a measured arc. The pair must not have one yet.
    pub fn create_arc(
        &mut self,
        tag_a: TagId,
        twist_a: f64,
        distance: f64,
        tag_b: TagId,
        twist_b: f64,
        quality: f64,
    ) -> MapResult<ArcId> {
        let arc = Arc::create(tag_a, twist_a, distance, tag_b, twist_b, quality)?;
        self.register(arc)
    }

    fn register(&mut self, arc: Arc) -> MapResult<ArcId> {
        let (low, high) = arc.ends();
        let low_idx = *self.tag_index.get(&low).ok_or(MapError::UnknownTag(low))?;
        let high_idx = *self.tag_index.get(&high).ok_or(MapError::UnknownTag(high))?;
        if self.pair_index.contains_key(&(low, high)) {
            return Err(MapError::DuplicateArc { low, high });
        }

        let id = ArcId::next(self.arcs.len())?;
        self.arcs.push(arc);
        self.pair_index.insert((low, high), id);
        self.tags[low_idx].arc_append(id);
        self.tags[high_idx].arc_append(id);
        trace!(arc = id.0, %low, %high, "arc registered");
        Ok(id)
    }

    /// Finds the arc joining two tags, in either order.
    pub fn arc_lookup(&self, tag_a: TagId, tag_b: TagId) -> Option<ArcId> {
        let ((low, _), (high, _)) = canonical((tag_a, 0.0), (tag_b, 0.0));
        self.pair_index.get(&(low, high)).copied()
    }

    /// Finds the arc joining two tags, creating an unmeasured one if needed.
    pub fn arc_lookup_or_create(&mut self, tag_a: TagId, tag_b: TagId) -> MapResult<ArcId> {
        match self.arc_lookup(tag_a, tag_b) {
            Some(id) => Ok(id),
            None => self.register(Arc::unmeasured(tag_a, tag_b)?),
        }
    }

    pub fn arc(&self, id: ArcId) -> &Arc { &self.arcs[id.index()] }
    pub fn arc_mut(&mut self, id: ArcId) -> &mut Arc { &mut self.arcs[id.index()] }
    pub fn arcs(&self) -> impl Iterator<Item = &Arc> { self.arcs.iter() }

    pub fn arc_ids(&self) -> impl Iterator<Item = ArcId> { (0..self.arcs.len()).map(ArcId::new) }

    /// Arc handles sorted by identity order.
    pub fn arc_ids_by_identity(&self) -> Vec<ArcId> {
        let mut ids: Vec<ArcId> = self.arc_ids().collect();
        ids.sort_by(|a, b| identity_cmp(self.arc(*a), self.arc(*b)));
        ids
    }

    /// Offers one observation of a tag pair, given in discovery order.
    ///
    /// The arc is created on first sight. Returns the arc and whether the
    /// observation replaced its stored measurement.
    pub fn observe(
        &mut self,
        tag_a: TagId,
        twist_a: f64,
        distance: f64,
        tag_b: TagId,
        twist_b: f64,
        quality: f64,
    ) -> MapResult<(ArcId, bool)> {
        let ((low, low_twist), (high, high_twist)) = canonical((tag_a, twist_a), (tag_b, twist_b));
        let (id, changed) = match self.arc_lookup(low, high) {
            Some(id) => {
                let changed = self.arcs[id.index()].consider_observation(low_twist, distance, high_twist, quality)?;
                (id, changed)
            }
            None => {
                // Validate before the pair becomes visible.
                let mut arc = Arc::unmeasured(low, high)?;
                let changed = arc.consider_observation(low_twist, distance, high_twist, quality)?;
                (self.register(arc)?, changed)
            }
        };
        if changed {
            self.announce_arc(id);
        } else {
            trace!(%low, %high, quality, "observation superseded");
        }
        Ok((id, changed))
    }

    /// Notes that an arc's measurement changed.
    pub fn announce_arc(&mut self, id: ArcId) {
        let arc = &self.arcs[id.index()];
        debug!(
            arc = id.0,
            low = %arc.low(),
            high = %arc.high(),
            distance = arc.distance(),
            quality = ?arc.quality(),
            "arc announced"
        );
        self.announced.push(id);
    }

    /// Drains the arcs announced since the last call.
    pub fn take_announced(&mut self) -> Vec<ArcId> {
        std::mem::take(&mut self.announced)
    }
}

impl HopCounts for TagMap {
    fn hop_count(&self, tag: TagId) -> u32 {
        self.tag(tag).map_or(Tag::UNREACHED, |t| t.hop_count)
    }
}
