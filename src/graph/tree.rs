//! Spanning-tree growth over measured arcs.
//!
//! Growth starts at a root tag and repeatedly takes the frontier arc that
//! sorts *last* in growth order, i.e. the shortest one, preferring the arc
//! nearer the root when lengths tie. Each taken arc is flagged `in_tree` and
//! gives its new tag a hop count one more than its parent's.

use crate::error::MapResult;
use crate::graph::node::{Tag, TagId};
use crate::graph::order::{growth_cmp, GrowthKey};
use crate::graph::storage::{ArcId, TagMap};
use petgraph::unionfind::UnionFind;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use tracing::{info, warn};

/// What one growth pass produced.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeSummary {
    pub root: TagId,
    /// Tree arcs in the order they were taken.
    pub tree_arcs: Vec<ArcId>,
    pub reached: usize,
    pub unreached: Vec<TagId>,
    /// Connected components over measured arcs, isolated tags included.
    pub components: usize,
}

struct Candidate {
    key: GrowthKey,
    arc: ArcId,
    pair: (TagId, TagId),
}

// Max-heap order: the greatest candidate sorts last in growth order. Among
// equivalent keys the smaller tag pair is taken first.
impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        growth_cmp(&self.key, &other.key).then_with(|| other.pair.cmp(&self.pair))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

/// The smallest tag id in the map, used when no origin is configured.
pub fn default_root(map: &TagMap) -> Option<TagId> {
    map.tags().map(|t| t.id).min()
}

/// Grows a spanning tree from `root`, replacing any previous one.
pub fn grow_spanning_tree(map: &mut TagMap, root: TagId) -> MapResult<TreeSummary> {
    map.tag_lookup(root)?;
    let components = count_components(map);

    // 1. Reset previous tree state
    for tag in map.tags_mut() {
        tag.hop_count = Tag::UNREACHED;
    }
    let arc_ids: Vec<ArcId> = map.arc_ids().collect();
    let mark = next_visit_mark(map, &arc_ids);
    for &id in &arc_ids {
        map.arc_mut(id).in_tree = false;
    }
    if let Some(tag) = map.tag_mut(root) {
        tag.hop_count = 0;
    }

    // 2. Grow
    let mut heap = BinaryHeap::new();
    let mut tree_arcs = Vec::new();
    push_frontier(map, root, mark, &mut heap);

    while let Some(candidate) = heap.pop() {
        let (low, high) = candidate.pair;
        let low_reached = map.tag(low).is_some_and(|t| t.is_reached());
        let high_reached = map.tag(high).is_some_and(|t| t.is_reached());
        let (parent, child) = match (low_reached, high_reached) {
            (true, false) => (low, high),
            (false, true) => (high, low),
            _ => continue,
        };

        let hops = map.tag(parent).map_or(0, |t| t.hop_count) + 1;
        if let Some(tag) = map.tag_mut(child) {
            tag.hop_count = hops;
        }
        map.arc_mut(candidate.arc).in_tree = true;
        tree_arcs.push(candidate.arc);
        push_frontier(map, child, mark, &mut heap);
    }

    // 3. Report
    let unreached: Vec<TagId> = map.tags().filter(|t| !t.is_reached()).map(|t| t.id).collect();
    let reached = map.tag_count() - unreached.len();
    info!(%root, tree_arcs = tree_arcs.len(), reached, components, "spanning tree grown");
    if !unreached.is_empty() {
        warn!(%root, unreached = ?unreached, "tags not connected to the root");
    }

    Ok(TreeSummary { root, tree_arcs, reached, unreached, components })
}

/// A visit mark no arc carries yet. Counters restart when they run out.
fn next_visit_mark(map: &mut TagMap, arc_ids: &[ArcId]) -> u32 {
    match map.arcs().map(|a| a.visit).max().unwrap_or(0).checked_add(1) {
        Some(mark) => mark,
        None => {
            for &id in arc_ids {
                map.arc_mut(id).visit = 0;
            }
            1
        }
    }
}

fn push_frontier(map: &mut TagMap, tag: TagId, mark: u32, heap: &mut BinaryHeap<Candidate>) {
    let incident = match map.tag(tag) {
        Some(t) => t.arcs.clone(),
        None => return,
    };
    for id in incident {
        let arc = map.arc(id);
        if !arc.is_measured() || arc.visit == mark {
            continue;
        }
        let candidate = Candidate { key: GrowthKey::of(arc, &*map), arc: id, pair: arc.ends() };
        map.arc_mut(id).visit = mark;
        heap.push(candidate);
    }
}

fn count_components(map: &TagMap) -> usize {
    let index: HashMap<TagId, usize> = map.tags().enumerate().map(|(i, t)| (t.id, i)).collect();
    let mut sets = UnionFind::<usize>::new(index.len());
    for arc in map.arcs().filter(|a| a.is_measured()) {
        if let (Some(&a), Some(&b)) = (index.get(&arc.low()), index.get(&arc.high())) {
            sets.union(a, b);
        }
    }
    (0..index.len()).filter(|&i| sets.find(i) == i).count()
}
