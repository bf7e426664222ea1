//! Batch intake of observations.
//!
//! Observations are first reduced to the single best one per tag pair (in
//! parallel for large batches), then each winner goes through the ordinary
//! quality gate one at a time. Only one update per pair ever reaches an arc.

use crate::error::MapResult;
use crate::graph::edge::canonical;
use crate::graph::node::TagId;
use crate::graph::storage::TagMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// One co-observation of two tags in a camera frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub tag_a: TagId,
    pub twist_a: f64,
    pub distance: f64,
    pub tag_b: TagId,
    pub twist_b: f64,
    pub quality: f64,
}

impl Observation {
    /// The same observation with the smaller tag id first.
    pub fn canonical(self) -> Self {
        let ((tag_a, twist_a), (tag_b, twist_b)) = canonical((self.tag_a, self.twist_a), (self.tag_b, self.twist_b));
        Self { tag_a, twist_a, tag_b, twist_b, ..self }
    }

    fn pair(&self) -> (TagId, TagId) { (self.tag_a, self.tag_b) }
}

type Best = HashMap<(TagId, TagId), (usize, Observation)>;

fn keep_best(mut best: Best, (index, obs): (usize, Observation)) -> Best {
    let obs = obs.canonical();
    best.entry(obs.pair())
        .and_modify(|slot| {
            // The earliest of equally good observations wins, as it would sequentially.
            if obs.quality < slot.1.quality || (obs.quality == slot.1.quality && index < slot.0) {
                *slot = (index, obs);
            }
        })
        .or_insert((index, obs));
    best
}

fn merge_best(left: Best, right: Best) -> Best {
    right.into_values().fold(left, keep_best)
}

impl TagMap {
    /// Offers a batch of observations and returns how many arcs changed.
    ///
    /// Batches of at least `parallel_min` observations are reduced on the
    /// rayon pool. A corrupt observation is reported only if it is the best
    /// one for its pair.
    pub fn observe_batch(&mut self, observations: &[Observation], parallel_min: usize) -> MapResult<usize> {
        let parallel = observations.len() >= parallel_min;
        let best = if parallel {
            observations
                .par_iter()
                .copied()
                .enumerate()
                .filter(|(_, o)| !o.quality.is_nan())
                .fold(Best::new, keep_best)
                .reduce(Best::new, merge_best)
        } else {
            observations
                .iter()
                .copied()
                .enumerate()
                .filter(|(_, o)| !o.quality.is_nan())
                .fold(Best::new(), keep_best)
        };
        debug!(observations = observations.len(), pairs = best.len(), parallel, "observation batch reduced");

        let mut winners: Vec<Observation> = best.into_values().map(|(_, o)| o).collect();
        winners.sort_by_key(|o| o.pair());

        let mut changed = 0;
        for o in winners {
            let (_, updated) = self.observe(o.tag_a, o.twist_a, o.distance, o.tag_b, o.twist_b, o.quality)?;
            if updated {
                changed += 1;
            }
        }
        Ok(changed)
    }
}
