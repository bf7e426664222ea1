//! Runtime configuration for map building and rendering.

use crate::error::MapResult;
use crate::graph::tree::default_root;
use crate::graph::{TagId, TagMap};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapConfig {
    /// Root tag for spanning-tree growth. Defaults to the smallest tag id.
    pub origin: Option<TagId>,
    /// Observation batches at least this large are reduced in parallel.
    pub parallel_batch_min: usize,
    pub svg: SvgConfig,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self { origin: None, parallel_batch_min: 4096, svg: SvgConfig::default() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SvgConfig {
    /// SVG user units per map unit.
    pub scale: f64,
    pub margin: f64,
    pub stroke_width: f64,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self { scale: 100.0, margin: 20.0, stroke_width: 2.0 }
    }
}

impl MapConfig {
    pub fn from_json(json: &str) -> MapResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> MapResult<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    pub fn root_for(&self, map: &TagMap) -> Option<TagId> {
        self.origin.or_else(|| default_root(map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MapError;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = MapConfig::from_json(r#"{ "origin": 4, "svg": { "scale": 50.0 } }"#).unwrap();
        assert_eq!(config.origin, Some(TagId(4)));
        assert_eq!(config.parallel_batch_min, 4096);
        assert_eq!(config.svg.scale, 50.0);
        assert_eq!(config.svg.margin, 20.0);
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        assert!(matches!(MapConfig::from_json(r#"{ "orign": 4 }"#), Err(MapError::Json(_))));
    }

    #[test]
    fn test_root_falls_back_to_smallest_tag() {
        let mut map = TagMap::new();
        map.add_tag(TagId(9), 0.0, 0.0).unwrap();
        map.add_tag(TagId(3), 0.0, 0.0).unwrap();
        assert_eq!(MapConfig::default().root_for(&map), Some(TagId(3)));
        let pinned = MapConfig { origin: Some(TagId(9)), ..MapConfig::default() };
        assert_eq!(pinned.root_for(&map), Some(TagId(9)));
    }
}
