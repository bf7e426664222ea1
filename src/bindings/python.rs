use crate::config::MapConfig;
use crate::display::trace;
use crate::error::MapError;
use crate::graph::{grow_spanning_tree, Observation, TagId, TagMap};
use crate::io::{map_file, snapshot};
use crate::render::svg;
use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;

fn to_py_err(e: MapError) -> PyErr {
    match e {
        MapError::Io(msg) => PyIOError::new_err(msg),
        other => PyValueError::new_err(other.to_string()),
    }
}

/// (low, low_twist, distance, high, high_twist, quality, in_tree)
type ArcTuple = (u32, f64, f64, u32, f64, Option<f64>, bool);

#[pyclass(name = "_TagMap")]
#[derive(Debug, Clone, Default)]
pub struct PyTagMap {
    map: TagMap,
    config: MapConfig,
}

#[pymethods]
impl PyTagMap {
    #[new]
    #[pyo3(signature = (config_json=None))]
    pub fn new(config_json: Option<String>) -> PyResult<Self> {
        let config = match config_json {
            Some(json) => MapConfig::from_json(&json).map_err(to_py_err)?,
            None => MapConfig::default(),
        };
        Ok(Self { map: TagMap::new(), config })
    }

    pub fn add_tag(&mut self, id: u32, x: f64, y: f64) -> PyResult<()> {
        self.map.add_tag(TagId(id), x, y).map(|_| ()).map_err(to_py_err)
    }

    pub fn tag_count(&self) -> usize { self.map.tag_count() }
    pub fn arc_count(&self) -> usize { self.map.arc_count() }

    /// Returns True when the observation replaced the stored one.
    pub fn observe(&mut self, tag_a: u32, twist_a: f64, distance: f64, tag_b: u32, twist_b: f64, quality: f64) -> PyResult<bool> {
        self.map
            .observe(TagId(tag_a), twist_a, distance, TagId(tag_b), twist_b, quality)
            .map(|(_, changed)| changed)
            .map_err(to_py_err)
    }

    pub fn observe_batch(&mut self, observations: Vec<(u32, f64, f64, u32, f64, f64)>) -> PyResult<usize> {
        let batch: Vec<Observation> = observations
            .into_iter()
            .map(|(a, twist_a, distance, b, twist_b, quality)| Observation {
                tag_a: TagId(a),
                twist_a,
                distance,
                tag_b: TagId(b),
                twist_b,
                quality,
            })
            .collect();
        self.map.observe_batch(&batch, self.config.parallel_batch_min).map_err(to_py_err)
    }

    pub fn arc(&self, tag_a: u32, tag_b: u32) -> Option<ArcTuple> {
        self.map.arc_lookup(TagId(tag_a), TagId(tag_b)).map(|id| {
            let arc = self.map.arc(id);
            (arc.low().0, arc.low_twist(), arc.distance(), arc.high().0, arc.high_twist(), arc.quality(), arc.in_tree)
        })
    }

    /// Grows the spanning tree and returns its arcs as (low, high) pairs.
    #[pyo3(signature = (root=None))]
    pub fn grow_tree(&mut self, root: Option<u32>) -> PyResult<Vec<(u32, u32)>> {
        let root = root
            .map(TagId)
            .or_else(|| self.config.root_for(&self.map))
            .ok_or_else(|| PyValueError::new_err("Map has no tags"))?;
        let summary = grow_spanning_tree(&mut self.map, root).map_err(to_py_err)?;
        Ok(summary
            .tree_arcs
            .iter()
            .map(|&id| {
                let (low, high) = self.map.arc(id).ends();
                (low.0, high.0)
            })
            .collect())
    }

    pub fn format_tree(&self, root: u32) -> String {
        trace::format_tree(&self.map, TagId(root))
    }

    pub fn to_svg(&self) -> PyResult<String> {
        svg::render_map(&self.map, &self.config.svg).map_err(to_py_err)
    }

    pub fn to_text(&self) -> String {
        map_file::write_map(&self.map)
    }

    /// Merges a map document; returns (tags_added, arcs_read, arcs_merged).
    pub fn merge_text(&mut self, text: String) -> PyResult<(usize, usize, usize)> {
        let stats = map_file::read_map(&text, &mut self.map).map_err(to_py_err)?;
        Ok((stats.tags_added, stats.arcs_read, stats.arcs_merged))
    }

    pub fn to_json(&self) -> PyResult<String> {
        snapshot::to_json(&self.map).map_err(to_py_err)
    }

    #[staticmethod]
    pub fn from_json(json: String) -> PyResult<Self> {
        let map = snapshot::from_json(&json).map_err(to_py_err)?;
        Ok(Self { map, config: MapConfig::default() })
    }
}
