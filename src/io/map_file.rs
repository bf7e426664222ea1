//! Whole-map text documents.
//!
//! ```text
//! <Map Tags_Count="2" Arcs_Count="1">
//!  <Tag Id="1" X="0" Y="0"/>
//!  <Tag Id="2" X="1.5" Y="0"/>
//!  <Arc From_Tag_Id="1" From_Twist="0" Distance="1.5" To_Tag_Id="2" To_Twist="12" Goodness="3.25" In_Tree="1"/>
//! </Map>
//! ```
//!
//! Reading merges into an existing map, so several saved snapshots can be
//! appended into one map in any order.

use crate::error::{MapError, MapResult};
use crate::graph::{TagId, TagMap};
use crate::io::arc_record::{arc_element, read_arc, ARC_ELEMENT};
use crate::io::record::{Element, ElementKind, RecordReader, RecordWriter};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

const MAP_ELEMENT: &str = "Map";
const TAG_ELEMENT: &str = "Tag";

/// Counts from one `read_map` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadStats {
    pub tags_added: usize,
    pub arcs_read: usize,
    pub arcs_merged: usize,
}

pub fn write_map(map: &TagMap) -> String {
    let mut w = RecordWriter::new();
    w.write(
        &Element::new(MAP_ELEMENT, ElementKind::Open)
            .with("Tags_Count", map.tag_count())
            .with("Arcs_Count", map.arc_count()),
    );
    for tag in map.tags() {
        w.write(&Element::new(TAG_ELEMENT, ElementKind::Empty).with("Id", tag.id).with("X", tag.x).with("Y", tag.y));
    }
    for id in map.arc_ids_by_identity() {
        w.write(&arc_element(map.arc(id)));
    }
    w.write(&Element::new(MAP_ELEMENT, ElementKind::Close));
    w.finish()
}

/// Merges a map document into `map`.
///
/// Tags already in the map keep their position. The first bad record aborts
/// the read with an error naming it; records before it stay merged.
pub fn read_map(text: &str, map: &mut TagMap) -> MapResult<ReadStats> {
    let mut reader = RecordReader::new(text);
    let mut stats = ReadStats::default();

    let header = reader.next().ok_or_else(|| MapError::parse(1, "empty map document"))??;
    header.expect(MAP_ELEMENT, ElementKind::Open)?;

    let mut closed = false;
    for element in reader.by_ref() {
        let element = element?;
        match (element.kind, element.name.as_str()) {
            (ElementKind::Empty, TAG_ELEMENT) => {
                let id = TagId(element.integer("Id")?);
                if map.tag(id).is_none() {
                    map.add_tag(id, element.double("X")?, element.double("Y")?)?;
                    stats.tags_added += 1;
                }
            }
            (ElementKind::Empty, ARC_ELEMENT) => {
                let (_, merged) = read_arc(&element, map)?;
                stats.arcs_read += 1;
                if merged {
                    stats.arcs_merged += 1;
                }
            }
            (ElementKind::Close, MAP_ELEMENT) => {
                closed = true;
                break;
            }
            _ => return Err(MapError::parse(element.line, format!("unexpected <{}>", element.name))),
        }
    }
    if !closed {
        return Err(MapError::parse(reader.line(), "missing </Map>"));
    }
    if let Some(trailing) = reader.next() {
        let line = trailing.map_or_else(|e| match e { MapError::Parse { line, .. } => line, _ => 0 }, |el| el.line);
        return Err(MapError::parse(line, "content after </Map>"));
    }

    debug!(?stats, "map document read");
    Ok(stats)
}

pub fn save_map(map: &TagMap, path: &Path) -> MapResult<()> {
    fs::write(path, write_map(map))?;
    info!(path = %path.display(), tags = map.tag_count(), arcs = map.arc_count(), "map saved");
    Ok(())
}

pub fn load_map(path: &Path, map: &mut TagMap) -> MapResult<ReadStats> {
    let text = fs::read_to_string(path)?;
    let stats = read_map(&text, map)?;
    info!(path = %path.display(), arcs_merged = stats.arcs_merged, "map loaded");
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TagMap {
        let mut map = TagMap::new();
        map.add_tag(TagId(1), 0.0, 0.0).unwrap();
        map.add_tag(TagId(2), 1.5, 0.0).unwrap();
        map.add_tag(TagId(3), 1.5, 2.0).unwrap();
        map.observe(TagId(2), 0.2, 1.5, TagId(1), 0.1, 3.25).unwrap();
        map.observe(TagId(3), -0.7, 2.0, TagId(2), 0.4, 9.5).unwrap();
        map
    }

    #[test]
    fn test_document_round_trip() {
        let map = sample();
        let text = write_map(&map);
        assert!(text.starts_with("<Map Tags_Count=\"3\" Arcs_Count=\"2\">\n <Tag Id=\"1\""));

        let mut back = TagMap::new();
        let stats = read_map(&text, &mut back).unwrap();
        assert_eq!(stats, ReadStats { tags_added: 3, arcs_read: 2, arcs_merged: 2 });
        assert_eq!(back.tag(TagId(3)).unwrap().position(), (1.5, 2.0));
        for arc in map.arcs() {
            let other = back.arc(back.arc_lookup(arc.low(), arc.high()).unwrap());
            assert_eq!(other.distance(), arc.distance());
            assert_eq!(other.quality(), arc.quality());
            assert!((other.low_twist() - arc.low_twist()).abs() < 1e-9);
            assert!((other.high_twist() - arc.high_twist()).abs() < 1e-9);
        }
    }

    #[test]
    fn test_merging_snapshots_keeps_best() {
        let mut better = TagMap::new();
        better.add_tag(TagId(1), 0.0, 0.0).unwrap();
        better.add_tag(TagId(2), 1.5, 0.0).unwrap();
        better.observe(TagId(1), 0.0, 1.4, TagId(2), 0.0, 1.0).unwrap();

        let mut merged = TagMap::new();
        read_map(&write_map(&sample()), &mut merged).unwrap();
        let stats = read_map(&write_map(&better), &mut merged).unwrap();
        assert_eq!(stats, ReadStats { tags_added: 0, arcs_read: 1, arcs_merged: 1 });
        let again = read_map(&write_map(&sample()), &mut merged).unwrap();
        assert_eq!(again.arcs_merged, 0);

        let arc = merged.arc(merged.arc_lookup(TagId(1), TagId(2)).unwrap());
        assert_eq!(arc.distance(), 1.4);
    }

    #[test]
    fn test_structural_errors() {
        let mut map = TagMap::new();
        assert!(matches!(read_map("", &mut map), Err(MapError::Parse { .. })));
        assert!(matches!(read_map("<Tag Id=\"1\" X=\"0\" Y=\"0\"/>", &mut map), Err(MapError::Parse { .. })));
        assert!(matches!(read_map("<Map>\n<Tag Id=\"1\" X=\"0\" Y=\"0\"/>\n", &mut map), Err(MapError::Parse { line: 3, .. })));
        assert!(matches!(read_map("<Map>\n<Frame/>\n</Map>\n", &mut map), Err(MapError::Parse { line: 2, .. })));
        assert!(matches!(read_map("<Map>\n</Map>\n<Map>\n", &mut map), Err(MapError::Parse { line: 3, .. })));
    }

    #[test]
    fn test_arc_before_its_tags_is_corrupt() {
        let text = "<Map>\n <Arc From_Tag_Id=\"1\" From_Twist=\"0\" Distance=\"1\" To_Tag_Id=\"2\" To_Twist=\"0\" Goodness=\"1\" In_Tree=\"0\"/>\n</Map>\n";
        let err = read_map(text, &mut TagMap::new()).unwrap_err();
        assert!(matches!(err, MapError::CorruptRecord { low: TagId(1), high: TagId(2), .. }));
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.xml");
        save_map(&sample(), &path).unwrap();

        let mut back = TagMap::new();
        let stats = load_map(&path, &mut back).unwrap();
        assert_eq!(stats.arcs_merged, 2);
        assert!(matches!(load_map(&dir.path().join("missing.xml"), &mut back), Err(MapError::Io(_))));
    }
}
