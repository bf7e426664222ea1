//! JSON snapshots of a whole map.
//!
//! Lookup indexes and incident lists are not stored; they are rebuilt on load.

use crate::error::MapResult;
use crate::graph::TagMap;
use std::fs;
use std::path::Path;

pub fn to_json(map: &TagMap) -> MapResult<String> {
    Ok(serde_json::to_string_pretty(map)?)
}

pub fn from_json(json: &str) -> MapResult<TagMap> {
    let mut map: TagMap = serde_json::from_str(json)?;
    map.rebuild_index()?;
    Ok(map)
}

pub fn save_json(map: &TagMap, path: &Path) -> MapResult<()> {
    fs::write(path, to_json(map)?)?;
    Ok(())
}

pub fn load_json(path: &Path) -> MapResult<TagMap> {
    from_json(&fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MapError;
    use crate::graph::{grow_spanning_tree, TagId};
    use rstest::rstest;
    use serde_json::{json, Value};

    fn tag(id: u32) -> Value {
        json!({ "id": id, "x": id as f64, "y": 0.0, "hop_count": 0 })
    }

    fn arc(low: u32, high: u32, distance: f64, quality: Option<f64>) -> Value {
        json!({
            "low": low,
            "high": high,
            "low_twist": 0.0,
            "high_twist": 0.0,
            "distance": distance,
            "quality": quality,
            "in_tree": false
        })
    }

    fn snapshot(tags: &[u32], arcs: Vec<Value>) -> String {
        let tags: Vec<Value> = tags.iter().map(|&id| tag(id)).collect();
        json!({ "tags": tags, "arcs": arcs }).to_string()
    }

    #[test]
    fn test_snapshot_keeps_measurements_and_tree_state() {
        let mut map = TagMap::new();
        for id in 1..=3 {
            map.add_tag(TagId(id), id as f64, 0.0).unwrap();
        }
        map.observe(TagId(1), 0.25, 1.0, TagId(2), -0.5, 4.0).unwrap();
        map.arc_lookup_or_create(TagId(2), TagId(3)).unwrap();
        grow_spanning_tree(&mut map, TagId(1)).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.json");
        save_json(&map, &path).unwrap();
        let back = load_json(&path).unwrap();

        let arc = back.arc(back.arc_lookup(TagId(2), TagId(1)).unwrap());
        assert_eq!(arc.low_twist(), 0.25);
        assert_eq!(arc.quality(), Some(4.0));
        assert!(arc.in_tree);
        assert_eq!(back.tag(TagId(2)).unwrap().hop_count, 1);
        let unmeasured = back.arc(back.arc_lookup(TagId(2), TagId(3)).unwrap());
        assert_eq!(unmeasured.quality(), None);
        assert_eq!(back.tag(TagId(2)).unwrap().arcs.len(), 2);
    }

    #[test]
    fn test_hand_written_snapshot_loads() {
        let json = snapshot(&[1, 2, 3], vec![arc(1, 2, 1.5, Some(2.0)), arc(2, 3, 0.0, None)]);
        let map = from_json(&json).unwrap();
        assert_eq!(map.arc_lookup(TagId(2), TagId(1)).map(|id| map.arc(id).distance()), Some(1.5));
        assert_eq!(map.tag(TagId(2)).unwrap().arcs.len(), 2);
    }

    #[rstest]
    #[case::reversed(vec![arc(2, 1, 1.0, Some(1.0))], MapError::Orientation { low: TagId(2), high: TagId(1) })]
    #[case::self_loop(vec![arc(2, 2, 1.0, Some(1.0))], MapError::Orientation { low: TagId(2), high: TagId(2) })]
    #[case::duplicate_pair(
        vec![arc(1, 2, 1.0, Some(1.0)), arc(1, 2, 2.0, Some(3.0))],
        MapError::DuplicateArc { low: TagId(1), high: TagId(2) }
    )]
    fn test_inconsistent_arcs_are_rejected(#[case] arcs: Vec<Value>, #[case] expected: MapError) {
        assert_eq!(from_json(&snapshot(&[1, 2], arcs)).unwrap_err(), expected);
    }

    #[rstest]
    #[case::missing_tag(arc(1, 5, 1.0, Some(1.0)), 1, 5)]
    #[case::negative_distance(arc(1, 2, -1.0, Some(1.0)), 1, 2)]
    #[case::zero_distance(arc(1, 2, 0.0, Some(1.0)), 1, 2)]
    fn test_corrupt_arcs_are_rejected(#[case] bad: Value, #[case] low: u32, #[case] high: u32) {
        let err = from_json(&snapshot(&[1, 2], vec![bad])).unwrap_err();
        assert!(matches!(err, MapError::CorruptRecord { low: l, high: h, .. } if l == TagId(low) && h == TagId(high)));
    }

    #[test]
    fn test_duplicate_tag_is_rejected() {
        let json = snapshot(&[2, 2, 5], vec![arc(2, 5, 1.0, Some(1.0))]);
        assert_eq!(from_json(&json).unwrap_err(), MapError::DuplicateTag(TagId(2)));
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(from_json("{"), Err(MapError::Json(_))));
    }
}
