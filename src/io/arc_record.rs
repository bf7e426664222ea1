//! Reads and writes one `<Arc .../>` record.
//!
//! Twists are stored in degrees on disk and radians in memory. An unset
//! quality is written as `UNSET_QUALITY`.

use crate::error::{MapError, MapResult};
use crate::graph::{canonical, Arc, ArcId, TagId, TagMap};
use crate::io::record::{Element, ElementKind};
use tracing::trace;

pub const ARC_ELEMENT: &str = "Arc";

/// On-disk stand-in for "no observation yet". Any value at or above it reads back as unset.
pub const UNSET_QUALITY: f64 = 123_456_789.0;

pub fn arc_element(arc: &Arc) -> Element {
    Element::new(ARC_ELEMENT, ElementKind::Empty)
        .with("From_Tag_Id", arc.low())
        .with("From_Twist", arc.low_twist().to_degrees())
        .with("Distance", arc.distance())
        .with("To_Tag_Id", arc.high())
        .with("To_Twist", arc.high_twist().to_degrees())
        .with("Goodness", arc.quality().unwrap_or(UNSET_QUALITY))
        .with("In_Tree", u8::from(arc.in_tree))
}

/// Merges one arc record into `map`.
///
/// Both tags must already be in the map. The arc for the pair comes from
/// the map's own lookup-or-create path; the record then goes through the
/// quality gate. On a merge the tree flag is copied and the map is notified.
/// Returns the arc and whether the record was merged.
pub fn read_arc(element: &Element, map: &mut TagMap) -> MapResult<(ArcId, bool)> {
    element.expect(ARC_ELEMENT, ElementKind::Empty)?;
    let from = TagId(element.integer("From_Tag_Id")?);
    let from_twist = element.double("From_Twist")?.to_radians();
    let distance = element.double("Distance")?;
    let to = TagId(element.integer("To_Tag_Id")?);
    let to_twist = element.double("To_Twist")?.to_radians();
    let goodness = element.double("Goodness")?;
    let in_tree = element.flag("In_Tree")?;

    let ((low, low_twist), (high, high_twist)) = canonical((from, from_twist), (to, to_twist));
    for id in [low, high] {
        if map.tag(id).is_none() {
            return Err(MapError::corrupt(low, high, format!("unknown tag {}", id)));
        }
    }
    if low == high {
        return Err(MapError::corrupt(low, high, "arc joins a tag to itself"));
    }

    let quality = (goodness < UNSET_QUALITY).then_some(goodness);
    let Some(quality) = quality else {
        return Ok((map.arc_lookup_or_create(low, high)?, false));
    };

    // Reject a winning record before the pair becomes visible.
    let would_merge = map.arc_lookup(low, high).map_or(true, |id| map.arc(id).is_superseded_by(quality));
    if would_merge && !(distance > 0.0 && distance.is_finite()) {
        return Err(MapError::corrupt(low, high, format!("distance {} is not positive", distance)));
    }

    let id = map.arc_lookup_or_create(low, high)?;
    let arc = map.arc_mut(id);
    let merged = arc.consider_observation(low_twist, distance, high_twist, quality)?;
    if merged {
        arc.in_tree = in_tree;
        map.announce_arc(id);
    } else {
        trace!(%low, %high, quality, "arc record superseded");
    }
    Ok((id, merged))
}
