//! The two orderings over arcs.
//!
//! Identity order compares tag pairs and is what `Arc`'s `Ord` uses. Growth
//! order compares measured length and tree connectivity and drives spanning
//! tree construction. The two are never interchangeable.

use crate::graph::edge::Arc;
use crate::graph::node::TagId;
use std::cmp::Ordering;

/// True when both arcs join the same tag pair.
pub fn arcs_equal(arc1: &Arc, arc2: &Arc) -> bool {
    arc1.low() == arc2.low() && arc1.high() == arc2.high()
}

/// Lexicographic order on `(low, high)`.
pub fn identity_cmp(arc1: &Arc, arc2: &Arc) -> Ordering {
    arc1.low().cmp(&arc2.low()).then_with(|| arc1.high().cmp(&arc2.high()))
}

pub fn identity_less(arc1: &Arc, arc2: &Arc) -> bool {
    identity_cmp(arc1, arc2) == Ordering::Less
}

/// Supplies tag hop counts to the growth order.
pub trait HopCounts {
    fn hop_count(&self, tag: TagId) -> u32;
}

/// The values growth order looks at, captured from one arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthKey {
    pub distance: f64,
    pub min_hop_count: u32,
}

impl GrowthKey {
    pub fn of(arc: &Arc, hops: &impl HopCounts) -> Self {
        Self {
            distance: arc.distance(),
            min_hop_count: hops.hop_count(arc.low()).min(hops.hop_count(arc.high())),
        }
    }
}

/// Growth order: the longer arc sorts first; on equal length, the arc whose
/// nearer end has the larger hop count sorts first. Nothing else breaks ties.
pub fn growth_cmp(key1: &GrowthKey, key2: &GrowthKey) -> Ordering {
    key2.distance
        .total_cmp(&key1.distance)
        .then_with(|| key2.min_hop_count.cmp(&key1.min_hop_count))
}

pub fn growth_less(key1: &GrowthKey, key2: &GrowthKey) -> bool {
    growth_cmp(key1, key2) == Ordering::Less
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    struct Hops(HashMap<TagId, u32>);

    impl HopCounts for Hops {
        fn hop_count(&self, tag: TagId) -> u32 { self.0[&tag] }
    }

    fn arc(a: u32, b: u32, distance: f64) -> Arc {
        Arc::create(TagId(a), 0.0, distance, TagId(b), 0.0, 1.0).unwrap()
    }

    fn key(distance: f64, min_hop_count: u32) -> GrowthKey {
        GrowthKey { distance, min_hop_count }
    }

    #[test]
    fn test_equality_ignores_construction_order_and_measurements() {
        let a = arc(3, 1, 2.0);
        let b = arc(1, 3, 9.0);
        let c = Arc::unmeasured(TagId(3), TagId(1)).unwrap();
        assert!(arcs_equal(&a, &a));
        assert!(arcs_equal(&a, &b) && arcs_equal(&b, &a));
        assert!(arcs_equal(&b, &c) && arcs_equal(&a, &c));
        assert!(!arcs_equal(&a, &arc(1, 4, 2.0)));
    }

    #[test]
    fn test_equality_is_pairwise_not_crossed() {
        // (1,2) and (2,3) share tag 2 but in different slots.
        assert!(!arcs_equal(&arc(1, 2, 1.0), &arc(2, 3, 1.0)));
    }

    #[test]
    fn test_identity_order_is_strict_and_total() {
        let mut arcs = vec![arc(4, 2, 1.0), arc(1, 9, 1.0), arc(2, 3, 1.0), arc(1, 2, 1.0)];
        arcs.sort();
        let pairs: Vec<_> = arcs.iter().map(|a| (a.low().0, a.high().0)).collect();
        assert_eq!(pairs, vec![(1, 2), (1, 9), (2, 3), (2, 4)]);

        for x in &arcs {
            assert!(!identity_less(x, x));
            for y in &arcs {
                if !arcs_equal(x, y) {
                    assert!(identity_less(x, y) ^ identity_less(y, x));
                }
                for z in &arcs {
                    if identity_less(x, y) && identity_less(y, z) {
                        assert!(identity_less(x, z));
                    }
                }
            }
        }
    }

    #[rstest]
    #[case(key(10.0, 0), key(5.0, 9), true)]
    #[case(key(5.0, 9), key(10.0, 0), false)]
    #[case(key(7.0, 3), key(7.0, 1), true)]
    #[case(key(7.0, 1), key(7.0, 3), false)]
    #[case(key(7.0, 2), key(7.0, 2), false)]
    fn test_growth_less(#[case] k1: GrowthKey, #[case] k2: GrowthKey, #[case] expected: bool) {
        assert_eq!(growth_less(&k1, &k2), expected);
    }

    #[test]
    fn test_equal_keys_are_equivalent() {
        assert_eq!(growth_cmp(&key(7.0, 2), &key(7.0, 2)), Ordering::Equal);
    }

    #[test]
    fn test_growth_key_uses_nearer_end() {
        let hops = Hops(HashMap::from([(TagId(1), 4), (TagId(2), 1), (TagId(3), 3), (TagId(4), 6)]));
        let a = arc(1, 2, 7.0);
        let b = arc(3, 4, 7.0);
        let ka = GrowthKey::of(&a, &hops);
        let kb = GrowthKey::of(&b, &hops);
        assert_eq!(ka.min_hop_count, 1);
        assert_eq!(kb.min_hop_count, 3);
        assert!(growth_less(&kb, &ka));
    }
}
