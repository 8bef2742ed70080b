use std::collections::BTreeMap;

use garnet_tree::RbTreeMap;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 10_000;

/// Generates keys in a range small enough to cause collisions.
fn key_strategy() -> impl Strategy<Value = i64> {
    -20_000i64..20_000i64
}

fn value_strategy() -> impl Strategy<Value = i64> {
    any::<i64>()
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum MapOp {
    Insert(i64, i64),
    Remove(i64),
    RemoveEntry(i64),
    Get(i64),
    ContainsKey(i64),
    GetKeyValue(i64),
    FirstKeyValue,
    LastKeyValue,
    PopFirst,
    PopLast,
    Ceiling(i64),
    Floor(i64),
}

fn map_op_strategy() -> impl Strategy<Value = MapOp> {
    prop_oneof![
        5 => (key_strategy(), value_strategy()).prop_map(|(k, v)| MapOp::Insert(k, v)),
        3 => key_strategy().prop_map(MapOp::Remove),
        1 => key_strategy().prop_map(MapOp::RemoveEntry),
        2 => key_strategy().prop_map(MapOp::Get),
        1 => key_strategy().prop_map(MapOp::ContainsKey),
        1 => key_strategy().prop_map(MapOp::GetKeyValue),
        1 => Just(MapOp::FirstKeyValue),
        1 => Just(MapOp::LastKeyValue),
        1 => Just(MapOp::PopFirst),
        1 => Just(MapOp::PopLast),
        1 => key_strategy().prop_map(MapOp::Ceiling),
        1 => key_strategy().prop_map(MapOp::Floor),
    ]
}

// ─── Core CRUD operations ────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays a random sequence of operations on both RbTreeMap and
    /// BTreeMap and asserts identical results at every step. Ceiling and
    /// floor are checked against BTreeMap range queries.
    #[test]
    fn map_ops_match_btreemap(ops in proptest::collection::vec(map_op_strategy(), TEST_SIZE)) {
        let mut rb_map: RbTreeMap<i64, i64> = RbTreeMap::new();
        let mut bt_map: BTreeMap<i64, i64> = BTreeMap::new();

        for op in &ops {
            match op {
                MapOp::Insert(k, v) => {
                    prop_assert_eq!(rb_map.insert(*k, *v), bt_map.insert(*k, *v), "insert({}, {})", k, v);
                }
                MapOp::Remove(k) => {
                    prop_assert_eq!(rb_map.remove(k), bt_map.remove(k), "remove({})", k);
                }
                MapOp::RemoveEntry(k) => {
                    prop_assert_eq!(rb_map.remove_entry(k), bt_map.remove_entry(k), "remove_entry({})", k);
                }
                MapOp::Get(k) => {
                    prop_assert_eq!(rb_map.get(k), bt_map.get(k), "get({})", k);
                }
                MapOp::ContainsKey(k) => {
                    prop_assert_eq!(rb_map.contains_key(k), bt_map.contains_key(k), "contains_key({})", k);
                }
                MapOp::GetKeyValue(k) => {
                    prop_assert_eq!(rb_map.get_key_value(k), bt_map.get_key_value(k), "get_key_value({})", k);
                }
                MapOp::FirstKeyValue => {
                    prop_assert_eq!(rb_map.first_key_value(), bt_map.first_key_value(), "first_key_value");
                }
                MapOp::LastKeyValue => {
                    prop_assert_eq!(rb_map.last_key_value(), bt_map.last_key_value(), "last_key_value");
                }
                MapOp::PopFirst => {
                    prop_assert_eq!(rb_map.pop_first(), bt_map.pop_first(), "pop_first");
                }
                MapOp::PopLast => {
                    prop_assert_eq!(rb_map.pop_last(), bt_map.pop_last(), "pop_last");
                }
                MapOp::Ceiling(k) => {
                    prop_assert_eq!(rb_map.ceiling_entry(k), bt_map.range(*k..).next(), "ceiling_entry({})", k);
                }
                MapOp::Floor(k) => {
                    prop_assert_eq!(rb_map.floor_entry(k), bt_map.range(..=*k).next_back(), "floor_entry({})", k);
                }
            }
            prop_assert_eq!(rb_map.len(), bt_map.len(), "len mismatch after {:?}", op);
            prop_assert_eq!(rb_map.is_empty(), bt_map.is_empty(), "is_empty mismatch after {:?}", op);
        }
    }

    /// Tests that iteration order matches BTreeMap after random insertions.
    #[test]
    fn iter_matches_btreemap(entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE)) {
        let mut rb_map: RbTreeMap<i64, i64> = RbTreeMap::new();
        let mut bt_map: BTreeMap<i64, i64> = BTreeMap::new();

        for (k, v) in &entries {
            rb_map.insert(*k, *v);
            bt_map.insert(*k, *v);
        }

        // Forward iteration
        let rb_items: Vec<_> = rb_map.iter().map(|(&k, &v)| (k, v)).collect();
        let bt_items: Vec<_> = bt_map.iter().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(&rb_items, &bt_items, "iter() mismatch");

        // Reverse iteration
        let rb_rev: Vec<_> = rb_map.iter().rev().map(|(&k, &v)| (k, v)).collect();
        let bt_rev: Vec<_> = bt_map.iter().rev().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(&rb_rev, &bt_rev, "iter().rev() mismatch");

        // Keys
        let rb_keys: Vec<_> = rb_map.keys().copied().collect();
        let bt_keys: Vec<_> = bt_map.keys().copied().collect();
        prop_assert_eq!(&rb_keys, &bt_keys, "keys() mismatch");

        // Values
        let rb_vals: Vec<_> = rb_map.values().copied().collect();
        let bt_vals: Vec<_> = bt_map.values().copied().collect();
        prop_assert_eq!(&rb_vals, &bt_vals, "values() mismatch");

        // into_iter
        let rb_into: Vec<_> = rb_map.clone().into_iter().collect();
        let bt_into: Vec<_> = bt_map.clone().into_iter().collect();
        prop_assert_eq!(&rb_into, &bt_into, "into_iter() mismatch");

        // into_keys
        let rb_into_keys: Vec<_> = rb_map.clone().into_keys().collect();
        let bt_into_keys: Vec<_> = bt_map.clone().into_keys().collect();
        prop_assert_eq!(&rb_into_keys, &bt_into_keys, "into_keys() mismatch");

        // into_values
        let rb_into_vals: Vec<_> = rb_map.clone().into_values().collect();
        let bt_into_vals: Vec<_> = bt_map.clone().into_values().collect();
        prop_assert_eq!(&rb_into_vals, &bt_into_vals, "into_values() mismatch");
    }

    /// Tests ExactSizeIterator and DoubleEndedIterator behavior.
    #[test]
    fn iter_size_and_double_ended(entries in proptest::collection::vec((key_strategy(), value_strategy()), 1..TEST_SIZE)) {
        let rb_map: RbTreeMap<i64, i64> = entries.iter().cloned().collect();

        let iter = rb_map.iter();
        let len = iter.len();
        prop_assert_eq!(len, rb_map.len(), "ExactSizeIterator len mismatch");

        // Alternating front/back should yield all elements
        let mut from_front = Vec::new();
        let mut from_back = Vec::new();
        let mut iter = rb_map.iter();
        let mut toggle = true;
        loop {
            if toggle {
                if let Some(item) = iter.next() {
                    from_front.push(item);
                } else {
                    break;
                }
            } else if let Some(item) = iter.next_back() {
                from_back.push(item);
            } else {
                break;
            }
            toggle = !toggle;
        }
        prop_assert_eq!(from_front.len() + from_back.len(), rb_map.len());

        // The two halves together are the full sorted sequence.
        from_back.reverse();
        from_front.extend(from_back);
        let expected: Vec<_> = rb_map.iter().collect();
        prop_assert_eq!(from_front, expected);
    }

    /// Tests range queries match BTreeMap across random bounds.
    #[test]
    fn range_matches_btreemap(
        entries in proptest::collection::vec((key_strategy(), value_strategy()), 0..2_000),
        lo in key_strategy(),
        hi in key_strategy(),
    ) {
        let mut rb_map: RbTreeMap<i64, i64> = RbTreeMap::new();
        let mut bt_map: BTreeMap<i64, i64> = BTreeMap::new();

        for (k, v) in &entries {
            rb_map.insert(*k, *v);
            bt_map.insert(*k, *v);
        }

        let (lo, hi) = (lo.min(hi), lo.max(hi));

        let rb_range: Vec<_> = rb_map.range(lo..hi).collect();
        let bt_range: Vec<_> = bt_map.range(lo..hi).collect();
        prop_assert_eq!(rb_range, bt_range, "range({}..{}) mismatch", lo, hi);

        let rb_range: Vec<_> = rb_map.range(lo..=hi).collect();
        let bt_range: Vec<_> = bt_map.range(lo..=hi).collect();
        prop_assert_eq!(rb_range, bt_range, "range({}..={}) mismatch", lo, hi);

        let rb_head: Vec<_> = rb_map.range(..hi).collect();
        let bt_head: Vec<_> = bt_map.range(..hi).collect();
        prop_assert_eq!(rb_head, bt_head, "range(..{}) mismatch", hi);

        let rb_tail: Vec<_> = rb_map.range(lo..).rev().collect();
        let bt_tail: Vec<_> = bt_map.range(lo..).rev().collect();
        prop_assert_eq!(rb_tail, bt_tail, "range({}..).rev() mismatch", lo);

        let rb_all: Vec<_> = rb_map.range(..).collect();
        let bt_all: Vec<_> = bt_map.range(..).collect();
        prop_assert_eq!(rb_all, bt_all, "range(..) mismatch");
    }

    /// contains_value agrees with a linear scan of the model.
    #[test]
    fn contains_value_matches_btreemap(
        entries in proptest::collection::vec((key_strategy(), -8i64..8i64), 0..256),
        probe in -8i64..8i64,
    ) {
        let mut rb_map: RbTreeMap<i64, i64> = RbTreeMap::new();
        let mut bt_map: BTreeMap<i64, i64> = BTreeMap::new();

        for (k, v) in &entries {
            rb_map.insert(*k, *v);
            bt_map.insert(*k, *v);
        }

        prop_assert_eq!(rb_map.contains_value(&probe), bt_map.values().any(|&v| v == probe));
    }
}

// ─── Concrete scenarios ──────────────────────────────────────────────────────

#[test]
fn ascending_inserts_rebalance() {
    // 10, 20, 30 in order forces a left rotation; the tree must answer
    // as if the keys arrived in any other order.
    let mut map = RbTreeMap::new();
    map.insert(10, "a");
    map.insert(20, "b");
    map.insert(30, "c");

    assert_eq!(map.len(), 3);
    assert_eq!(map.first_key_value(), Some((&10, &"a")));
    assert_eq!(map.last_key_value(), Some((&30, &"c")));
    let keys: Vec<_> = map.keys().copied().collect();
    assert_eq!(keys, [10, 20, 30]);
}

#[test]
fn deleting_the_sole_key_leaves_an_empty_map() {
    let mut map = RbTreeMap::new();
    map.insert(7, "seven");
    assert_eq!(map.remove(&7), Some("seven"));
    assert!(map.is_empty());
    assert_eq!(map.len(), 0);
    assert!(!map.contains_key(&7));
}

#[test]
fn ceiling_and_floor_at_the_edges() {
    let map = RbTreeMap::from([(5, "a"), (10, "b"), (15, "c")]);

    assert_eq!(map.ceiling_entry(&7), Some((&10, &"b")));
    assert_eq!(map.floor_entry(&7), Some((&5, &"a")));
    assert_eq!(map.ceiling_entry(&20), None);
    assert_eq!(map.floor_entry(&2), None);

    assert_eq!(map.ceiling_key(&7), Some(&10));
    assert_eq!(map.floor_key(&7), Some(&5));
}

#[test]
fn insert_then_delete_round_trip() {
    let mut map = RbTreeMap::new();
    map.insert("k", 1);
    assert!(map.remove("k").is_some());
    assert!(!map.contains_key("k"));
}

#[test]
fn reinserting_overwrites_without_growing() {
    let mut map = RbTreeMap::new();
    map.insert(1, "one");
    assert_eq!(map.insert(1, "uno"), Some("one"));
    assert_eq!(map.len(), 1);
    assert_eq!(map.get(&1), Some(&"uno"));
}

#[test]
fn single_key_range_and_empty_tail() {
    let map = RbTreeMap::from([(1, "a"), (2, "b")]);
    let hits: Vec<_> = map.range(2..=2).collect();
    assert_eq!(hits, [(&2, &"b")]);
    let empty: Vec<_> = map.range(3..).collect();
    assert!(empty.is_empty());
}

#[test]
#[should_panic(expected = "range start is greater than range end in RbTreeMap")]
fn reversed_range_panics() {
    let map = RbTreeMap::from([(1, "a")]);
    let _ = map.range(5..1);
}

// ─── Trait surface ───────────────────────────────────────────────────────────

#[test]
fn equality_ordering_and_debug() {
    let a = RbTreeMap::from([(2, "b"), (1, "a")]);
    let b = RbTreeMap::from([(1, "a"), (2, "b")]);
    let c = RbTreeMap::from([(1, "a"), (3, "c")]);

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert!(a < c);
    assert_eq!(format!("{a:?}"), r#"{1: "a", 2: "b"}"#);
}

#[test]
fn hash_agrees_for_equal_maps() {
    use std::hash::{BuildHasher, RandomState};

    let state = RandomState::new();
    let a = RbTreeMap::from([(2, "b"), (1, "a")]);
    let b = RbTreeMap::from([(1, "a"), (2, "b")]);
    assert_eq!(state.hash_one(&a), state.hash_one(&b));
}

#[test]
fn index_returns_the_stored_value() {
    let map = RbTreeMap::from([(1, "a")]);
    assert_eq!(map[&1], "a");
}

#[test]
#[should_panic(expected = "no entry found for key")]
fn index_panics_on_missing_key() {
    let map = RbTreeMap::from([(1, "a")]);
    let _ = map[&2];
}

#[test]
fn extend_and_clone_behave_like_bulk_load() {
    let mut map: RbTreeMap<i32, i32> = RbTreeMap::new();
    map.extend((0..100).map(|i| (i, i * 2)));
    assert_eq!(map.len(), 100);

    let copy = map.clone();
    assert_eq!(copy, map);

    map.clear();
    assert!(map.is_empty());
    assert_eq!(copy.len(), 100);
    assert_eq!(copy[&99], 198);
}

#[test]
fn borrowed_key_lookups() {
    let mut map: RbTreeMap<String, i32> = RbTreeMap::new();
    map.insert("alpha".to_string(), 1);
    map.insert("beta".to_string(), 2);

    // Lookups work through &str thanks to Borrow.
    assert_eq!(map.get("alpha"), Some(&1));
    assert!(map.contains_key("beta"));
    assert_eq!(map.remove("alpha"), Some(1));
    assert_eq!(map.len(), 1);
}
