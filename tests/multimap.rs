// Multimap test suite.
//
// Invariants exercised:
// - Presence: a key is present exactly while at least one value is stored
//   under it; get on an absent key is None.
// - Totals: total_len() counts every stored pair, repeats included.
// - remove drops one occurrence; remove_all drops the key.
use bimap_collections::{ArrayMultimap, Multimap, MultisetMultimap};
use proptest::prelude::*;
use std::collections::HashMap;

// Test: ArrayMultimap keeps values per key in insertion order, repeats
// included.
#[test]
fn array_multimap_keeps_order_and_repeats() {
    let mut m = ArrayMultimap::new();
    m.put("a", 1).put("a", 2).put("a", 1).put("b", 9);
    assert_eq!(m.get("a"), Some(&[1, 2, 1][..]));
    assert_eq!(m.len(), 2);
    assert_eq!(m.total_len(), 4);
    assert!(m.contains_entry("a", &2));
    assert!(!m.contains_entry("b", &2));
    assert_eq!(m.get("zzz"), None);
}

// Test: removal of one occurrence.
// Verifies: the first matching value goes; the key goes with its last value.
#[test]
fn array_multimap_remove_one_occurrence() {
    let mut m = ArrayMultimap::new();
    m.put(1u8, 'x').put(1, 'y').put(1, 'x');
    assert!(m.remove(&1, &'x'));
    assert_eq!(m.get(&1), Some(&['y', 'x'][..]));
    assert!(!m.remove(&1, &'q'));
    assert!(!m.remove(&2, &'x'));
    assert!(m.remove(&1, &'y'));
    assert!(m.remove(&1, &'x'));
    assert!(!m.contains_key(&1));
    assert_eq!(m.get(&1), None);
    assert!(m.is_empty());
    assert_eq!(m.total_len(), 0);
}

// Test: remove_all / clear and the collection views.
#[test]
fn array_multimap_bulk_and_views() {
    let mut m: ArrayMultimap<u8, u8> = [(1, 10), (2, 20), (1, 11)].into_iter().collect();
    let mut pairs: Vec<(u8, u8)> = m.pairs().map(|(k, v)| (*k, *v)).collect();
    pairs.sort_unstable();
    assert_eq!(pairs, vec![(1, 10), (1, 11), (2, 20)]);
    assert_eq!(m.values().count(), 3);
    assert_eq!(m.keys().count(), 2);

    assert_eq!(m.remove_all(&1), Some(vec![10, 11]));
    assert_eq!(m.remove_all(&1), None);
    assert_eq!(m.total_len(), 1);

    let snapshot = m.clone();
    assert_eq!(snapshot, m);
    m.clear();
    assert!(m.is_empty());
    assert_eq!(snapshot.total_len(), 1);
}

// Test: MultisetMultimap counts values rather than listing them.
#[test]
fn multiset_multimap_counts_values() {
    let mut m = MultisetMultimap::new();
    m.put("k", "v").put("k", "v").put("k", "w");
    assert_eq!(m.len(), 1);
    assert_eq!(m.total_len(), 3);
    let values = m.get("k").expect("key present");
    assert_eq!(values.count("v"), 2);
    assert_eq!(values.distinct_len(), 2);

    assert!(m.remove("k", "v"));
    assert_eq!(m.get("k").map(|vs| vs.count("v")), Some(1));
    assert!(m.contains_entry("k", "w"));
    assert!(!m.remove("k", "nope"));

    let all = m.remove_all("k").expect("key present");
    assert_eq!(all.len(), 2);
    assert!(m.get("k").is_none());
    assert_eq!(m.total_len(), 0);
}

// Test: both flavours through the shared trait.
// Assumes: `Multimap::remove_all` reports the number of values removed.
fn exercise<M: Multimap<u32, u32>>(m: &mut M) {
    m.put(1, 1).put(1, 2).put(2, 1);
    assert_eq!(m.len(), 2);
    assert_eq!(m.total_len(), 3);
    assert!(m.contains_key(&1));
    assert!(m.get(&3).is_none());
    assert!(m.remove(&2, &1));
    assert!(!m.contains_key(&2));
    assert_eq!(m.remove_all(&1), 2);
    assert_eq!(m.remove_all(&1), 0);
    assert!(m.is_empty());
    m.put(5, 5);
    m.clear();
    assert_eq!(m.total_len(), 0);
}

#[test]
fn trait_covers_both_flavours() {
    exercise(&mut ArrayMultimap::new());
    exercise(&mut MultisetMultimap::new());
}

// Property: both flavours agree with a HashMap<key, Vec<value>> model on
// presence and per-key value counts.
proptest! {
    #[test]
    fn prop_flavours_match_model(ops in proptest::collection::vec((0u8..3, 0u8..4, 0u8..3), 1..80)) {
        let mut arr: ArrayMultimap<u8, u8> = ArrayMultimap::new();
        let mut set: MultisetMultimap<u8, u8> = MultisetMultimap::new();
        let mut model: HashMap<u8, Vec<u8>> = HashMap::new();
        for (op, k, v) in ops {
            match op {
                0 | 1 => {
                    arr.put(k, v);
                    set.put(k, v);
                    model.entry(k).or_default().push(v);
                }
                _ => {
                    let expected = match model.get_mut(&k) {
                        Some(vs) => match vs.iter().position(|x| *x == v) {
                            Some(i) => {
                                vs.remove(i);
                                if vs.is_empty() {
                                    model.remove(&k);
                                }
                                true
                            }
                            None => false,
                        },
                        None => false,
                    };
                    prop_assert_eq!(arr.remove(&k, &v), expected);
                    prop_assert_eq!(set.remove(&k, &v), expected);
                }
            }
            let total: usize = model.values().map(Vec::len).sum();
            prop_assert_eq!(arr.total_len(), total);
            prop_assert_eq!(set.total_len(), total);
            prop_assert_eq!(arr.len(), model.len());
            prop_assert_eq!(set.len(), model.len());
            for k in 0u8..4 {
                match model.get(&k) {
                    None => {
                        prop_assert!(arr.get(&k).is_none());
                        prop_assert!(set.get(&k).is_none());
                    }
                    Some(vs) => {
                        prop_assert_eq!(arr.get(&k), Some(&vs[..]));
                        for v in vs {
                            let n = vs.iter().filter(|x| *x == v).count();
                            prop_assert_eq!(set.get(&k).map(|s| s.count(v)), Some(n));
                        }
                    }
                }
            }
        }
    }
}
