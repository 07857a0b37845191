#![cfg(test)]

// Property tests for RawBiMap kept inside the crate so they can reach
// `assert_consistent` without feature gates.

use crate::error::CollectionError;
use crate::raw_bimap::{PutResult, RawBiMap, Rejected};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::HashMap;
use std::fmt;
use std::hash::{BuildHasher, Hasher};

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Keys come from a small pool and values from a small range so that both
// kinds of conflict show up often.
#[derive(Clone, Debug)]
enum OpI {
    Put(usize, u8),
    ForcePut(usize, u8),
    RemoveKey(usize),
    RemoveValue(u8),
    Get(usize),
    GetByValue(u8),
    Contains(String),
    Clear,
    Iterate,
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,4}", 1..=8).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let val = 0u8..8;
        let op = prop_oneof![
            4 => (idx.clone(), val.clone()).prop_map(|(i, v)| OpI::Put(i, v)),
            3 => (idx.clone(), val.clone()).prop_map(|(i, v)| OpI::ForcePut(i, v)),
            2 => idx.clone().prop_map(OpI::RemoveKey),
            2 => val.clone().prop_map(OpI::RemoveValue),
            2 => idx.clone().prop_map(OpI::Get),
            2 => val.clone().prop_map(OpI::GetByValue),
            1 => "[a-z]{0,4}".prop_map(OpI::Contains),
            1 => Just(OpI::Clear),
            1 => Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Reference model: a forward map plus the insertion order of its keys.
#[derive(Default)]
struct Model {
    forward: HashMap<Key, u8>,
    order: Vec<Key>,
}

impl Model {
    fn key_for(&self, v: u8) -> Option<&Key> {
        self.forward.iter().find(|(_, &mv)| mv == v).map(|(k, _)| k)
    }

    fn remove(&mut self, k: &Key) -> Option<u8> {
        let v = self.forward.remove(k)?;
        self.order.retain(|o| o != k);
        Some(v)
    }

    fn pairs(&self) -> Vec<(Key, u8)> {
        self.order
            .iter()
            .map(|k| (k.clone(), self.forward[k]))
            .collect()
    }
}

fn run<S: BuildHasher>(
    sut: &mut RawBiMap<Key, u8, S>,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut model = Model::default();
    for op in ops {
        match op {
            OpI::Put(i, v) => {
                let k = key_from(pool, i);
                let same = model.forward.get(&k) == Some(&v);
                let key_taken = model.forward.contains_key(&k);
                let value_taken = model.key_for(v).is_some();
                match sut.put(k.clone(), v, false) {
                    Ok(PutResult::Unchanged { .. }) => prop_assert!(same),
                    Ok(PutResult::Inserted {
                        old_for_key,
                        old_for_value,
                    }) => {
                        prop_assert!(!key_taken && !value_taken);
                        prop_assert!(old_for_key.is_none() && old_for_value.is_none());
                        model.forward.insert(k.clone(), v);
                        model.order.push(k);
                    }
                    Err(Rejected { error, .. }) => {
                        prop_assert!(!same);
                        // Key conflicts are reported ahead of value conflicts.
                        let expected = if key_taken {
                            CollectionError::KeyConflict
                        } else {
                            CollectionError::ValueConflict
                        };
                        prop_assert!(value_taken || key_taken);
                        prop_assert_eq!(error, expected);
                    }
                }
            }
            OpI::ForcePut(i, v) => {
                let k = key_from(pool, i);
                let same = model.forward.get(&k) == Some(&v);
                let holder = model.key_for(v).filter(|h| **h != k).cloned();
                match sut.put(k.clone(), v, true) {
                    Ok(PutResult::Unchanged { .. }) => prop_assert!(same),
                    Ok(PutResult::Inserted {
                        old_for_key,
                        old_for_value,
                    }) => {
                        prop_assert!(!same);
                        let prior = model.forward.insert(k.clone(), v);
                        prop_assert_eq!(old_for_key, prior.map(|pv| (k.clone(), pv)));
                        if prior.is_none() {
                            model.order.push(k);
                        }
                        let bumped = holder.map(|h| {
                            model.remove(&h);
                            (h, v)
                        });
                        prop_assert_eq!(old_for_value, bumped);
                    }
                    Err(r) => prop_assert!(false, "forced put rejected: {:?}", r.error),
                }
            }
            OpI::RemoveKey(i) => {
                let k = key_from(pool, i);
                let got = sut.remove_by_key(&k);
                let want = model.remove(&k).map(|v| (k, v));
                prop_assert_eq!(got, want);
            }
            OpI::RemoveValue(v) => {
                let holder = model.key_for(v).cloned();
                let got = sut.remove_by_value(&v);
                let want = holder.map(|h| {
                    model.remove(&h);
                    (h, v)
                });
                prop_assert_eq!(got, want);
            }
            OpI::Get(i) => {
                let k = key_from(pool, i);
                prop_assert_eq!(sut.get(&k), model.forward.get(&k));
                prop_assert_eq!(sut.contains_key(&k), model.forward.contains_key(&k));
            }
            OpI::GetByValue(v) => {
                prop_assert_eq!(sut.get_by_value(&v), model.key_for(v));
                prop_assert_eq!(sut.contains_value(&v), model.key_for(v).is_some());
            }
            OpI::Contains(s) => {
                let has_model = model.forward.keys().any(|k| k.0 == s);
                prop_assert_eq!(sut.contains_key(s.as_str()), has_model);
            }
            OpI::Clear => {
                let cap = sut.capacity();
                let drained = sut.clear();
                prop_assert_eq!(drained.len(), model.order.len());
                prop_assert_eq!(sut.capacity(), cap);
                model = Model::default();
            }
            OpI::Iterate => {
                let got: Vec<(Key, u8)> = sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(got, model.pairs());
            }
        }

        sut.assert_consistent();
        prop_assert_eq!(sut.len(), model.forward.len());
        prop_assert_eq!(sut.is_empty(), model.forward.is_empty());
    }
    Ok(())
}

// Property: state-machine equivalence against a forward map plus an
// insertion-order list.
// - Unforced puts either insert a fresh pair, leave an identical pair
//   alone, or fail with the matching conflict and change nothing.
// - Forced puts displace the holder of the key (keeping its position) and
//   the holder of the value, returning both.
// - Lookups agree in both directions; iteration matches insertion order.
// - Bucket chains, order links and the bijection stay consistent.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        let mut sut: RawBiMap<Key, u8> = RawBiMap::with_expected_size(2);
        run(&mut sut, &pool, ops)?;
    }
}

// Collision variant using a constant hasher to stress equality resolution.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

// Property: same invariants with every key and every value in one bucket.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        let mut sut: RawBiMap<Key, u8, ConstBuildHasher> =
            RawBiMap::with_expected_size_and_hasher(2, ConstBuildHasher);
        run(&mut sut, &pool, ops)?;
    }
}

#[test]
fn key_hash_matches_borrowed_form() {
    // Lookups through `str` must land in the bucket chosen for `Key`.
    let s = std::collections::hash_map::RandomState::new();
    let a = crate::hashing::smeared_hash(&s, &Key("ab".into()));
    let b = crate::hashing::smeared_hash(&s, "ab");
    assert_eq!(a, b);
}
