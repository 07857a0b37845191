// HashBiMap property tests.
//
// Property 1: a map and its inverse view behave like one ordered list of
// distinct pairs.
//  - Model: Vec<(key, value)> in insertion order.
//  - Operations: set / force_set / remove through either side, clear.
//  - Invariant after each step: iteration of both sides equals the model
//    (the inverse with pairs swapped); every model pair resolves both ways.
//
// Property 2: an iterator that outlives mutations only yields pairs that
// are present when yielded, and always terminates.
use bimap_collections::{CollectionError, HashBiMap};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    Set(u8, u8),
    ForceSet(u8, u8),
    InvSet(u8, u8),
    InvForceSet(u8, u8),
    Remove(u8),
    InvRemove(u8),
    Clear,
}

fn arb_op() -> impl Strategy<Value = Op> {
    let k = 0u8..6;
    let v = 0u8..6;
    prop_oneof![
        4 => (k.clone(), v.clone()).prop_map(|(k, v)| Op::Set(k, v)),
        3 => (k.clone(), v.clone()).prop_map(|(k, v)| Op::ForceSet(k, v)),
        2 => (v.clone(), k.clone()).prop_map(|(v, k)| Op::InvSet(v, k)),
        2 => (v.clone(), k.clone()).prop_map(|(v, k)| Op::InvForceSet(v, k)),
        2 => k.prop_map(Op::Remove),
        2 => v.prop_map(Op::InvRemove),
        1 => Just(Op::Clear),
    ]
}

// Apply a put to the ordered model. Returns the error an unforced put
// would report, with key conflicts taking precedence.
fn model_put(
    model: &mut Vec<(u8, u8)>,
    k: u8,
    v: u8,
    force: bool,
) -> Result<(), CollectionError> {
    if model.contains(&(k, v)) {
        return Ok(());
    }
    let by_key = model.iter().position(|&(mk, _)| mk == k);
    let by_value = model.iter().position(|&(_, mv)| mv == v);
    if !force {
        if by_key.is_some() {
            return Err(CollectionError::KeyConflict);
        }
        if by_value.is_some() {
            return Err(CollectionError::ValueConflict);
        }
    }
    match by_key {
        Some(i) => model[i] = (k, v),
        None => model.push((k, v)),
    }
    if let Some(j) = by_value {
        // `by_key` replaced in place, so `j` still names the value holder.
        model.remove(j);
    }
    Ok(())
}

fn flip(e: CollectionError) -> CollectionError {
    match e {
        CollectionError::KeyConflict => CollectionError::ValueConflict,
        CollectionError::ValueConflict => CollectionError::KeyConflict,
        other => other,
    }
}

proptest! {
    #[test]
    fn prop_map_and_inverse_match_model(ops in proptest::collection::vec(arb_op(), 1..100)) {
        let m: HashBiMap<u8, u8> = HashBiMap::with_expected_size(1);
        let inv = m.inverse();
        let mut model: Vec<(u8, u8)> = Vec::new();

        for op in ops {
            match op {
                Op::Set(k, v) => {
                    let want = model_put(&mut model, k, v, false);
                    prop_assert_eq!(m.set(k, v).map(|_| ()), want);
                }
                Op::ForceSet(k, v) => {
                    model_put(&mut model, k, v, true).unwrap();
                    m.force_set(k, v);
                }
                Op::InvSet(v, k) => {
                    // Seen from the inverse, the primary value is the key.
                    let want = model_put(&mut model, k, v, false);
                    let got = inv.set(v, k).map(|_| ());
                    match want {
                        Ok(()) => prop_assert_eq!(got, Ok(())),
                        // The inverse reports conflicts with the roles swapped.
                        Err(e) => prop_assert_eq!(got, Err(flip(e))),
                    }
                }
                Op::InvForceSet(v, k) => {
                    model_put(&mut model, k, v, true).unwrap();
                    inv.force_set(v, k);
                }
                Op::Remove(k) => {
                    let pos = model.iter().position(|&(mk, _)| mk == k);
                    let want = pos.map(|i| model.remove(i));
                    prop_assert_eq!(m.remove_entry(&k), want);
                }
                Op::InvRemove(v) => {
                    let pos = model.iter().position(|&(_, mv)| mv == v);
                    let want = pos.map(|i| {
                        let (k, v) = model.remove(i);
                        (v, k)
                    });
                    prop_assert_eq!(inv.remove_entry(&v), want);
                }
                Op::Clear => {
                    m.clear();
                    model.clear();
                }
            }

            let forward: Vec<(u8, u8)> = m.iter().collect();
            prop_assert_eq!(&forward, &model);
            let backward: Vec<(u8, u8)> = inv.iter().map(|(v, k)| (k, v)).collect();
            prop_assert_eq!(&backward, &model);
            prop_assert_eq!(m.len(), model.len());
            for &(k, v) in &model {
                prop_assert_eq!(m.get(&k).map(|r| *r), Some(v));
                prop_assert_eq!(inv.get(&v).map(|r| *r), Some(k));
            }
        }
    }
}

proptest! {
    #[test]
    fn prop_iterator_survives_mutation(
        initial in proptest::collection::vec((0u8..16, 0u8..16), 0..16),
        steps in proptest::collection::vec((any::<bool>(), 0u8..16, 0u8..16), 0..24),
    ) {
        let m: HashBiMap<u8, u8> = HashBiMap::new();
        for (k, v) in initial {
            let _ = m.set(k, v);
        }
        let mut it = m.iter();
        for (remove, k, v) in steps {
            if remove {
                m.remove(&k);
            } else {
                m.force_set(k, v);
            }
            if let Some((yk, yv)) = it.next() {
                prop_assert_eq!(m.get(&yk).map(|r| *r), Some(yv));
            }
        }
        // Without further mutation the rest is a subset of the live pairs.
        let rest: Vec<(u8, u8)> = it.collect();
        prop_assert!(rest.len() <= m.len());
        for (k, v) in rest {
            prop_assert_eq!(m.get(&k).map(|r| *r), Some(v));
        }
    }
}
