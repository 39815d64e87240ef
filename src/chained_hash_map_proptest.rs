#![cfg(test)]

// Property tests for ChainedHashMap kept inside the crate so they can check
// bucket placement and capacity against the private growth policy.

use crate::chained_hash_map::ChainedHashMap;
use crate::error::MapError;
use crate::growth::{self, CAPACITIES};
use crate::strategy::{CaseInsensitive, KeyStrategy};
use hashbrown::HashMap;
use proptest::prelude::*;

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Add(usize, i32),
    Set(usize, i32),
    Remove(usize),
    Get(usize),
    TryGet(String),
    Mutate(usize, i32),
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,4}", 1..=96).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Add(i, v)),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Set(i, v)),
            2 => idx.clone().prop_map(OpI::Remove),
            1 => idx.clone().prop_map(OpI::Get),
            1 => "[a-z]{0,4}".prop_map(OpI::TryGet),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..300).prop_map(move |ops| (pool.clone(), ops))
    })
}

/// Structural invariants checked after every step:
/// - `len` equals the number of nodes reachable from the buckets.
/// - every stored key is found by walking only its home bucket.
fn check_structure<V, S: KeyStrategy<str>>(
    sut: &ChainedHashMap<String, V, S>,
) -> Result<(), TestCaseError> {
    let reachable: usize = sut.chain_lengths().sum();
    prop_assert_eq!(reachable, sut.len());
    prop_assert_eq!(sut.iter().count(), sut.len());
    for k in sut.keys() {
        prop_assert!(sut.contains_key(k.as_str()));
    }
    Ok(())
}

fn bucket_is_empty<S: KeyStrategy<str>>(
    sut: &ChainedHashMap<String, i32, S>,
    model: &HashMap<String, i32>,
    key: &str,
) -> bool {
    let slot = |k: &str| growth::bucket_index(sut.strategy().hash(k), sut.capacity());
    let target = slot(key);
    !model.keys().any(|k| slot(k) == target)
}

// Property: State-machine equivalence against hashbrown::HashMap.
// Invariants exercised across random operation sequences:
// - `add` rejects duplicates without touching the stored value or `len`.
// - `set` upserts and reports the replaced value.
// - `remove` errors exactly when the key's bucket is empty, otherwise
//   reports presence as a bool.
// - capacity follows the fixed table, growing when len > 3 * capacity.
// - `iter` yields each live entry exactly once; keys and values agree.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        let mut sut: ChainedHashMap<String, i32> = ChainedHashMap::new();
        let mut model: HashMap<String, i32> = HashMap::new();
        let mut capacity = CAPACITIES[0];

        for op in ops {
            match op {
                OpI::Add(i, v) => {
                    let k = pool[i].clone();
                    let already = model.contains_key(&k);
                    match sut.add(k.clone(), v) {
                        Ok(()) => {
                            prop_assert!(!already, "add must fail on duplicate");
                            model.insert(k, v);
                            if growth::should_grow(model.len(), capacity) {
                                capacity = growth::next_capacity(CAPACITIES, capacity);
                            }
                        }
                        Err(e) => {
                            prop_assert_eq!(e, MapError::DuplicateKey);
                            prop_assert!(already, "duplicate error only when key exists");
                            prop_assert_eq!(sut.get(k.as_str()), Ok(&model[&k]));
                        }
                    }
                }
                OpI::Set(i, v) => {
                    let k = pool[i].clone();
                    let prev = sut.set(k.clone(), v);
                    let expected = model.insert(k, v);
                    prop_assert_eq!(prev, expected);
                    if expected.is_none() && growth::should_grow(model.len(), capacity) {
                        capacity = growth::next_capacity(CAPACITIES, capacity);
                    }
                }
                OpI::Remove(i) => {
                    let k = &pool[i];
                    let empty = bucket_is_empty(&sut, &model, k);
                    match sut.remove(k.as_str()) {
                        Err(e) => {
                            prop_assert_eq!(e, MapError::KeyMissing);
                            prop_assert!(empty, "KeyMissing only for an empty bucket");
                            prop_assert!(!model.contains_key(k));
                        }
                        Ok(removed) => {
                            prop_assert!(!empty);
                            prop_assert_eq!(removed, model.remove(k).is_some());
                        }
                    }
                    prop_assert!(!sut.contains_key(k.as_str()));
                }
                OpI::Get(i) => {
                    let k = &pool[i];
                    match model.get(k) {
                        Some(v) => {
                            prop_assert_eq!(sut.get(k.as_str()), Ok(v));
                        }
                        None => {
                            prop_assert_eq!(sut.get(k.as_str()), Err(MapError::KeyNotFound));
                        }
                    }
                }
                OpI::TryGet(s) => {
                    prop_assert_eq!(sut.try_get(s.as_str()), model.get(&s));
                    prop_assert_eq!(sut.contains_key(s.as_str()), model.contains_key(&s));
                }
                OpI::Mutate(i, d) => {
                    let k = &pool[i];
                    match (sut.get_mut(k.as_str()), model.get_mut(k)) {
                        (Some(a), Some(b)) => {
                            *a = a.wrapping_add(d);
                            *b = b.wrapping_add(d);
                        }
                        (None, None) => {}
                        _ => {
                            prop_assert!(false, "get_mut presence mismatch");
                        }
                    }
                }
                OpI::Iterate => {
                    let mut seen: HashMap<String, i32> = HashMap::new();
                    for (k, v) in sut.iter() {
                        prop_assert!(seen.insert(k.clone(), *v).is_none(), "duplicate in iteration");
                    }
                    prop_assert_eq!(&seen, &model);
                    let values: Vec<i32> = sut.values().copied().collect();
                    let paired: Vec<i32> = sut.iter().map(|(_, v)| *v).collect();
                    prop_assert_eq!(values, paired);
                }
            }

            prop_assert_eq!(sut.len(), model.len());
            prop_assert_eq!(sut.is_empty(), model.is_empty());
            prop_assert_eq!(sut.capacity(), capacity);
            check_structure(&sut)?;
        }

        // Final sweep: every model entry is retrievable.
        for (k, v) in &model {
            prop_assert_eq!(sut.get(k.as_str()), Ok(v));
        }
    }

    // Property: under a case-insensitive strategy, every spelling of a key
    // resolves to the entry stored under its first spelling.
    #[test]
    fn prop_case_insensitive_lookup(words in proptest::collection::vec("[a-zA-Z]{1,6}", 1..60)) {
        let mut sut: ChainedHashMap<String, usize, CaseInsensitive> =
            ChainedHashMap::with_strategy(CaseInsensitive::new());
        let mut model: HashMap<String, usize> = HashMap::new();

        for (i, w) in words.iter().enumerate() {
            let folded = w.to_lowercase();
            let res = sut.add(w.clone(), i);
            if model.contains_key(&folded) {
                prop_assert_eq!(res, Err(MapError::DuplicateKey));
            } else {
                prop_assert!(res.is_ok());
                model.insert(folded, i);
            }
        }

        prop_assert_eq!(sut.len(), model.len());
        for w in &words {
            let expected = &model[&w.to_lowercase()];
            prop_assert_eq!(sut.get(w.to_uppercase().as_str()), Ok(expected));
            prop_assert_eq!(sut.get(w.to_lowercase().as_str()), Ok(expected));
        }
        check_structure(&sut)?;
    }
}
