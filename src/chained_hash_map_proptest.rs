#![cfg(test)]

// Property tests for ChainedHashMap kept inside the crate so they can check
// bucket-level invariants that the public API does not expose.

use crate::chained_hash_map::ChainedHashMap;
use crate::error::MapError;
use crate::hasher::{BuildIdentityHasher, DefaultHashBuilder};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::hash::{BuildHasher, Hasher};

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
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

// Pool-indexed operations: indices shrink to earlier keys, the pool shrinks,
// and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    TryInsert(usize, i32),
    InsertOrAssign(usize, i32),
    Erase(usize),
    TryRemove(usize),
    Contains(String),
    At(usize),
    Mutate(usize, i32),
    GetOrInsertDefault(usize),
    BucketSize(usize),
    Iterate,
    Clear,
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=40).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            6 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::TryInsert(i, v)),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::InsertOrAssign(i, v)),
            4 => idx.clone().prop_map(OpI::Erase),
            2 => idx.clone().prop_map(OpI::TryRemove),
            2 => prop_oneof![
                contains_pool.prop_map(|s: String| s),
                "[a-z]{0,5}".prop_map(|s| s)
            ]
            .prop_map(OpI::Contains),
            2 => idx.clone().prop_map(OpI::At),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => idx.clone().prop_map(OpI::GetOrInsertDefault),
            1 => idx.clone().prop_map(OpI::BucketSize),
            1 => Just(OpI::Iterate),
            1 => Just(OpI::Clear),
        ];
        proptest::collection::vec(op, 1..120).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Drives one operation sequence against both the map and a std HashMap model.
fn run_scenario<S: BuildHasher>(
    mut sut: ChainedHashMap<Key, i32, S>,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<Key, i32> = HashMap::new();

    for op in ops {
        let capacity_before = sut.capacity();
        match op {
            OpI::Insert(i, v) => {
                let k = key_from(pool, i);
                let already = model.contains_key(&k);
                prop_assert_eq!(sut.insert(k.clone(), v), !already);
                model.entry(k).or_insert(v);
            }
            OpI::TryInsert(i, v) => {
                let k = key_from(pool, i);
                let already = model.contains_key(&k);
                prop_assert_eq!(sut.try_insert(k.clone(), v), Ok(!already));
                model.entry(k).or_insert(v);
            }
            OpI::InsertOrAssign(i, v) => {
                let k = key_from(pool, i);
                prop_assert_eq!(sut.insert_or_assign(k.clone(), v), model.insert(k, v));
            }
            OpI::Erase(i) => {
                let k = key_from(pool, i);
                let present = model.remove(&k).is_some();
                prop_assert_eq!(sut.erase(&k), present);
                prop_assert!(!sut.contains_key(&k));
            }
            OpI::TryRemove(i) => {
                let k = key_from(pool, i);
                prop_assert_eq!(sut.try_remove(k.0.as_str()), Ok(model.remove(&k)));
            }
            OpI::Contains(s) => {
                let has_model = model.keys().any(|k| k.0 == s);
                prop_assert_eq!(sut.contains_key(s.as_str()), has_model);
            }
            OpI::At(i) => {
                let k = key_from(pool, i);
                match model.get(&k) {
                    Some(v) => prop_assert_eq!(sut.at(&k), Ok(v)),
                    None => prop_assert_eq!(sut.at(&k), Err(MapError::KeyNotFound)),
                }
            }
            OpI::Mutate(i, d) => {
                let k = key_from(pool, i);
                if let Some(mv) = model.get_mut(&k) {
                    let v = sut.at_mut(&k).expect("present key");
                    *v = v.saturating_add(d);
                    *mv = mv.saturating_add(d);
                } else {
                    prop_assert!(sut.at_mut(&k).is_err());
                }
            }
            OpI::GetOrInsertDefault(i) => {
                let k = key_from(pool, i);
                let expected = *model.entry(k.clone()).or_default();
                prop_assert_eq!(*sut.get_or_insert_default(k), expected);
            }
            OpI::BucketSize(i) => {
                let k = key_from(pool, i);
                let r = sut.bucket_size(&k);
                if model.contains_key(&k) {
                    let n = r.expect("present key has a bucket");
                    prop_assert!(n >= 1 && n <= sut.len());
                } else {
                    prop_assert_eq!(r, Err(MapError::KeyNotFound));
                }
            }
            OpI::Iterate => {
                let it = sut.iter();
                prop_assert_eq!(it.len(), sut.len());
                let s_pairs: BTreeMap<_, _> = it.map(|(k, v)| (k.clone(), *v)).collect();
                let m_pairs: BTreeMap<_, _> = model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(s_pairs, m_pairs);
            }
            OpI::Clear => {
                sut.clear();
                model.clear();
                prop_assert_eq!(sut.capacity(), capacity_before);
            }
        }

        // Post-conditions after each op
        sut.assert_invariants();
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        // One power-of-two step at most.
        let c = sut.capacity();
        prop_assert!(
            c == capacity_before || c == capacity_before * 2 || c * 2 == capacity_before,
            "capacity jumped from {} to {}",
            capacity_before,
            c
        );
        prop_assert!(sut.load_factor() <= sut.upper_bound());
    }

    let keys: BTreeSet<_> = sut.keys().cloned().collect();
    prop_assert_eq!(keys.len(), sut.len());
    Ok(())
}

// Property: state-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - Duplicate inserts are rejected; insert_or_assign overwrites.
// - `len` matches the model and the sum of chain lengths after every op.
// - Every entry sits in `hash mod capacity`; capacity stays a power of two
//   and moves at most one step per op; growth restores `load <= upper`.
// - Snapshots yield exactly the model's pairs.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_scenario(ChainedHashMap::<Key, i32, DefaultHashBuilder>::default(), &pool, ops)?;
    }
}

// Constant hasher: every key shares a single chain.
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

// Property: the same invariants under worst-case collisions, which stresses
// chain scans and in-chain removal.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run_scenario(ChainedHashMap::with_hasher(ConstBuildHasher), &pool, ops)?;
    }
}

// Property: equality depends on contents only. The same pairs inserted in
// different orders into maps that end at different capacities compare
// equal; changing one value breaks equality.
proptest! {
    #[test]
    fn prop_equality_is_content_based(
        pairs in proptest::collection::btree_map(any::<i32>(), any::<i32>(), 1..80),
        extra in proptest::collection::vec(any::<i32>(), 0..60),
        seed in any::<u64>(),
    ) {
        let pairs: Vec<(i32, i32)> = pairs.into_iter().collect();
        let mut a: ChainedHashMap<i32, i32, BuildIdentityHasher> = pairs.iter().copied().collect();

        // Build `b` in a shuffled order, after growing it with throwaway keys.
        let mut order = pairs.clone();
        let mut s = seed;
        for i in (1..order.len()).rev() {
            s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
            order.swap(i, (s >> 33) as usize % (i + 1));
        }
        let mut b: ChainedHashMap<i32, i32, BuildIdentityHasher> = ChainedHashMap::default();
        let junk: Vec<i32> = extra.into_iter().filter(|k| !a.contains_key(k)).collect();
        for &k in &junk {
            b.insert(k, 0);
        }
        for &(k, v) in &order {
            b.insert(k, v);
        }
        for k in &junk {
            b.erase(k);
        }

        prop_assert!(a == b);
        prop_assert!(b == a);
        prop_assert!(a == a.clone());

        let (k0, v0) = pairs[0];
        *a.at_mut(&k0).unwrap() = v0.wrapping_add(1);
        prop_assert!(a != b);
        prop_assert!(b != a);
    }
}
