// ChainedHashMap integration tests (public API only).
//
// Each test documents what behavior is being verified and which
// invariants are assumed or asserted. The core invariants exercised:
// - Sizing: 16 initial buckets, doubling above the upper bound and halving
//   below the lower bound, one step per operation.
// - Uniqueness: insert refuses duplicates; bulk construction overwrites.
// - Lookup contract: `at`/`bucket_size` fail with KeyNotFound on absent keys.
// - Copy/move: clones are deep; a taken map leaves an empty one behind.
// - Iteration: snapshots yield every pair exactly once.
// - Equality: content only, independent of capacity and insertion order.
use chained_hashmap::{BuildIdentityHasher, ChainedHashMap, MapConfig, MapError};

type IdMap<V> = ChainedHashMap<i32, V, BuildIdentityHasher>;

fn id_map_from<V>(keys: Vec<i32>, values: Vec<V>) -> Result<IdMap<V>, MapError> {
    ChainedHashMap::from_pairs_with_config(keys, values, MapConfig::default(), BuildIdentityHasher)
}

// Test: default construction.
// Verifies: empty, 16 buckets, zero load factor, default bounds.
#[test]
fn default_constructor() {
    let m: ChainedHashMap<u64, f64> = ChainedHashMap::new();
    assert_eq!(m.len(), 0);
    assert_eq!(m.capacity(), 16);
    assert_eq!(m.load_factor(), 0.0);
    assert!(m.is_empty());
    assert!(!m.contains_key(&0));
    assert_eq!(m.lower_bound(), 0.25);
    assert_eq!(m.upper_bound(), 0.75);
}

// Test: explicit bounds.
// Assumes: bounds must satisfy 0 < lower < upper < 1.
// Verifies: every violation is a ConfigError; valid bounds give an empty map.
#[test]
fn bounds_constructor() {
    type StringMap = ChainedHashMap<String, String>;
    for (lower, upper) in [(0.0, 1.0), (0.5, 0.2), (0.2, 1.1), (-1.0, 0.2), (0.5, 0.5)] {
        match StringMap::with_bounds(lower, upper) {
            Err(MapError::InvalidBounds { .. }) => {}
            other => panic!("({lower}, {upper}) accepted: {other:?}"),
        }
    }
    let m = StringMap::with_bounds(0.3, 0.7).unwrap();
    assert_eq!(m.len(), 0);
    assert_eq!(m.capacity(), 16);
    assert_eq!(m.load_factor(), 0.0);
    assert!(m.is_empty());
}

// Test: custom bounds drive the resize thresholds.
// Verifies: with upper 0.5 the 9th key doubles 16 buckets; with lower 0.4 the
// map halves as soon as the load drops under it.
#[test]
fn custom_bounds_move_thresholds() {
    let config = MapConfig::new().with_bounds(0.4, 0.5);
    let mut m: IdMap<()> = ChainedHashMap::with_config(config, BuildIdentityHasher).unwrap();
    for i in 0..8 {
        m.insert(i, ());
    }
    assert_eq!(m.capacity(), 16);
    m.insert(8, ());
    assert_eq!(m.capacity(), 32);
    // 9/32 is already below 0.4; the next removal halves once.
    m.erase(&0);
    assert_eq!(m.capacity(), 16);
    assert_eq!(m.len(), 8);
}

// Test: clone is a deep copy.
// Verifies: erasing from the source does not touch the copy.
#[test]
fn clone_is_independent() {
    let mut a: ChainedHashMap<u64, f64> = ChainedHashMap::new();
    a.insert(15, 2.0);
    let b = a.clone();
    assert_eq!(a.len(), 1);
    assert_eq!(a.len(), b.len());
    assert_eq!(a.capacity(), b.capacity());
    assert_eq!(a.load_factor(), b.load_factor());
    assert!(a.contains_key(&15));
    assert!(b.contains_key(&15));

    a.erase(&15);
    assert!(!a.contains_key(&15));
    assert!(b.contains_key(&15));
    assert_ne!(a.len(), b.len());
}

// Test: copy assignment semantics through clone/clone_from.
// Verifies: inserts into one side are invisible to the other; equality
// follows contents even when capacities differ.
#[test]
fn clone_from_and_equality_after_growth() {
    let mut b: IdMap<i32> = ChainedHashMap::with_config(
        MapConfig::new().with_bounds(0.2, 0.7),
        BuildIdentityHasher,
    )
    .unwrap();
    let mut a = b.clone();
    a.insert(0, 1);
    assert_eq!(b.at(&0), Err(MapError::KeyNotFound));
    b.insert(0, 1);
    assert_eq!(a, b);
    b.insert(1, 1);
    assert_ne!(a, b);
    assert_eq!(a.at(&1), Err(MapError::KeyNotFound));

    for i in 2..200 {
        a.insert(i, i);
    }
    a.clear();
    a.insert(0, 1);
    a.insert(1, 1);
    assert_eq!(a.capacity(), 512);
    assert_eq!(a.len(), b.len());
    assert_ne!(a.capacity(), b.capacity());
    assert_eq!(a, b);

    a.clear();
    a.clone_from(&b);
    assert_eq!(a, b);
    assert_eq!(a.capacity(), b.capacity());
}

// Test: bulk construction.
// Verifies: pairs are zipped positionally, capacity grows to fit, unequal
// lengths fail, repeated keys keep the last value, empty input is empty.
#[test]
fn from_pairs_constructor() {
    let keys = vec![0, 1, 2, 3];
    let values: Vec<String> = ["aa", "bb", "c", "d"].iter().map(|s| s.to_string()).collect();
    let h = id_map_from(keys.clone(), values.clone()).unwrap();
    assert_eq!(h.capacity(), 16);
    assert_eq!(h.len(), 4);
    for (k, v) in keys.iter().zip(&values) {
        assert!(h.contains_key(k));
        assert_eq!(h.at(k), Ok(v));
    }

    let vals: Vec<String> = ["aa", "bb", "c", "d", "e"].iter().map(|s| s.to_string()).collect();
    assert_eq!(
        id_map_from(keys.clone(), vals).unwrap_err(),
        MapError::LengthMismatch { keys: 4, values: 5 }
    );

    let keys: Vec<i32> = (0..100).collect();
    let values: Vec<String> = (0..100).map(|i| format!("v{i}")).collect();
    let s = id_map_from(keys.clone(), values.clone()).unwrap();
    assert_eq!(s.capacity(), 256);
    assert_eq!(s.len(), 100);
    for (k, v) in keys.iter().zip(&values) {
        assert_eq!(s.at(k), Ok(v));
    }

    let t = ChainedHashMap::from_pairs(vec![100; 100], keys).unwrap();
    assert_eq!(t.capacity(), 16);
    assert_eq!(t.len(), 1);
    assert_eq!(t.at(&100), Ok(&99));

    let r = ChainedHashMap::<i32, f64>::from_pairs(Vec::new(), Vec::new()).unwrap();
    assert_eq!(r.capacity(), 16);
    assert_eq!(r.len(), 0);
}

// Test: growth and shrink schedule with default bounds.
// Assumes: identity hashing is irrelevant here; only counts matter.
// Verifies: 12 keys fit in 16 buckets, the 13th doubles to 32; erasing
// walks capacity down 32 -> 16 -> 8 -> 4 -> 2, one halving per crossing.
#[test]
fn insert_and_erase_resize_schedule() {
    let mut h: ChainedHashMap<u32, String> = ChainedHashMap::new();
    assert!(h.insert(0, "a".into()));
    assert_eq!((h.capacity(), h.len()), (16, 1));

    assert!(!h.insert(0, "b".into()));
    assert_eq!((h.capacity(), h.len()), (16, 1));
    assert_eq!(h.at(&0).unwrap(), "a");

    for i in 1..=11 {
        assert!(h.insert(i, "b".into()));
        assert_eq!(h.capacity(), 16);
        assert_eq!(h.len(), i as usize + 1);
        assert_eq!(h.load_factor(), h.len() as f64 / h.capacity() as f64);
    }
    assert_eq!(h.load_factor(), 0.75);

    assert!(h.insert(12, "c".into()));
    assert_eq!((h.capacity(), h.len()), (32, 13));

    assert!(!h.erase(&15));
    assert_eq!((h.capacity(), h.len()), (32, 13));

    for i in 0..5 {
        assert!(h.erase(&i));
        assert_eq!((h.capacity(), h.len()), (32, 12 - i as usize));
    }
    for i in 5..9 {
        assert!(h.erase(&i));
        assert_eq!((h.capacity(), h.len()), (16, 12 - i as usize));
    }
    for i in 9..11 {
        assert!(h.erase(&i));
        assert_eq!((h.capacity(), h.len()), (8, 12 - i as usize));
    }
    assert!(h.erase(&11));
    assert_eq!((h.capacity(), h.len()), (4, 1));
    assert!(h.erase(&12));
    assert_eq!((h.capacity(), h.len()), (2, 0));
}

// Test: a single-bucket map never shrinks below one bucket.
#[test]
fn minimum_capacity_is_one() {
    let config = MapConfig::new().with_initial_capacity(1);
    let mut m: ChainedHashMap<&str, i32> =
        ChainedHashMap::with_config(config, Default::default()).unwrap();
    assert_eq!(m.capacity(), 1);
    m.insert("a", 1);
    assert_eq!(m.capacity(), 2);
    m.erase("a");
    assert_eq!(m.capacity(), 1);
    m.insert("b", 2);
    m.erase("b");
    m.erase("b");
    assert_eq!(m.capacity(), 1);
}

// Test: iteration over snapshots.
// Verifies: shared, mutable and owned iteration each see every pair once.
#[test]
fn iterators_visit_every_pair() {
    let keys: Vec<i32> = vec![0, 1, 2, 3];
    let values: Vec<i32> = vec![100, 101, 102, 103];
    let h = id_map_from(keys, values).unwrap();
    assert_eq!((&h).into_iter().count(), 4);

    let keys: Vec<i32> = (0..100).collect();
    let values: Vec<i32> = (100..200).collect();
    let mut s = id_map_from(keys.clone(), values.clone()).unwrap();

    let mut j = 0;
    for (k, v) in &s {
        assert_eq!(*k, keys[*k as usize]);
        assert_eq!(*v, values[(*v - 100) as usize]);
        j += 1;
    }
    assert_eq!(j, 100);

    for (_, v) in &mut s {
        *v += 1;
    }
    assert_eq!(s.at(&0), Ok(&101));

    let mut owned: Vec<(i32, i32)> = s.into_iter().collect();
    owned.sort();
    assert_eq!(owned.len(), 100);
    assert_eq!(owned[99], (99, 200));
}

// Test: cursor equality on snapshots.
// Verifies: two fresh snapshots of equal maps compare equal at the start
// and at the end; a snapshot of a bigger map never equals one of a smaller.
#[test]
fn snapshot_cursor_equality() {
    let a = id_map_from(vec![1, 2, 3], vec![1, 2, 3]).unwrap();
    let b = id_map_from(vec![3, 2, 1], vec![3, 2, 1]).unwrap();
    let c = id_map_from(vec![1, 2, 3, 4], vec![1, 2, 3, 4]).unwrap();

    let mut ia = a.iter();
    let mut ib = b.iter();
    assert!(ia == ib);
    ia.next();
    assert!(ia != ib);
    ib.next();
    assert!(ia == ib);
    ia.by_ref().for_each(drop);
    ib.by_ref().for_each(drop);
    assert!(ia.is_end() && ib.is_end());
    assert!(ia == ib);

    let mut ic = c.iter();
    ic.by_ref().for_each(drop);
    assert!(ia != ic);
}

// Test: bucket_size counts collisions.
// Assumes: identity hashing, 16 buckets, so key k lands in bucket k & 15.
// Verifies: KeyNotFound for absent keys; chain length otherwise.
#[test]
fn bucket_size_reports_chain_length() {
    let keys = vec![1, 2, 18, 3, 19, 35, 4, 20, 36, 52];
    let h = id_map_from(keys, vec![0; 10]).unwrap();
    assert_eq!(h.bucket_size(&0), Err(MapError::KeyNotFound));
    for i in 1..5 {
        assert_eq!(h.bucket_size(&i), Ok(i as usize));
    }
}

// Test: `at`, `at_mut`, `get_or_insert_default` and `get_or_default`.
// Verifies: reads, in-place writes, default insertion, and that erase makes
// `at` fail again.
#[test]
fn at_and_subscript() {
    let keys = vec![5, 233, 6238, 2100];
    let values: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
    let mut h = id_map_from(keys.clone(), values.clone()).unwrap();
    for (k, v) in keys.iter().zip(&values) {
        assert_eq!(h.at(k), Ok(v));
        assert_eq!(h.get_or_insert_default(*k), v);
        *h.at_mut(k).unwrap() = "foo".into();
        assert_eq!(h.at(k).unwrap(), "foo");
        *h.get_or_insert_default(*k) = "bar".into();
        assert_eq!(h.get_or_default(k), "bar");
    }
    assert_eq!(h.get_or_default(&4444), "");
    assert!(!h.contains_key(&4444));

    *h.get_or_insert_default(4444) = "a".into();
    assert_eq!(h.get_or_insert_default(4444), "a");
    assert_eq!(h.at(&4444).unwrap(), "a");
    h.erase(&4444);
    assert_eq!(h.at(&4444), Err(MapError::KeyNotFound));
}

// Test: equality operator.
// Verifies: content-based, symmetric, restored after reverting a change,
// unaffected by clear on both sides or by insertion order and collisions.
#[test]
fn compare() {
    let keys = vec![2100, 5, 233, 6238];
    let values: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
    let mut h = id_map_from(keys.clone(), values.clone()).unwrap();
    let mut s = id_map_from(keys, values).unwrap();
    assert!(h == s);
    assert!(!(h != s));

    *s.get_or_insert_default(5) = "e".into();
    assert!(h != s);
    *s.get_or_insert_default(5) = "b".into();
    assert!(h == s);
    *s.get_or_insert_default(6) = "t".into();
    assert!(h != s);
    *s.get_or_insert_default(21) = "k".into();
    *h.get_or_insert_default(21) = "k".into();
    *h.get_or_insert_default(6) = "t".into();
    assert!(h == s);

    s.clear();
    h.clear();
    assert!(h == s);

    // Same contents at different capacities are equal.
    for i in 0..4 {
        *h.get_or_insert_default(i) = i.to_string();
    }
    for i in 0..13 {
        *s.get_or_insert_default(i) = i.to_string();
    }
    s.clear();
    for i in 0..4 {
        *s.get_or_insert_default(i) = i.to_string();
    }
    assert_ne!(h.capacity(), s.capacity());
    assert!(h == s);

    let keys_a = vec![1, 2, 18, 3, 19, 35, 4, 20, 36, 52];
    let keys_b = vec![52, 36, 20, 4, 35, 19, 3, 18, 2, 1];
    let a = id_map_from(keys_a, vec![0; 10]).unwrap();
    let b = id_map_from(keys_b, vec![0; 10]).unwrap();
    assert_eq!(a, b);
    assert!(!(a != b));
}

// Test: moving out leaves an empty map behind.
#[test]
fn take_moves_contents() {
    let mut a: ChainedHashMap<String, i32> = ["x", "y"].iter().map(|k| (k.to_string(), 1)).collect();
    let b = std::mem::take(&mut a);
    assert!(a.is_empty());
    assert_eq!(a.capacity(), 16);
    assert_eq!(b.len(), 2);
    assert!(b.contains_key("x"));
}

// Test: the map can be shared across threads behind a mutex.
#[test]
fn usable_behind_a_mutex() {
    use std::sync::{Arc, Mutex};
    let shared: Arc<Mutex<ChainedHashMap<u32, u32>>> = Arc::default();
    let handles: Vec<_> = (0..4)
        .map(|t| {
            let shared = Arc::clone(&shared);
            std::thread::spawn(move || {
                for i in 0..25 {
                    shared.lock().unwrap().insert(t * 100 + i, i);
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    let m = shared.lock().unwrap();
    assert_eq!(m.len(), 100);
    assert_eq!(m.capacity(), 256);
}
