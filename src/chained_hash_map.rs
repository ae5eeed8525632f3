//! ChainedHashMap: separate-chaining table with load-factor driven resizing.

use crate::bucket::{Bucket, Entry};
use crate::config::MapConfig;
use crate::error::MapError;
use crate::hasher::{bucket_index, hash_key, DefaultHashBuilder};
use crate::reentrancy::DebugReentrancy;
use crate::resize::{self, Fallibility, Resize};
use crate::snapshot::{IntoIter, Iter, IterMut, Snapshot};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};

/// Hash map storing each key in the chain at `hash(key) mod capacity`.
///
/// Capacity is a power of two. After an insert pushes the load factor above
/// the upper bound the bucket array doubles; after a removal drops it below
/// the lower bound it halves (never below one bucket).
#[derive(Clone)]
pub struct ChainedHashMap<K, V, S = DefaultHashBuilder> {
    hasher: S,
    buckets: Vec<Bucket<K, V>>,
    len: usize,
    config: MapConfig,
    reentrancy: DebugReentrancy,
}

/// Where a key lives, or would live, in the current bucket array.
#[derive(Copy, Clone, Debug)]
struct Slot {
    hash: u64,
    index: usize,
    pos: Option<usize>,
}

// Infallible paths either succeed or abort/panic inside `Fallibility`.
#[inline]
fn infallible<T>(r: Result<T, MapError>) -> T {
    match r {
        Ok(t) => t,
        Err(e) => unreachable!("infallible allocation reported an error: {e}"),
    }
}

impl<K, V> ChainedHashMap<K, V> {
    /// Empty map with 16 buckets and bounds `0.25 < load < 0.75`.
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }

    pub fn with_bounds(lower: f64, upper: f64) -> Result<Self, MapError> {
        Self::with_config(
            MapConfig::new().with_bounds(lower, upper),
            DefaultHashBuilder::default(),
        )
    }
}

impl<K, V> ChainedHashMap<K, V>
where
    K: Eq + Hash,
{
    /// Builds a map from `keys[i] -> values[i]`.
    ///
    /// A key repeated in `keys` ends up bound to the value paired with its
    /// last occurrence.
    pub fn from_pairs(keys: Vec<K>, values: Vec<V>) -> Result<Self, MapError> {
        Self::from_pairs_with_config(keys, values, MapConfig::default(), Default::default())
    }
}

impl<K, V, S: Default> Default for ChainedHashMap<K, V, S> {
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> ChainedHashMap<K, V, S> {
    pub fn with_hasher(hasher: S) -> Self {
        let config = MapConfig::default();
        Self {
            hasher,
            buckets: resize::empty_buckets(config.initial_capacity()),
            len: 0,
            config,
            reentrancy: DebugReentrancy::new(),
        }
    }

    /// Empty map using `config`; fails if its bounds are not `0 < lower < upper < 1`.
    pub fn with_config(config: MapConfig, hasher: S) -> Result<Self, MapError> {
        config.validate()?;
        Ok(Self {
            hasher,
            buckets: resize::empty_buckets(config.initial_capacity()),
            len: 0,
            config,
            reentrancy: DebugReentrancy::new(),
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of buckets.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.capacity() as f64
    }

    pub fn lower_bound(&self) -> f64 {
        self.config.lower_bound()
    }
    pub fn upper_bound(&self) -> f64 {
        self.config.upper_bound()
    }
    pub fn config(&self) -> &MapConfig {
        &self.config
    }
    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Drops every entry. Capacity is left as it is.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.len = 0;
    }

    /// Snapshot of all pairs in bucket order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Snapshot::new(
            self.entries()
                .map(|e| (&e.key, &e.value))
                .collect(),
        )
    }

    /// Snapshot of all pairs in bucket order, values writable.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        Snapshot::new(
            self.buckets
                .iter_mut()
                .flat_map(Bucket::iter_mut)
                .map(|e| {
                    let Entry { key, value, .. } = e;
                    (&*key, value)
                })
                .collect(),
        )
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.entries().map(|e| &e.key)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.entries().map(|e| &e.value)
    }

    fn entries(&self) -> impl Iterator<Item = &Entry<K, V>> + '_ {
        self.buckets.iter().flat_map(Bucket::iter)
    }
}

impl<K, V, S> ChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// See [`ChainedHashMap::from_pairs`].
    pub fn from_pairs_with_config(
        keys: Vec<K>,
        values: Vec<V>,
        config: MapConfig,
        hasher: S,
    ) -> Result<Self, MapError> {
        if keys.len() != values.len() {
            return Err(MapError::LengthMismatch {
                keys: keys.len(),
                values: values.len(),
            });
        }
        let mut map = Self::with_config(config, hasher)?;
        map.extend(keys.into_iter().zip(values));
        Ok(map)
    }

    /// Hashes `q` and scans its chain. The only place user `Hash`/`Eq` run.
    fn locate<Q>(&self, op: &'static str, q: &Q) -> Slot
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter(op);
        let hash = hash_key(&self.hasher, q);
        let index = bucket_index(hash, self.capacity());
        let pos = self.buckets[index].position(hash, q);
        Slot { hash, index, pos }
    }

    fn apply(&mut self, resize: Resize, fallibility: Fallibility) -> Result<(), MapError> {
        let from = self.capacity();
        let to = resize::target_capacity(from, resize, fallibility)?;
        match resize::rehash(&mut self.buckets, to, fallibility) {
            Ok(()) => {
                tracing::debug!(from, to, len = self.len, ?resize, "rehashed chained hash map");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(from, to, len = self.len, error = %e, "rehash failed, keeping capacity");
                Err(e)
            }
        }
    }

    /// Links a key known to be absent. Grows first if the new entry would
    /// push the load factor over the upper bound, so a failed rehash leaves
    /// the map untouched. Returns the entry's `(bucket, position)`.
    fn push_new(
        &mut self,
        hash: u64,
        key: K,
        value: V,
        fallibility: Fallibility,
    ) -> Result<(usize, usize), MapError> {
        if let Some(r) = resize::after_insert(self.len + 1, self.capacity(), &self.config) {
            self.apply(r, fallibility)?;
        }
        let index = bucket_index(hash, self.capacity());
        let bucket = &mut self.buckets[index];
        if fallibility == Fallibility::Fallible {
            bucket.try_reserve_one()?;
        }
        bucket.push(Entry { key, value, hash });
        self.len += 1;
        Ok((index, bucket.len() - 1))
    }

    fn insert_with_fallibility(
        &mut self,
        key: K,
        value: V,
        fallibility: Fallibility,
    ) -> Result<bool, MapError> {
        let slot = self.locate("insert", &key);
        if slot.pos.is_some() {
            return Ok(false);
        }
        self.push_new(slot.hash, key, value, fallibility)?;
        Ok(true)
    }

    fn remove_with_fallibility<Q>(
        &mut self,
        q: &Q,
        fallibility: Fallibility,
    ) -> Result<Option<V>, MapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let mut slot = self.locate("remove", q);
        if slot.pos.is_none() {
            return Ok(None);
        }
        // Shrink while the entry is still linked; a failed rehash then
        // leaves the map exactly as it was.
        if let Some(r) = resize::after_remove(self.len - 1, self.capacity(), &self.config) {
            self.apply(r, fallibility)?;
            slot = self.locate("remove", q);
        }
        let Some(pos) = slot.pos else {
            return Ok(None);
        };
        let entry = self.buckets[slot.index].remove(pos);
        self.len -= 1;
        Ok(Some(entry.value))
    }

    /// Adds `key -> value` unless `key` is already present. Returns `false`
    /// (dropping both arguments) on a duplicate; the stored value is kept.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        infallible(self.insert_with_fallibility(key, value, Fallibility::Infallible))
    }

    /// Like [`insert`](Self::insert) but reports a failed growth instead of
    /// aborting. On `Err` the map is unchanged.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<bool, MapError> {
        self.insert_with_fallibility(key, value, Fallibility::Fallible)
    }

    /// Inserts, or overwrites the value of an existing key. Returns the
    /// previous value.
    pub fn insert_or_assign(&mut self, key: K, value: V) -> Option<V> {
        let slot = self.locate("insert_or_assign", &key);
        match slot.pos {
            Some(pos) => Some(core::mem::replace(
                &mut self.buckets[slot.index].get_mut(pos).value,
                value,
            )),
            None => {
                infallible(self.push_new(slot.hash, key, value, Fallibility::Infallible));
                None
            }
        }
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.locate("contains_key", q).pos.is_some()
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let slot = self.locate("get", q);
        slot.pos.map(|pos| &self.buckets[slot.index].get(pos).value)
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let slot = self.locate("get_mut", q);
        slot.pos
            .map(|pos| &mut self.buckets[slot.index].get_mut(pos).value)
    }

    /// Value stored for `q`; `KeyNotFound` when absent.
    pub fn at<Q>(&self, q: &Q) -> Result<&V, MapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(q).ok_or(MapError::KeyNotFound)
    }

    pub fn at_mut<Q>(&mut self, q: &Q) -> Result<&mut V, MapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get_mut(q).ok_or(MapError::KeyNotFound)
    }

    /// Mutable access to the value of `key`, inserting `V::default()` first
    /// if the key is absent (which may grow the map).
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        let slot = self.locate("get_or_insert_default", &key);
        let (index, pos) = match slot.pos {
            Some(pos) => (slot.index, pos),
            None => infallible(self.push_new(
                slot.hash,
                key,
                V::default(),
                Fallibility::Infallible,
            )),
        };
        &mut self.buckets[index].get_mut(pos).value
    }

    /// Copy of the value for `q`, or `V::default()` if absent. Never inserts.
    pub fn get_or_default<Q>(&self, q: &Q) -> V
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Clone + Default,
    {
        self.get(q).cloned().unwrap_or_default()
    }

    /// Removes `q` and returns its value. May halve the bucket array.
    pub fn remove<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        infallible(self.remove_with_fallibility(q, Fallibility::Infallible))
    }

    /// Like [`remove`](Self::remove) but reports a failed shrink instead of
    /// aborting. On `Err` the entry is still present.
    pub fn try_remove<Q>(&mut self, q: &Q) -> Result<Option<V>, MapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_with_fallibility(q, Fallibility::Fallible)
    }

    /// `true` if `q` was present and has been removed.
    pub fn erase<Q>(&mut self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove(q).is_some()
    }

    /// Length of the chain holding `q`, counting every key that collides
    /// with it. `KeyNotFound` when `q` is absent.
    pub fn bucket_size<Q>(&self, q: &Q) -> Result<usize, MapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let slot = self.locate("bucket_size", q);
        slot.pos
            .map(|_| self.buckets[slot.index].len())
            .ok_or(MapError::KeyNotFound)
    }
}

#[cfg(test)]
impl<K, V, S> ChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Panics unless the structural invariants hold: power-of-two capacity,
    /// `len` equal to the sum of chain lengths, every entry in the bucket its
    /// stored hash selects, that hash matching a fresh one, and no key twice.
    pub(crate) fn assert_invariants(&self) {
        let capacity = self.capacity();
        assert!(capacity.is_power_of_two(), "capacity {capacity}");
        let total: usize = self.buckets.iter().map(Bucket::len).sum();
        assert_eq!(total, self.len, "len out of sync with chains");
        for (i, bucket) in self.buckets.iter().enumerate() {
            for e in bucket.iter() {
                assert_eq!(bucket_index(e.hash, capacity), i, "entry in wrong bucket");
                assert_eq!(hash_key(&self.hasher, &e.key), e.hash, "stale stored hash");
                let copies = bucket.iter().filter(|o| o.key == e.key).count();
                assert_eq!(copies, 1, "duplicate key in chain");
            }
        }
    }
}

/// Content equality: same keys, each bound to an equal value. Capacity,
/// bounds and bucket layout are ignored.
impl<K, V, S> PartialEq for ChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        // Keys are unique on both sides, so equal sizes plus every pair of
        // `self` found in `other` means the contents match.
        self.len == other.len
            && self
                .entries()
                .all(|e| other.get(&e.key).map_or(false, |v| *v == e.value))
    }
}

impl<K, V, S> Eq for ChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    V: Eq,
    S: BuildHasher,
{
}

impl<K, V, S> fmt::Debug for ChainedHashMap<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries().map(|e| (&e.key, &e.value)))
            .finish()
    }
}

/// Insert-or-assign for every pair, later pairs winning.
impl<K, V, S> Extend<(K, V)> for ChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert_or_assign(k, v);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for ChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::with_hasher(S::default());
        map.extend(iter);
        map
    }
}

impl<K, V, S> IntoIterator for ChainedHashMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        Snapshot::new(
            self.buckets
                .into_iter()
                .flat_map(Bucket::into_entries)
                .map(|e| (e.key, e.value))
                .collect(),
        )
    }
}

impl<'a, K, V, S> IntoIterator for &'a ChainedHashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut ChainedHashMap<K, V, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
