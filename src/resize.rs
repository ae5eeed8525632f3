//! Resize policy: when to double or halve the bucket array, and the rehash itself.
//!
//! A resize always moves capacity by exactly one power-of-two step. The new
//! bucket array is fully sized before any entry moves, so a failed
//! allocation leaves the old array untouched.

use crate::bucket::Bucket;
use crate::config::MapConfig;
use crate::error::MapError;
use crate::hasher::bucket_index;

/// Whether allocation failures are returned to the caller or handled the
/// way std collections handle them (abort on OOM, panic on overflow).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Fallibility {
    Fallible,
    Infallible,
}

impl Fallibility {
    #[inline]
    pub(crate) fn reserve<T>(self, v: &mut Vec<T>, additional: usize) -> Result<(), MapError> {
        match self {
            Fallibility::Fallible => v.try_reserve_exact(additional)?,
            Fallibility::Infallible => v.reserve_exact(additional),
        }
        Ok(())
    }

    #[inline]
    fn capacity_overflow(self) -> MapError {
        match self {
            Fallibility::Fallible => MapError::CapacityOverflow,
            Fallibility::Infallible => panic!("ChainedHashMap capacity overflow"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Resize {
    Grow,
    Shrink,
}

#[inline]
fn load(len: usize, capacity: usize) -> f64 {
    len as f64 / capacity as f64
}

/// Decision after an entry was added: grow once the load factor is strictly
/// above the upper bound.
pub(crate) fn after_insert(len: usize, capacity: usize, config: &MapConfig) -> Option<Resize> {
    (load(len, capacity) > config.upper_bound()).then_some(Resize::Grow)
}

/// Decision after an entry was removed: shrink when the load factor is
/// strictly below the lower bound and halving keeps at least one bucket.
pub(crate) fn after_remove(len: usize, capacity: usize, config: &MapConfig) -> Option<Resize> {
    (capacity > 1 && load(len, capacity) < config.lower_bound()).then_some(Resize::Shrink)
}

pub(crate) fn target_capacity(
    capacity: usize,
    resize: Resize,
    fallibility: Fallibility,
) -> Result<usize, MapError> {
    match resize {
        Resize::Grow => capacity
            .checked_mul(2)
            .ok_or_else(|| fallibility.capacity_overflow()),
        Resize::Shrink => Ok((capacity / 2).max(1)),
    }
}

/// A bucket array of `capacity` empty chains.
pub(crate) fn empty_buckets<K, V>(capacity: usize) -> Vec<Bucket<K, V>> {
    let mut buckets = Vec::with_capacity(capacity);
    buckets.resize_with(capacity, Bucket::default);
    buckets
}

/// Moves every entry of `buckets` into a fresh array of `new_capacity` chains,
/// placing each by its stored hash.
///
/// All allocation happens before the first entry moves; on `Err` the input
/// array is exactly as it was.
pub(crate) fn rehash<K, V>(
    buckets: &mut Vec<Bucket<K, V>>,
    new_capacity: usize,
    fallibility: Fallibility,
) -> Result<(), MapError> {
    debug_assert!(new_capacity.is_power_of_two());

    let mut counts: Vec<usize> = Vec::new();
    fallibility.reserve(&mut counts, new_capacity)?;
    counts.resize(new_capacity, 0);
    for entry in buckets.iter().flat_map(Bucket::iter) {
        counts[bucket_index(entry.hash, new_capacity)] += 1;
    }

    let mut fresh = Vec::new();
    fallibility.reserve(&mut fresh, new_capacity)?;
    for &n in &counts {
        let mut chain = Vec::new();
        fallibility.reserve(&mut chain, n)?;
        fresh.push(Bucket::with_entries(chain));
    }

    // Nothing below allocates.
    for bucket in buckets.iter_mut() {
        for entry in bucket.drain() {
            let i = bucket_index(entry.hash, new_capacity);
            fresh[i].push(entry);
        }
    }
    *buckets = fresh;
    Ok(())
}
