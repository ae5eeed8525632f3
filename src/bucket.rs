//! Bucket store: one chain of entries per hash slot.

use core::borrow::Borrow;
use std::collections::TryReserveError;

#[derive(Debug, Clone)]
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    // Digest computed once on insertion; rehashing reuses it instead of
    // calling back into `K: Hash`.
    pub(crate) hash: u64,
}

/// Entries whose hash maps to the same slot, in insertion order.
///
/// Chains are expected to be short, so lookups are linear scans.
#[derive(Debug, Clone)]
pub(crate) struct Bucket<K, V> {
    entries: Vec<Entry<K, V>>,
}

impl<K, V> Default for Bucket<K, V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K, V> Bucket<K, V> {
    pub(crate) fn with_entries(entries: Vec<Entry<K, V>>) -> Self {
        Self { entries }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub(crate) fn push(&mut self, entry: Entry<K, V>) {
        self.entries.push(entry);
    }

    /// Makes room for one more entry without aborting on allocation failure.
    pub(crate) fn try_reserve_one(&mut self) -> Result<(), TryReserveError> {
        self.entries.try_reserve(1)
    }

    /// Position of `q` in this chain. Only entries with a matching digest are
    /// compared with `Eq`.
    pub(crate) fn position<Q>(&self, hash: u64, q: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        self.entries
            .iter()
            .position(|e| e.hash == hash && e.key.borrow() == q)
    }

    #[inline]
    pub(crate) fn get(&self, pos: usize) -> &Entry<K, V> {
        &self.entries[pos]
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, pos: usize) -> &mut Entry<K, V> {
        &mut self.entries[pos]
    }

    /// Removes the entry at `pos`, keeping the remaining insertion order.
    pub(crate) fn remove(&mut self, pos: usize) -> Entry<K, V> {
        self.entries.remove(pos)
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn iter(&self) -> core::slice::Iter<'_, Entry<K, V>> {
        self.entries.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> core::slice::IterMut<'_, Entry<K, V>> {
        self.entries.iter_mut()
    }

    pub(crate) fn drain(&mut self) -> std::vec::Drain<'_, Entry<K, V>> {
        self.entries.drain(..)
    }

    pub(crate) fn into_entries(self) -> Vec<Entry<K, V>> {
        self.entries
    }
}
