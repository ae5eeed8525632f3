//! Snapshot iterators.
//!
//! A `Snapshot` collects every pair of the map, bucket by bucket, at the
//! moment it is created and then walks that fixed sequence with a cursor.
//! Borrowed snapshots (`Iter`, `IterMut`) hold the map borrow for their whole
//! life, so the map cannot change underneath them. `IntoIter` owns its pairs
//! and is unaffected by anything done to the map afterwards.

use core::fmt;
use core::iter::FusedIterator;

/// Fixed sequence of items with a forward cursor.
pub struct Snapshot<T> {
    items: std::vec::IntoIter<T>,
    total: usize,
}

/// Shared pairs, in bucket order.
pub type Iter<'a, K, V> = Snapshot<(&'a K, &'a V)>;

/// Pairs with mutable values, in bucket order.
pub type IterMut<'a, K, V> = Snapshot<(&'a K, &'a mut V)>;

/// Owned pairs, in bucket order.
pub type IntoIter<K, V> = Snapshot<(K, V)>;

impl<T> Snapshot<T> {
    pub(crate) fn new(items: Vec<T>) -> Self {
        let total = items.len();
        Self {
            items: items.into_iter(),
            total,
        }
    }

    /// Item under the cursor, or `None` at the end.
    pub fn peek(&self) -> Option<&T> {
        self.items.as_slice().first()
    }

    /// Number of items already yielded.
    pub fn position(&self) -> usize {
        self.total - self.items.len()
    }

    /// Length of the whole captured sequence, independent of the cursor.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_end(&self) -> bool {
        self.items.len() == 0
    }
}

impl<T> Iterator for Snapshot<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.items.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.items.size_hint()
    }
}

impl<T> ExactSizeIterator for Snapshot<T> {}
impl<T> FusedIterator for Snapshot<T> {}

/// Two cursors are equal when their captured sequences have the same length,
/// they sit at the same position, and (unless both are at the end) the items
/// under them are equal.
impl<T: PartialEq> PartialEq for Snapshot<T> {
    fn eq(&self, other: &Self) -> bool {
        self.total == other.total
            && self.position() == other.position()
            && self.peek() == other.peek()
    }
}

impl<T: fmt::Debug> fmt::Debug for Snapshot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("position", &self.position())
            .field("total", &self.total)
            .field("remaining", &self.items.as_slice())
            .finish()
    }
}
