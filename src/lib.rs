//! chained-hashmap: a single-threaded, separate-chaining hash map whose
//! bucket array doubles and halves as its load factor crosses fixed bounds.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a small, inspectable hash table where capacity, load factor and
//!   per-bucket chain lengths are observable and follow a documented policy.
//! - Layers:
//!   - `hasher`: key -> `u64` digest via any `BuildHasher`, digest ->
//!     bucket index by masking with `capacity - 1`.
//!   - `bucket`: one growable chain of `(key, value, hash)` entries per slot.
//!   - `resize`: grow/shrink decisions and the all-or-nothing rehash.
//!   - `ChainedHashMap<K, V, S>`: public table tying the above together.
//!   - `Snapshot`: iterators that capture every pair at creation.
//!
//! Constraints
//! - Capacity is always a power of two, at least 1.
//! - Bounds are fixed at construction with `0 < lower < upper < 1`
//!   (defaults 0.25 / 0.75, 16 initial buckets).
//! - After an insert, `len / capacity > upper` triggers one doubling. After
//!   a removal, `len / capacity < lower` triggers one halving while more than
//!   one bucket remains. Exactly one step per operation.
//! - Keys are unique. `insert` refuses duplicates; bulk construction and
//!   `Extend` overwrite instead.
//!
//! Error policy
//! - Presence questions answer with `bool`/`Option` (`insert`, `erase`,
//!   `contains_key`, `get`).
//! - Broken preconditions return `MapError` (`at`, `bucket_size`, bad
//!   bounds, mismatched bulk input).
//! - `try_insert`/`try_remove` surface allocation failure during a resize as
//!   `MapError::AllocationFailure`; the rehash runs before the entry is
//!   linked or unlinked, so on error the map is exactly as before the call.
//!   The other entry points allocate like std collections do.
//!
//! Hasher and rehashing invariants
//! - Each entry stores its `u64` hash. Rehashing places entries by the stored
//!   hash and never calls `K: Hash` again.
//! - User `Hash`/`Eq` code only runs while probing a chain. A debug-only
//!   guard panics if that code calls back into the same map.
//!
//! Iteration
//! - `iter`, `iter_mut` and `into_iter` collect the pairs in bucket order at
//!   creation. Cursors compare equal by sequence length, position and
//!   current pair.
//!
//! Equality
//! - Content only: two maps are equal when they hold the same keys bound to
//!   equal values, whatever their capacities, bounds or insertion order.
//!
//! Notes and non-goals
//! - Single-threaded: the map is `Send` when its parts are but never
//!   `Sync`; share it behind a `Mutex`.
//! - No persistence format and no ordering between unrelated keys.

mod bucket;
mod chained_hash_map;
mod chained_hash_map_proptest;
pub mod config;
mod error;
pub mod hasher;
mod reentrancy;
mod resize;
pub mod snapshot;

// Public surface
pub use chained_hash_map::ChainedHashMap;
pub use config::MapConfig;
pub use error::MapError;
pub use hasher::{BuildIdentityHasher, DefaultHashBuilder};
pub use snapshot::{IntoIter, Iter, IterMut, Snapshot};
