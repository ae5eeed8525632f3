//! Error kinds reported by `ChainedHashMap`.
//!
//! Absence and duplication are not errors: `insert`, `erase` and
//! `contains_key` answer with a `bool`. `MapError` is reserved for broken
//! preconditions (bad thresholds, mismatched bulk input, lookups of keys the
//! caller promised were present) and for allocation failures surfaced by the
//! `try_*` entry points.

use std::collections::TryReserveError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MapError {
    /// Thresholds must satisfy `0 < lower < upper < 1`.
    #[error("invalid load factor bounds: need 0 < lower ({lower}) < upper ({upper}) < 1")]
    InvalidBounds { lower: f64, upper: f64 },

    #[error("bulk construction needs equally long inputs, got {keys} keys and {values} values")]
    LengthMismatch { keys: usize, values: usize },

    #[error("key not found")]
    KeyNotFound,

    /// The bucket array could not be reallocated; the map keeps its old capacity.
    #[error("bucket storage allocation failed: {0}")]
    AllocationFailure(#[from] TryReserveError),

    #[error("bucket count overflowed usize")]
    CapacityOverflow,
}
