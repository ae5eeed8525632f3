//! Construction-time configuration: initial bucket count and load factor bounds.

use crate::error::MapError;

/// Bucket count of a freshly constructed map.
pub const DEFAULT_CAPACITY: usize = 16;
pub const DEFAULT_LOWER_BOUND: f64 = 0.25;
pub const DEFAULT_UPPER_BOUND: f64 = 0.75;

/// Thresholds and starting size for a `ChainedHashMap`.
///
/// The bounds are fixed for the lifetime of the map. `initial_capacity` is
/// only a starting point; the map doubles and halves it as entries come and go.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MapConfig {
    initial_capacity: usize,
    lower_bound: f64,
    upper_bound: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY,
            lower_bound: DEFAULT_LOWER_BOUND,
            upper_bound: DEFAULT_UPPER_BOUND,
        }
    }
}

impl MapConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with at least `capacity` buckets, rounded up to a power of two.
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity.max(1).checked_next_power_of_two().unwrap_or(
            // Largest power of two representable in usize.
            1 << (usize::BITS - 1),
        );
        self
    }

    /// Replace both load factor bounds. Validated by `validate`.
    pub fn with_bounds(mut self, lower: f64, upper: f64) -> Self {
        self.lower_bound = lower;
        self.upper_bound = upper;
        self
    }

    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }
    pub fn lower_bound(&self) -> f64 {
        self.lower_bound
    }
    pub fn upper_bound(&self) -> f64 {
        self.upper_bound
    }

    /// Checks `0 < lower < upper < 1`. NaN fails every comparison and is rejected.
    pub fn validate(&self) -> Result<(), MapError> {
        let (lower, upper) = (self.lower_bound, self.upper_bound);
        if 0.0 < lower && lower < upper && upper < 1.0 {
            Ok(())
        } else {
            Err(MapError::InvalidBounds { lower, upper })
        }
    }
}
