//! Hasher adapter: turns keys into `u64` digests and digests into bucket indices.
//!
//! The map is generic over any `BuildHasher`. The default is hashbrown's
//! `DefaultHashBuilder` (aHash, randomly seeded per map). `BuildIdentityHasher`
//! is provided for integer keys when a predictable bucket layout is wanted.

use core::hash::{BuildHasher, Hash, Hasher};

pub use hashbrown::hash_map::DefaultHashBuilder;

#[inline]
pub(crate) fn hash_key<S, Q>(hasher: &S, key: &Q) -> u64
where
    S: BuildHasher,
    Q: ?Sized + Hash,
{
    hasher.hash_one(key)
}

/// `hash mod capacity` for a power-of-two `capacity`.
#[inline]
pub(crate) fn bucket_index(hash: u64, capacity: usize) -> usize {
    debug_assert!(capacity.is_power_of_two());
    (hash & (capacity as u64 - 1)) as usize
}

/// Builds `IdentityHasher`s. Stateless, so every map sees the same digests.
#[derive(Copy, Clone, Debug, Default)]
pub struct BuildIdentityHasher;

impl BuildHasher for BuildIdentityHasher {
    type Hasher = IdentityHasher;
    fn build_hasher(&self) -> Self::Hasher {
        IdentityHasher::default()
    }
}

/// A lone integer hashes to its own (sign-extended) value. Byte streams and
/// any further writes after the first are folded in with FNV-1a.
#[derive(Clone, Debug)]
pub struct IdentityHasher {
    state: u64,
    written: bool,
}

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

impl Default for IdentityHasher {
    fn default() -> Self {
        Self {
            state: FNV_OFFSET,
            written: false,
        }
    }
}

impl IdentityHasher {
    #[inline]
    fn write_int(&mut self, value: u64, bytes: &[u8]) {
        if self.written {
            self.write(bytes);
        } else {
            self.state = value;
            self.written = true;
        }
    }
}

impl Hasher for IdentityHasher {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.state ^= u64::from(b);
            self.state = self.state.wrapping_mul(FNV_PRIME);
        }
        self.written = true;
    }

    fn write_u8(&mut self, i: u8) {
        self.write_int(i as u64, &i.to_le_bytes());
    }
    fn write_u16(&mut self, i: u16) {
        self.write_int(i as u64, &i.to_le_bytes());
    }
    fn write_u32(&mut self, i: u32) {
        self.write_int(i as u64, &i.to_le_bytes());
    }
    fn write_u64(&mut self, i: u64) {
        self.write_int(i, &i.to_le_bytes());
    }
    fn write_usize(&mut self, i: usize) {
        self.write_int(i as u64, &i.to_le_bytes());
    }
    fn write_i8(&mut self, i: i8) {
        self.write_int(i as u64, &i.to_le_bytes());
    }
    fn write_i16(&mut self, i: i16) {
        self.write_int(i as u64, &i.to_le_bytes());
    }
    fn write_i32(&mut self, i: i32) {
        self.write_int(i as u64, &i.to_le_bytes());
    }
    fn write_i64(&mut self, i: i64) {
        self.write_int(i as u64, &i.to_le_bytes());
    }
    fn write_isize(&mut self, i: isize) {
        self.write_int(i as u64, &i.to_le_bytes());
    }
}
