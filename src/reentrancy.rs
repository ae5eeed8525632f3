//! Debug-only guard against re-entrant calls into a map.
//!
//! Lookups and mutations call user `Hash` and `Eq` impls while a chain is
//! being probed. A user impl that reaches back into the same map at that
//! point would observe (or cause) a half-finished update. In debug builds the
//! guard panics on such nesting and names both operations; in release builds
//! it compiles away.

use core::cell::Cell;
use core::marker::PhantomData;

#[derive(Debug, Default)]
pub(crate) struct DebugReentrancy {
    #[cfg(debug_assertions)]
    active: Cell<Option<&'static str>>,
    // `!Sync` in every build profile; `Send` stays available so a map can
    // live behind a `Mutex`.
    _not_sync: PhantomData<Cell<()>>,
}

impl Clone for DebugReentrancy {
    // A cloned map starts outside any operation.
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl DebugReentrancy {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            active: Cell::new(None),
            _not_sync: PhantomData,
        }
    }

    /// Marks `op` as running until the returned guard drops.
    #[inline]
    pub(crate) fn enter(&self, op: &'static str) -> ReentrancyGuard<'_> {
        #[cfg(debug_assertions)]
        {
            if let Some(outer) = self.active.get() {
                panic!("reentrant call: `{op}` entered while `{outer}` is running on the same map");
            }
            self.active.set(Some(op));
            return ReentrancyGuard { owner: self };
        }

        #[cfg(not(debug_assertions))]
        {
            let _ = op;
            return ReentrancyGuard { _z: PhantomData };
        }
    }

    #[cfg(test)]
    pub(crate) fn is_active(&self) -> bool {
        #[cfg(debug_assertions)]
        {
            return self.active.get().is_some();
        }
        #[cfg(not(debug_assertions))]
        {
            return false;
        }
    }
}

pub(crate) struct ReentrancyGuard<'a> {
    #[cfg(debug_assertions)]
    owner: &'a DebugReentrancy,
    #[cfg(not(debug_assertions))]
    _z: PhantomData<&'a ()>,
}

impl Drop for ReentrancyGuard<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        self.owner.active.set(None);
    }
}
