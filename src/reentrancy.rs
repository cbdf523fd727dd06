//! Debug-only guard against re-entering the map from user `Hash`/`Eq` code.
//!
//! While a chain is being walked or rewired, the only user code that runs is
//! `K: Hash` and `K: Eq`. If one of those reaches back into the same map
//! (only possible through raw pointers or interior mutability), it would
//! observe half-linked chains. Debug builds record the operation in progress
//! and panic on a nested entry, naming both operations. Release builds
//! compile the guard away.

use core::cell::Cell;
use core::marker::PhantomData;

#[derive(Debug, Default)]
pub(crate) struct DebugReentrancy {
    #[cfg(debug_assertions)]
    active: Cell<Option<&'static str>>,
    // !Sync in every build profile, matching the single-threaded contract.
    _nosync: PhantomData<Cell<()>>,
}

impl DebugReentrancy {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            active: Cell::new(None),
            _nosync: PhantomData,
        }
    }

    /// Mark `op` as in progress until the returned guard drops.
    #[inline]
    pub(crate) fn enter(&self, op: &'static str) -> ReentrancyGuard<'_> {
        #[cfg(debug_assertions)]
        {
            if let Some(current) = self.active.get() {
                panic!("reentrant call into `{op}` while `{current}` is in progress");
            }
            self.active.set(Some(op));
            ReentrancyGuard { owner: self }
        }

        #[cfg(not(debug_assertions))]
        {
            let _ = op;
            ReentrancyGuard { _z: PhantomData }
        }
    }

    #[cfg(all(test, debug_assertions))]
    fn current(&self) -> Option<&'static str> {
        self.active.get()
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
