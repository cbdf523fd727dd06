//! Cursor: external traversal that can remove the entry it just yielded.
//!
//! The cursor holds the map's unique borrow, so the only structural change
//! possible during a traversal is its own `remove`. It never caches a
//! predecessor link: removal re-walks the owning bucket from its head.

use crate::chained_hash_map::ChainedHashMap;
use crate::entry::EntryKey;
use crate::error::CursorError;
use log::trace;

/// Where a [`Cursor`] stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// No entry has been yielded yet.
    NotStarted,
    /// The last `next()` yielded an entry.
    Positioned,
    /// A lookahead found no further entry.
    Exhausted,
}

#[derive(Debug, Clone, Copy)]
struct Yielded {
    bucket: usize,
    key: EntryKey,
}

/// Walks a [`ChainedHashMap`] in bucket order (bucket 0 first, chain order
/// within a bucket) and supports removing the most recently yielded entry.
///
/// ```
/// use chained_hashmap::{ChainedHashMap, CursorError};
///
/// let mut map: ChainedHashMap<u32, &str> = ChainedHashMap::new();
/// map.put(1, "one");
/// map.put(2, "two");
///
/// let mut cursor = map.cursor();
/// assert_eq!(cursor.remove(), Err(CursorError::IllegalState));
/// while cursor.has_next() {
///     let (k, _) = cursor.next()?;
///     if *k == 1 {
///         cursor.remove()?;
///     }
/// }
/// assert_eq!(cursor.next().err(), Some(CursorError::Exhausted));
/// assert_eq!(map.len(), 1);
/// # Ok::<(), CursorError>(())
/// ```
pub struct Cursor<'a, K, V, S> {
    map: &'a mut ChainedHashMap<K, V, S>,
    // Next bucket to scan. While `pending` is set it lives in `scan - 1`.
    scan: usize,
    pending: Option<EntryKey>,
    // Present only while a `remove()` is legal.
    last: Option<Yielded>,
    state: CursorState,
}

impl<'a, K, V, S> Cursor<'a, K, V, S> {
    pub(crate) fn new(map: &'a mut ChainedHashMap<K, V, S>) -> Self {
        Self {
            map,
            scan: 0,
            pending: None,
            last: None,
            state: CursorState::NotStarted,
        }
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    /// Whether `next()` would yield. Skips empty buckets as a side effect;
    /// calling it repeatedly does not advance past an available entry.
    pub fn has_next(&mut self) -> bool {
        let buckets = &self.map.buckets;
        while self.pending.is_none() && self.scan < buckets.capacity() {
            self.pending = buckets.head(self.scan);
            self.scan += 1;
        }
        if self.pending.is_none() {
            self.state = CursorState::Exhausted;
        }
        self.pending.is_some()
    }

    /// Yield the next entry and make `remove()` legal for it.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<(&K, &mut V), CursorError> {
        if !self.has_next() {
            return Err(CursorError::Exhausted);
        }
        let Some(key) = self.pending else {
            return Err(CursorError::Exhausted);
        };
        let entry = &mut self.map.slots[key];
        self.pending = entry.next;
        self.last = Some(Yielded {
            bucket: self.scan - 1,
            key,
        });
        self.state = CursorState::Positioned;
        Ok((&entry.key, &mut entry.value))
    }

    /// Unlink the entry returned by the latest `next()` and hand it back.
    ///
    /// Fails with [`CursorError::IllegalState`] before the first `next()` and
    /// on a second call for the same `next()`.
    pub fn remove(&mut self) -> Result<(K, V), CursorError> {
        let Yielded { bucket, key } = self.last.take().ok_or(CursorError::IllegalState)?;
        let map = &mut *self.map;
        let prev = map
            .buckets
            .predecessor(&map.slots, bucket, key)
            .expect("yielded entry stays linked in its bucket until removed");
        let entry = map.buckets.unlink(&mut map.slots, bucket, prev, key);
        trace!(
            "cursor removed entry from bucket {} ({} left)",
            bucket,
            map.slots.len()
        );
        Ok(entry.into_pair())
    }
}
