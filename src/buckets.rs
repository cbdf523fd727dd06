//! Bucket array: chain heads over the entry arena.
//!
//! Every chain link is an `EntryKey` into the arena. A bucket slot holds the
//! key of its head entry and each entry holds the key of its successor, so a
//! live entry is named by exactly one link. Functions here only rewire links;
//! they never call `K: Hash`, and only `probe` calls `K: Eq` (through the
//! caller's predicate).

use crate::entry::{Entry, EntryKey};
use slotmap::SlotMap;

pub(crate) type Arena<K, V> = SlotMap<EntryKey, Entry<K, V>>;

/// `|hash as i64| mod capacity`. `unsigned_abs` keeps `i64::MIN` in range.
#[inline]
pub(crate) fn bucket_index(hash: u64, capacity: usize) -> usize {
    debug_assert!(capacity > 0, "bucket array must not be empty");
    ((hash as i64).unsigned_abs() % capacity as u64) as usize
}

/// Outcome of walking one chain for a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Probe {
    Occupied {
        prev: Option<EntryKey>,
        key: EntryKey,
    },
    Vacant {
        tail: Option<EntryKey>,
    },
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Buckets {
    heads: Vec<Option<EntryKey>>,
}

impl Buckets {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            heads: vec![None; capacity.max(1)],
        }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.heads.len()
    }

    #[inline]
    pub(crate) fn index_for(&self, hash: u64) -> usize {
        bucket_index(hash, self.heads.len())
    }

    #[inline]
    pub(crate) fn head(&self, bucket: usize) -> Option<EntryKey> {
        self.heads[bucket]
    }

    pub(crate) fn chain<'a, K, V>(&self, arena: &'a Arena<K, V>, bucket: usize) -> Chain<'a, K, V> {
        Chain {
            arena,
            cur: self.heads[bucket],
        }
    }

    /// Walk `bucket` comparing the cached hash first, then `is_match`.
    pub(crate) fn probe<K, V, F>(
        &self,
        arena: &Arena<K, V>,
        bucket: usize,
        hash: u64,
        mut is_match: F,
    ) -> Probe
    where
        F: FnMut(&K) -> bool,
    {
        let mut prev = None;
        for (key, entry) in self.chain(arena, bucket) {
            if entry.hash == hash && is_match(&entry.key) {
                return Probe::Occupied { prev, key };
            }
            prev = Some(key);
        }
        Probe::Vacant { tail: prev }
    }

    pub(crate) fn tail<K, V>(&self, arena: &Arena<K, V>, bucket: usize) -> Option<EntryKey> {
        self.chain(arena, bucket).last().map(|(k, _)| k)
    }

    /// Predecessor of `key` within `bucket`: `Some(None)` for the head,
    /// `None` when the chain does not contain `key`.
    pub(crate) fn predecessor<K, V>(
        &self,
        arena: &Arena<K, V>,
        bucket: usize,
        key: EntryKey,
    ) -> Option<Option<EntryKey>> {
        let mut prev = None;
        for (k, _) in self.chain(arena, bucket) {
            if k == key {
                return Some(prev);
            }
            prev = Some(k);
        }
        None
    }

    /// Link an already-allocated entry after `tail` (or as the head).
    pub(crate) fn link_after<K, V>(
        &mut self,
        arena: &mut Arena<K, V>,
        bucket: usize,
        tail: Option<EntryKey>,
        key: EntryKey,
    ) {
        match tail {
            Some(t) => arena[t].next = Some(key),
            None => self.heads[bucket] = Some(key),
        }
    }

    /// Detach `key` (whose predecessor is `prev`) and free its arena slot.
    pub(crate) fn unlink<K, V>(
        &mut self,
        arena: &mut Arena<K, V>,
        bucket: usize,
        prev: Option<EntryKey>,
        key: EntryKey,
    ) -> Entry<K, V> {
        let entry = arena
            .remove(key)
            .expect("chain link must name a live entry");
        match prev {
            Some(p) => arena[p].next = entry.next,
            None => self.heads[bucket] = entry.next,
        }
        entry
    }

    /// Move every entry into a fresh array of `new_capacity` buckets.
    ///
    /// Entries keep their arena slots and cached hashes; only links are
    /// rewritten. Old buckets are scanned in ascending order and each chain
    /// front to back, appending at the target tail, so entries sharing a
    /// target bucket keep their relative order.
    pub(crate) fn rehome<K, V>(self, arena: &mut Arena<K, V>, new_capacity: usize) -> Buckets {
        let new_capacity = new_capacity.max(1);
        let mut heads: Vec<Option<EntryKey>> = vec![None; new_capacity];
        let mut tails: Vec<Option<EntryKey>> = vec![None; new_capacity];

        for head in self.heads {
            let mut cur = head;
            while let Some(k) = cur {
                let entry = &mut arena[k];
                cur = entry.next.take();
                let b = bucket_index(entry.hash, new_capacity);
                match tails[b] {
                    Some(t) => arena[t].next = Some(k),
                    None => heads[b] = Some(k),
                }
                tails[b] = Some(k);
            }
        }

        Buckets { heads }
    }
}

/// Front-to-back walk over one chain.
pub(crate) struct Chain<'a, K, V> {
    arena: &'a Arena<K, V>,
    cur: Option<EntryKey>,
}

impl<'a, K, V> Iterator for Chain<'a, K, V> {
    type Item = (EntryKey, &'a Entry<K, V>);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let key = self.cur?;
        let arena = self.arena;
        let entry = &arena[key];
        self.cur = entry.next;
        Some((key, entry))
    }
}
