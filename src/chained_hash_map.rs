//! ChainedHashMap: separate-chaining table over an entry arena.

use crate::buckets::{Arena, Buckets, Probe};
use crate::config::{self, DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR};
use crate::cursor::Cursor;
use crate::entry::{Entry, EntryKey};
use crate::reentrancy::DebugReentrancy;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::iter::FusedIterator;
use core::mem;
use hashbrown::hash_map::DefaultHashBuilder;
use log::debug;
use slotmap::SlotMap;

/// A hash map whose buckets are singly linked chains of entries.
///
/// Entries are placed by `|hash| mod capacity` and appended at the tail of
/// their chain. Once `len` reaches `ceil(capacity * load_factor)`, the next
/// new key doubles the bucket array and every entry is rehomed using its
/// cached hash.
pub struct ChainedHashMap<K, V, S = DefaultHashBuilder> {
    hasher: S,
    pub(crate) buckets: Buckets,
    pub(crate) slots: Arena<K, V>,
    load_factor: f64,
    grow_at: usize,
    reentrancy: DebugReentrancy,
}

impl<K, V> ChainedHashMap<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, DefaultHashBuilder::default())
    }
}

impl<K, V, S> Default for ChainedHashMap<K, V, S>
where
    S: Default,
{
    fn default() -> Self {
        Self::from_parts(DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR, S::default())
    }
}

impl<K, V, S> ChainedHashMap<K, V, S> {
    /// Callers validate `load_factor`; `capacity` is raised to at least one.
    pub(crate) fn from_parts(capacity: usize, load_factor: f64, hasher: S) -> Self {
        let buckets = Buckets::with_capacity(capacity);
        let grow_at = config::grow_threshold(buckets.capacity(), load_factor);
        Self {
            hasher,
            buckets,
            slots: SlotMap::with_key(),
            load_factor,
            grow_at,
            reentrancy: DebugReentrancy::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Current number of buckets.
    pub fn capacity(&self) -> usize {
        self.buckets.capacity()
    }

    pub fn load_factor(&self) -> f64 {
        self.load_factor
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Drop every entry and start over with [`DEFAULT_CAPACITY`] buckets,
    /// whatever the capacity was before.
    pub fn clear(&mut self) {
        debug!(
            "clearing map: dropping {} entries, capacity {} -> {}",
            self.slots.len(),
            self.buckets.capacity(),
            DEFAULT_CAPACITY
        );
        self.slots.clear();
        self.buckets = Buckets::with_capacity(DEFAULT_CAPACITY);
        self.grow_at = config::grow_threshold(DEFAULT_CAPACITY, self.load_factor);
    }

    /// Entries in bucket order, then chain order within a bucket.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            entries: self.entries(),
            remaining: self.slots.len(),
        }
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Mutable access to every value, in no particular order.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            it: self.slots.iter_mut(),
        }
    }

    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// A cursor positioned before the first entry. See [`Cursor`].
    pub fn cursor(&mut self) -> Cursor<'_, K, V, S> {
        Cursor::new(self)
    }

    /// Keep only the entries for which `keep` returns true.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        let mut cursor = self.cursor();
        while let Ok((k, v)) = cursor.next() {
            if !keep(k, v) {
                let removed = cursor.remove();
                debug_assert!(removed.is_ok(), "entry was yielded just before");
            }
        }
    }

    pub(crate) fn entries(&self) -> Entries<'_, K, V> {
        Entries {
            buckets: &self.buckets,
            slots: &self.slots,
            bucket: 0,
            next: None,
        }
    }

    /// Double the bucket array and rehome every entry by its cached hash.
    fn grow(&mut self) {
        let old_capacity = self.buckets.capacity();
        let new_capacity = old_capacity
            .checked_mul(2)
            .expect("bucket array capacity overflow");
        self.buckets = mem::take(&mut self.buckets).rehome(&mut self.slots, new_capacity);
        self.grow_at = config::grow_threshold(new_capacity, self.load_factor);
        debug!(
            "resized buckets {} -> {} at len {} (next resize at {})",
            old_capacity,
            new_capacity,
            self.slots.len(),
            self.grow_at
        );
    }
}

impl<K, V, S> ChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::from_parts(DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR, hasher)
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self::from_parts(capacity, DEFAULT_LOAD_FACTOR, hasher)
    }

    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    fn locate<Q>(&self, q: &Q) -> Option<EntryKey>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(q);
        let bucket = self.buckets.index_for(hash);
        match self
            .buckets
            .probe(&self.slots, bucket, hash, |k| k.borrow() == q)
        {
            Probe::Occupied { key, .. } => Some(key),
            Probe::Vacant { .. } => None,
        }
    }

    /// Associate `value` with `key`, returning the value it replaced.
    ///
    /// An existing key keeps its entry and position; only the value changes.
    /// A new key may first grow the table, then goes to the tail of its chain.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        let guard = self.reentrancy.enter("put");
        let hash = self.make_hash(&key);
        let mut bucket = self.buckets.index_for(hash);
        let mut tail = match self.buckets.probe(&self.slots, bucket, hash, |k| *k == key) {
            Probe::Occupied { key: found, .. } => {
                return Some(mem::replace(&mut self.slots[found].value, value));
            }
            Probe::Vacant { tail } => tail,
        };
        drop(guard);

        if self.slots.len() >= self.grow_at {
            self.grow();
            bucket = self.buckets.index_for(hash);
            tail = self.buckets.tail(&self.slots, bucket);
        }

        let inserted = self.slots.insert(Entry::new(key, value, hash));
        self.buckets
            .link_after(&mut self.slots, bucket, tail, inserted);
        None
    }

    /// Same as [`put`](Self::put), named after `std::collections::HashMap::insert`.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.put(key, value)
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("get");
        let key = self.locate(q)?;
        self.slots.get(key).map(|e| &e.value)
    }

    pub fn get_key_value<Q>(&self, q: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("get_key_value");
        let key = self.locate(q)?;
        self.slots.get(key).map(|e| (&e.key, &e.value))
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("get_mut");
        let key = self.locate(q)?;
        self.slots.get_mut(key).map(|e| &mut e.value)
    }

    /// True when an entry exists for the key, whatever its value.
    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(q).is_some()
    }

    pub fn remove<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_entry(q).map(|(_, v)| v)
    }

    /// Unlink the entry for `q` and hand back its key and value.
    pub fn remove_entry<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("remove");
        let hash = self.make_hash(q);
        let bucket = self.buckets.index_for(hash);
        match self
            .buckets
            .probe(&self.slots, bucket, hash, |k| k.borrow() == q)
        {
            Probe::Occupied { prev, key } => Some(
                self.buckets
                    .unlink(&mut self.slots, bucket, prev, key)
                    .into_pair(),
            ),
            Probe::Vacant { .. } => None,
        }
    }
}

/// Walks every chain in bucket order. Shared by `Iter` and `Display`.
pub(crate) struct Entries<'a, K, V> {
    buckets: &'a Buckets,
    slots: &'a Arena<K, V>,
    bucket: usize,
    next: Option<EntryKey>,
}

impl<'a, K, V> Iterator for Entries<'a, K, V> {
    type Item = &'a Entry<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.next.is_none() {
            if self.bucket >= self.buckets.capacity() {
                return None;
            }
            self.next = self.buckets.head(self.bucket);
            self.bucket += 1;
        }
        let slots = self.slots;
        let entry = &slots[self.next?];
        self.next = entry.next;
        Some(entry)
    }
}

/// Iterator over `(&K, &V)` in bucket order.
pub struct Iter<'a, K, V> {
    entries: Entries<'a, K, V>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let e = self.entries.next()?;
        self.remaining -= 1;
        Some((&e.key, &e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Iterator over `(&K, &mut V)` in arena order.
pub struct IterMut<'a, K, V> {
    it: slotmap::basic::IterMut<'a, EntryKey, Entry<K, V>>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, e)| (&e.key, &mut e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

pub struct ValuesMut<'a, K, V> {
    inner: IterMut<'a, K, V>,
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }
}

impl<'a, K, V, S> IntoIterator for &'a ChainedHashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut ChainedHashMap<K, V, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K, V, S> Extend<(K, V)> for ChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.put(k, v);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for ChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::with_hasher(S::default());
        map.extend(iter);
        map
    }
}

/// Same key set with equal values; bucket layout and capacity are ignored.
impl<K, V, S> PartialEq for ChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K, V, S> Eq for ChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    V: Eq,
    S: BuildHasher,
{
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for ChainedHashMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// `[k1=v1, k2=v2]` in iteration order; `[]` when empty.
impl<K: fmt::Display, V: fmt::Display, S> fmt::Display for ChainedHashMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, entry) in self.entries().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", entry)?;
        }
        f.write_str("]")
    }
}
