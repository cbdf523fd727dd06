//! chained-hashmap: a single-threaded hash map built from separate chains,
//! with a cursor that can remove entries while traversing.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a separate-chaining map whose placement, growth and cursor
//!   removal can each be checked on their own.
//! - Layers:
//!   - `Entry<K, V>`: key, value, cached hash, link to the next entry of
//!     the same bucket. Entries live in a generational arena (`slotmap`).
//!   - `Buckets`: one optional chain head per bucket plus the link surgery
//!     (probe, append, unlink, rehome). Never calls `K: Hash`.
//!   - `ChainedHashMap<K, V, S>`: public put/get/remove/contains_key,
//!     growth policy, iterators, formatting.
//!   - `Cursor`: explicit traversal state machine with guarded removal.
//!
//! Constraints
//! - Single-threaded: the map is `!Sync`; share it behind external locking.
//! - Unique keys: `put` on an existing key replaces the value in place.
//! - Placement: `|hash as i64| mod capacity`, chains append at the tail.
//! - Growth: when `len >= ceil(capacity * load_factor)` and a new key
//!   arrives, capacity doubles before the insert (defaults 16 and 0.75).
//!
//! Hashing and rehoming
//! - Each entry stores the `u64` produced by `S: BuildHasher` at insertion.
//!   Lookups compare that cached hash before calling `K: Eq`.
//! - Growth moves links only: arena slots and cached hashes are untouched,
//!   so `K: Hash` runs exactly once per inserted key.
//! - Rehoming scans old buckets in order and appends to the target tail,
//!   keeping the relative order of entries that share a bucket.
//!
//! Cursor contract
//! - Order: bucket 0 first, ascending bucket index, chain order inside a
//!   bucket.
//! - `remove()` is legal exactly once per successful `next()`; otherwise it
//!   returns `CursorError::IllegalState`. `next()` past the end returns
//!   `CursorError::Exhausted`.
//! - Removal re-walks the owning bucket to find the predecessor instead of
//!   caching one.
//! - The cursor borrows the map mutably, so no other handle can change the
//!   structure mid-traversal.
//!
//! Reentrancy policy
//! - Debug builds guard each lookup/mutation entry point. A `Hash`/`Eq`
//!   implementation that calls back into the same map panics with the names
//!   of both operations. Release builds carry no guard state.
//!
//! Notes and non-goals
//! - No ordering across keys beyond the cursor contract above; insertion
//!   order is not preserved across buckets.
//! - `clear()` returns to the default capacity rather than keeping the
//!   grown one.
//! - `None` of an `Option<K>` key type is an ordinary key.

mod buckets;
mod chained_hash_map;
#[cfg(test)]
mod chained_hash_map_proptest;
mod config;
mod cursor;
mod entry;
mod error;
mod reentrancy;

// Public surface
pub use chained_hash_map::{ChainedHashMap, Iter, IterMut, Keys, Values, ValuesMut};
pub use config::{MapBuilder, DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR};
pub use cursor::{Cursor, CursorState};
pub use error::{ConfigError, CursorError};
