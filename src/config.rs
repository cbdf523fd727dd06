//! Construction-time settings: initial bucket count, load factor, hasher.

use crate::chained_hash_map::ChainedHashMap;
use crate::error::ConfigError;
use core::hash::BuildHasher;
use hashbrown::hash_map::DefaultHashBuilder;

/// Bucket count of a map built without an explicit capacity, and after `clear`.
pub const DEFAULT_CAPACITY: usize = 16;

/// `len / capacity` ratio at which the next new key doubles the bucket array.
pub const DEFAULT_LOAD_FACTOR: f64 = 0.75;

/// Number of entries at which the next insertion of a new key grows the
/// table: `ceil(capacity * load_factor)`, never below one.
pub(crate) fn grow_threshold(capacity: usize, load_factor: f64) -> usize {
    let raw = (capacity as f64 * load_factor).ceil();
    if raw >= usize::MAX as f64 {
        usize::MAX
    } else {
        (raw as usize).max(1)
    }
}

pub(crate) fn validate_load_factor(load_factor: f64) -> Result<f64, ConfigError> {
    if load_factor.is_finite() && load_factor > 0.0 {
        Ok(load_factor)
    } else {
        Err(ConfigError::InvalidLoadFactor(load_factor))
    }
}

/// Builder for a [`ChainedHashMap`] with non-default settings.
///
/// ```
/// use chained_hashmap::{ChainedHashMap, MapBuilder};
///
/// let map: ChainedHashMap<&str, u32> = MapBuilder::new()
///     .capacity(64)
///     .load_factor(0.5)
///     .build()
///     .expect("valid settings");
/// assert_eq!(map.capacity(), 64);
/// ```
#[derive(Debug, Clone)]
pub struct MapBuilder<S = DefaultHashBuilder> {
    capacity: usize,
    load_factor: f64,
    hasher: S,
}

impl MapBuilder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for MapBuilder {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            load_factor: DEFAULT_LOAD_FACTOR,
            hasher: DefaultHashBuilder::default(),
        }
    }
}

impl<S> MapBuilder<S> {
    /// Initial number of buckets. Zero is raised to one.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    /// Checked by [`build`](Self::build): must be finite and positive.
    pub fn load_factor(mut self, load_factor: f64) -> Self {
        self.load_factor = load_factor;
        self
    }

    pub fn hasher<T>(self, hasher: T) -> MapBuilder<T> {
        MapBuilder {
            capacity: self.capacity,
            load_factor: self.load_factor,
            hasher,
        }
    }

    pub fn build<K, V>(self) -> Result<ChainedHashMap<K, V, S>, ConfigError>
    where
        S: BuildHasher,
    {
        let load_factor = validate_load_factor(self.load_factor)?;
        Ok(ChainedHashMap::from_parts(
            self.capacity,
            load_factor,
            self.hasher,
        ))
    }
}
