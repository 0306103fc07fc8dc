//! SharedCache: thread-safe handle over the LRU cache

use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::Result;
use crate::lru::LruCache;
use crate::stats::{CacheStats, StatsSnapshot};

/// Cloneable, thread-safe cache handle.
///
/// A single `Mutex` guards the map and the recency list together for the full
/// duration of each operation. A read/write split would not help here: a `get`
/// hit relinks the entry, so every lookup is a mutation.
pub struct SharedCache<K, V> {
    inner: Arc<Mutex<LruCache<K, V>>>,
    stats: Arc<CacheStats>,
    capacity: usize,
}

impl<K, V> Clone for SharedCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            stats: Arc::clone(&self.stats),
            capacity: self.capacity,
        }
    }
}

impl<K, V> SharedCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Create a shared cache holding at most `capacity` entries.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidCapacity`] when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        Ok(Self {
            inner: Arc::new(Mutex::new(LruCache::new(capacity)?)),
            stats: Arc::new(CacheStats::new()),
            capacity,
        })
    }

    /// Look up `key`, returning an owned copy of the value on a hit.
    ///
    /// Records the lookup outcome and refreshes recency on hits.
    pub fn get(&self, key: &K) -> Option<V> {
        let value = {
            let mut cache = self.inner.lock();
            cache.get(key).cloned()
        };
        self.stats.record_lookup(value.is_some());
        value
    }

    /// Insert or update `key`, evicting the LRU entry if the cache is full.
    pub fn put(&self, key: K, value: V) {
        let evicted = {
            let mut cache = self.inner.lock();
            cache.put(key, value)
        };
        self.stats.record_insert(evicted.is_some());
    }

    /// Remove `key`, returning its value if it was present.
    pub fn remove(&self, key: &K) -> Option<V> {
        self.inner.lock().remove(key)
    }

    /// Current occupancy
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// True when no entries are held
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every entry and reset statistics
    pub fn clear(&self) {
        self.inner.lock().clear();
        self.stats.reset();
    }

    /// Point-in-time copy of the cache statistics
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }
}
