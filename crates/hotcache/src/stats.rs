//! Hit/miss accounting for the shared cache

use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free counters updated by [`crate::SharedCache`] on every operation.
///
/// Lookups and inserts are counted at their outcome: a lookup is a hit or it
/// is not, an insert displaced a victim or it did not. Misses are derived, not
/// stored. Readers take a [`StatsSnapshot`] instead of polling counters.
#[derive(Debug, Default)]
pub struct CacheStats {
    lookups: AtomicU64,
    hits: AtomicU64,
    inserts: AtomicU64,
    evictions: AtomicU64,
}

impl CacheStats {
    /// Create zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a lookup and, when `hit` is true, the hit
    pub fn record_lookup(&self, hit: bool) {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        if hit {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Count an insert and, when `evicted` is true, the displaced victim
    pub fn record_insert(&self, evicted: bool) {
        self.inserts.fetch_add(1, Ordering::Relaxed);
        if evicted {
            self.evictions.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Point-in-time copy of all counters
    pub fn snapshot(&self) -> StatsSnapshot {
        let lookups = self.lookups.load(Ordering::Relaxed);
        let hits = self.hits.load(Ordering::Relaxed);
        StatsSnapshot {
            hits,
            misses: lookups.saturating_sub(hits),
            inserts: self.inserts.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }

    /// Zero all counters
    pub fn reset(&self) {
        self.lookups.store(0, Ordering::Relaxed);
        self.hits.store(0, Ordering::Relaxed);
        self.inserts.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);
    }
}

/// One consistent reading of the cache counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Lookups that found their key
    pub hits: u64,
    /// Lookups that did not
    pub misses: u64,
    /// Total `put` calls
    pub inserts: u64,
    /// Inserts that displaced the LRU entry
    pub evictions: u64,
}

impl StatsSnapshot {
    /// Fraction of lookups that hit, `0.0` when there were none
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
