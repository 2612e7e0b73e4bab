//! Cache Statistics Module
//!
//! Tracks per-store counters: hits, misses, sets, deletes and evictions.

use std::ops::AddAssign;

use serde::Serialize;

// == Cache Stats ==
/// Counter snapshot for one store, or the sum over several.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Lookups that returned a live value
    pub hits: u64,
    /// Lookups that found nothing live
    pub misses: u64,
    /// Values written
    pub sets: u64,
    /// Explicit removals, including pattern invalidation
    pub deletes: u64,
    /// Capacity evictions and removals of expired entries
    pub evictions: u64,
    /// Current number of entries held
    pub size: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.lookups();
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Total number of lookups (hits + misses).
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }

    // == Eviction Rate ==
    /// Evictions per write, or 0.0 if nothing was written.
    pub fn eviction_rate(&self) -> f64 {
        if self.sets == 0 {
            0.0
        } else {
            self.evictions as f64 / self.sets as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_set(&mut self) {
        self.sets += 1;
    }

    pub fn record_delete(&mut self) {
        self.deletes += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Updates the current entry count.
    pub fn set_size(&mut self, count: usize) {
        self.size = count;
    }

    // == Reset ==
    /// Zeroes every counter but keeps `size`, which reflects content rather
    /// than history.
    pub fn reset_counters(&mut self) {
        *self = Self {
            size: self.size,
            ..Self::default()
        };
    }
}

impl AddAssign<&CacheStats> for CacheStats {
    fn add_assign(&mut self, other: &CacheStats) {
        self.hits += other.hits;
        self.misses += other.misses;
        self.sets += other.sets;
        self.deletes += other.deletes;
        self.evictions += other.evictions;
        self.size += other.size;
    }
}
