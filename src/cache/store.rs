//! Cache Store Module
//!
//! One bounded, TTL-based key/value table: HashMap storage with insertion-order
//! eviction and lazy TTL expiry.

use std::collections::HashMap;
use std::time::Duration;

use serde_json::Value;

use crate::cache::{CacheEntry, CacheStats, InsertionOrder};
use crate::cache::entry::current_timestamp_ms;
use crate::invalidation::PatternSet;

// == Cache Store ==
/// A bounded cache evicting the oldest inserted entry when full.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Insertion order for eviction
    order: InsertionOrder,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_size: usize,
    /// TTL for entries written without an explicit one
    default_ttl: Duration,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore with specified capacity and default TTL.
    ///
    /// A zero capacity is raised to one; use
    /// [`StoreConfig::validate`](crate::cache::StoreConfig::validate) to reject it instead.
    pub fn new(max_size: usize, default_ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            order: InsertionOrder::new(),
            stats: CacheStats::new(),
            max_size: max_size.max(1),
            default_ttl,
        }
    }

    // == Set ==
    /// Stores a value under `key` for `ttl` (or the default TTL).
    ///
    /// Overwriting an existing key replaces its value and expiry but keeps its
    /// place in the eviction order. A new key at capacity evicts the oldest
    /// inserted entry first.
    pub fn set(&mut self, key: String, value: Value, ttl: Option<Duration>) {
        let is_overwrite = self.entries.contains_key(&key);

        if !is_overwrite {
            while self.entries.len() >= self.max_size {
                match self.order.evict_oldest() {
                    Some(evicted) => {
                        self.entries.remove(&evicted);
                        self.stats.record_eviction();
                    }
                    None => break,
                }
            }
            self.order.push(&key);
        }

        let entry = CacheEntry::new(value, ttl.unwrap_or(self.default_ttl));
        self.entries.insert(key, entry);

        self.stats.record_set();
        self.stats.set_size(self.entries.len());
    }

    // == Get ==
    /// Returns the value if present and unexpired.
    ///
    /// A stale entry found here is removed and counted as an eviction; the
    /// lookup itself counts as a miss.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        match self.entries.get(key) {
            Some(entry) if !entry.is_expired() => {
                self.stats.record_hit();
                Some(entry.value.clone())
            }
            Some(_) => {
                self.remove_entry(key);
                self.stats.record_eviction();
                self.stats.record_miss();
                None
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Peek ==
    /// Returns the live value without touching any counter.
    pub fn peek(&self, key: &str) -> Option<Value> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.value.clone())
    }

    // == Delete ==
    /// Removes an entry by key, returning whether anything was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        if self.remove_entry(key) {
            self.stats.record_delete();
            true
        } else {
            false
        }
    }

    // == Delete Matching ==
    /// Deletes every key matching `patterns`, returning how many were removed.
    pub fn delete_matching(&mut self, patterns: &PatternSet) -> usize {
        if patterns.is_empty() {
            return 0;
        }

        let doomed: Vec<String> = self
            .order
            .iter()
            .filter(|key| patterns.is_match(key))
            .cloned()
            .collect();

        doomed.iter().filter(|key| self.delete(key)).count()
    }

    // == Clear ==
    /// Removes every entry. Counters are left untouched.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        self.stats.set_size(0);
    }

    // == Reset Counters ==
    /// Zeroes hit/miss/set/delete/eviction counters. Entries are left untouched.
    pub fn reset_counters(&mut self) {
        self.stats.reset_counters();
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_size(self.entries.len());
        stats
    }

    // == Purge Expired ==
    /// Removes all expired entries, counting each as an eviction.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self) -> usize {
        let now = current_timestamp_ms();
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.remove_entry(key);
            self.stats.record_eviction();
        }

        expired_keys.len()
    }

    /// Keys currently held, oldest first. May include expired entries not yet purged.
    pub fn keys(&self) -> Vec<String> {
        self.order.iter().cloned().collect()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn remove_entry(&mut self, key: &str) -> bool {
        if self.entries.remove(key).is_some() {
            self.order.remove(key);
            self.stats.set_size(self.entries.len());
            true
        } else {
            false
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::thread::sleep;

    const TTL: Duration = Duration::from_secs(300);

    fn set(store: &mut CacheStore, key: &str, value: Value) {
        store.set(key.to_string(), value, None);
    }

    #[test]
    fn test_store_new() {
        let store = CacheStore::new(100, TTL);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.max_size(), 100);
        assert_eq!(store.default_ttl(), TTL);
    }

    #[test]
    fn test_store_set_and_get() {
        let mut store = CacheStore::new(100, TTL);

        set(&mut store, "key1", json!({"rows": [1, 2]}));

        assert_eq!(store.get("key1"), Some(json!({"rows": [1, 2]})));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent_is_miss() {
        let mut store = CacheStore::new(100, TTL);

        assert_eq!(store.get("nonexistent"), None);
        let stats = store.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.evictions, 0);
    }

    #[test]
    fn test_store_delete() {
        let mut store = CacheStore::new(100, TTL);

        set(&mut store, "key1", json!(1));
        assert!(store.delete("key1"));

        assert!(store.is_empty());
        assert_eq!(store.get("key1"), None);
        assert_eq!(store.stats().deletes, 1);
    }

    #[test]
    fn test_store_delete_nonexistent_not_counted() {
        let mut store = CacheStore::new(100, TTL);

        assert!(!store.delete("nonexistent"));
        assert_eq!(store.stats().deletes, 0);
    }

    #[test]
    fn test_store_overwrite() {
        let mut store = CacheStore::new(100, TTL);

        set(&mut store, "key1", json!("value1"));
        set(&mut store, "key1", json!("value2"));

        assert_eq!(store.get("key1"), Some(json!("value2")));
        assert_eq!(store.len(), 1);
        assert_eq!(store.stats().sets, 2);
    }

    #[test]
    fn test_store_ttl_expiration_counts_eviction_and_miss() {
        let mut store = CacheStore::new(100, TTL);

        store.set("key1".to_string(), json!(1), Some(Duration::from_millis(50)));
        assert!(store.get("key1").is_some());

        sleep(Duration::from_millis(80));

        assert_eq!(store.get("key1"), None);
        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.evictions, 1);
        assert_eq!(stats.size, 0);
    }

    #[test]
    fn test_store_zero_ttl_is_uncacheable() {
        let mut store = CacheStore::new(100, TTL);

        store.set("key1".to_string(), json!(1), Some(Duration::ZERO));
        assert_eq!(store.get("key1"), None);
    }

    #[test]
    fn test_store_evicts_oldest_inserted() {
        let mut store = CacheStore::new(2, TTL);

        set(&mut store, "a", json!(1));
        set(&mut store, "b", json!(2));
        set(&mut store, "c", json!(3));

        let mut keys = store.keys();
        keys.sort();
        assert_eq!(keys, vec!["b".to_string(), "c".to_string()]);
        assert_eq!(store.stats().evictions, 1);
        assert_eq!(store.get("a"), None);
    }

    #[test]
    fn test_store_reads_do_not_change_eviction_order() {
        let mut store = CacheStore::new(2, TTL);

        set(&mut store, "a", json!(1));
        set(&mut store, "b", json!(2));
        store.get("a");
        set(&mut store, "c", json!(3));

        assert_eq!(store.peek("a"), None);
        assert!(store.peek("b").is_some());
    }

    #[test]
    fn test_store_overwrite_at_capacity_does_not_evict() {
        let mut store = CacheStore::new(2, TTL);

        set(&mut store, "a", json!(1));
        set(&mut store, "b", json!(2));
        set(&mut store, "a", json!(10));

        assert_eq!(store.len(), 2);
        assert_eq!(store.stats().evictions, 0);
        assert_eq!(store.peek("a"), Some(json!(10)));
    }

    #[test]
    fn test_store_peek_does_not_count() {
        let mut store = CacheStore::new(10, TTL);
        set(&mut store, "a", json!(1));

        assert_eq!(store.peek("a"), Some(json!(1)));
        assert_eq!(store.peek("b"), None);

        let stats = store.stats();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
    }

    #[test]
    fn test_store_clear_keeps_counters() {
        let mut store = CacheStore::new(10, TTL);
        set(&mut store, "a", json!(1));
        store.get("a");

        store.clear();

        let stats = store.stats();
        assert!(store.is_empty());
        assert_eq!(stats.size, 0);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.sets, 1);
    }

    #[test]
    fn test_store_reset_counters_keeps_entries() {
        let mut store = CacheStore::new(10, TTL);
        set(&mut store, "a", json!(1));
        store.get("a");
        store.get("zzz");

        store.reset_counters();

        let stats = store.stats();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.sets, 0);
        assert_eq!(stats.size, 1);
        assert_eq!(store.peek("a"), Some(json!(1)));
    }

    #[test]
    fn test_store_delete_matching() {
        let mut store = CacheStore::new(10, TTL);
        set(&mut store, "inventory-list.[]", json!(1));
        set(&mut store, "inventory-list.[{\"page\":2}]", json!(2));
        set(&mut store, "supplier-list.[]", json!(3));

        let removed = store.delete_matching(&PatternSet::compile(&["inventory-list.*"]));

        assert_eq!(removed, 2);
        assert_eq!(store.keys(), vec!["supplier-list.[]".to_string()]);
        assert_eq!(store.stats().deletes, 2);
    }

    #[test]
    fn test_store_delete_matching_empty_set_is_noop() {
        let mut store = CacheStore::new(10, TTL);
        set(&mut store, "a", json!(1));

        assert_eq!(store.delete_matching(&PatternSet::default()), 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_purge_expired() {
        let mut store = CacheStore::new(100, TTL);

        store.set("key1".to_string(), json!(1), Some(Duration::from_millis(50)));
        store.set("key2".to_string(), json!(2), Some(Duration::from_secs(10)));

        sleep(Duration::from_millis(80));

        let removed = store.purge_expired();
        assert_eq!(removed, 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.keys(), vec!["key2".to_string()]);
        assert_eq!(store.stats().evictions, 1);
    }
}
