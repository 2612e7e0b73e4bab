//! Cache Manager Module
//!
//! Registry of named cache stores and aggregate statistics.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info};

use crate::cache::lock;
use crate::cache::{CacheStats, CacheStore};
use crate::error::{CacheError, Result};
use crate::invalidation::PatternSet;

// == Store Config ==
/// Capacity and default TTL for one named store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    pub max_size: usize,
    pub default_ttl: Duration,
}

impl StoreConfig {
    pub fn new(max_size: usize, default_ttl: Duration) -> Self {
        Self {
            max_size,
            default_ttl,
        }
    }

    /// Rejects a zero capacity or a zero default TTL.
    pub fn validate(&self) -> Result<()> {
        if self.max_size == 0 {
            return Err(CacheError::InvalidConfig(
                "max_size must be greater than zero".to_string(),
            ));
        }
        if self.default_ttl.is_zero() {
            return Err(CacheError::InvalidConfig(
                "default_ttl must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

// == Named Cache ==
/// A store registered under a name, safe to share between tasks.
///
/// Every operation takes the store lock for its own duration only; no lock is
/// ever held across an `.await`.
#[derive(Debug)]
pub struct NamedCache {
    name: String,
    store: Mutex<CacheStore>,
    /// Per-key gates for concurrent cold-key computations
    pub(super) in_flight: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl NamedCache {
    pub fn new(name: impl Into<String>, config: StoreConfig) -> Self {
        Self {
            name: name.into(),
            store: Mutex::new(CacheStore::new(config.max_size, config.default_ttl)),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        lock::lock(&self.store, &self.name, "get").get(key)
    }

    pub fn peek(&self, key: &str) -> Option<Value> {
        lock::lock(&self.store, &self.name, "peek").peek(key)
    }

    pub fn set(&self, key: impl Into<String>, value: Value, ttl: Option<Duration>) {
        lock::lock(&self.store, &self.name, "set").set(key.into(), value, ttl);
    }

    pub fn delete(&self, key: &str) -> bool {
        lock::lock(&self.store, &self.name, "delete").delete(key)
    }

    pub fn delete_matching(&self, patterns: &PatternSet) -> usize {
        lock::lock(&self.store, &self.name, "delete_matching").delete_matching(patterns)
    }

    pub fn clear(&self) {
        lock::lock(&self.store, &self.name, "clear").clear();
    }

    pub fn reset_counters(&self) {
        lock::lock(&self.store, &self.name, "reset_counters").reset_counters();
    }

    pub fn purge_expired(&self) -> usize {
        lock::lock(&self.store, &self.name, "purge_expired").purge_expired()
    }

    pub fn stats(&self) -> CacheStats {
        lock::lock(&self.store, &self.name, "stats").stats()
    }

    pub fn keys(&self) -> Vec<String> {
        lock::lock(&self.store, &self.name, "keys").keys()
    }

    pub fn len(&self) -> usize {
        lock::lock(&self.store, &self.name, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// == Cache Manager ==
/// Creates named stores on first use and hands out shared handles to them.
#[derive(Debug, Default)]
pub struct CacheManager {
    stores: RwLock<BTreeMap<String, Arc<NamedCache>>>,
}

impl CacheManager {
    pub fn new() -> Self {
        Self::default()
    }

    // == Get Or Create ==
    /// Returns the store registered under `name`, creating it with `config` if
    /// absent. The config of an existing store is never changed.
    pub fn get_or_create(&self, name: &str, config: StoreConfig) -> Arc<NamedCache> {
        if let Some(store) = self.get(name) {
            return store;
        }

        let mut stores = lock::write(&self.stores, name, "get_or_create");
        let store = stores.entry(name.to_string()).or_insert_with(|| {
            info!(
                store = name,
                max_size = config.max_size,
                default_ttl_ms = config.default_ttl.as_millis() as u64,
                "Cache store created"
            );
            Arc::new(NamedCache::new(name, config))
        });
        Arc::clone(store)
    }

    pub fn get(&self, name: &str) -> Option<Arc<NamedCache>> {
        lock::read(&self.stores, name, "get").get(name).cloned()
    }

    /// Like [`get`](Self::get) but reports an unknown name as an error.
    pub fn require(&self, name: &str) -> Result<Arc<NamedCache>> {
        self.get(name)
            .ok_or_else(|| CacheError::StoreNotFound(name.to_string()))
    }

    pub fn names(&self) -> Vec<String> {
        lock::read(&self.stores, "*", "names").keys().cloned().collect()
    }

    /// Snapshot of every registered store, in name order.
    pub fn stores(&self) -> Vec<Arc<NamedCache>> {
        lock::read(&self.stores, "*", "stores")
            .values()
            .cloned()
            .collect()
    }

    // == Statistics ==
    /// Stats of every store keyed by name.
    pub fn get_all_stats(&self) -> BTreeMap<String, CacheStats> {
        self.stores()
            .iter()
            .map(|store| (store.name().to_string(), store.stats()))
            .collect()
    }

    /// Counters summed over every store.
    pub fn aggregate_stats(&self) -> CacheStats {
        let mut total = CacheStats::new();
        for stats in self.get_all_stats().values() {
            total += stats;
        }
        total
    }

    // == Clear All ==
    /// Empties every store. Counters are left untouched.
    pub fn clear_all(&self) {
        for store in self.stores() {
            store.clear();
        }
        info!("All cache stores cleared");
    }

    // == Reset All Counters ==
    /// Zeroes the counters of every store. Content is left untouched.
    pub fn reset_all_counters(&self) {
        for store in self.stores() {
            store.reset_counters();
        }
        info!("All cache counters reset");
    }

    /// Removes expired entries from every store.
    pub fn purge_expired(&self) -> usize {
        self.stores()
            .iter()
            .map(|store| {
                let removed = store.purge_expired();
                if removed > 0 {
                    debug!(store = store.name(), removed, "Expired entries purged");
                }
                removed
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(max_size: usize) -> StoreConfig {
        StoreConfig::new(max_size, Duration::from_secs(60))
    }

    #[test]
    fn test_store_config_validate() {
        assert!(config(10).validate().is_ok());
        assert!(matches!(
            config(0).validate(),
            Err(CacheError::InvalidConfig(_))
        ));
        assert!(matches!(
            StoreConfig::new(10, Duration::ZERO).validate(),
            Err(CacheError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_get_or_create_returns_same_store() {
        let manager = CacheManager::new();

        let first = manager.get_or_create("responses", config(10));
        first.set("k", json!(1), None);

        let second = manager.get_or_create("responses", config(99));
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.peek("k"), Some(json!(1)));
        assert_eq!(manager.names(), vec!["responses".to_string()]);
    }

    #[test]
    fn test_existing_config_is_kept() {
        let manager = CacheManager::new();
        let store = manager.get_or_create("small", config(1));
        manager.get_or_create("small", config(100));

        store.set("a", json!(1), None);
        store.set("b", json!(2), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_require_unknown_store() {
        let manager = CacheManager::new();
        assert!(matches!(
            manager.require("missing"),
            Err(CacheError::StoreNotFound(_))
        ));
    }

    #[test]
    fn test_get_all_stats_and_aggregate() {
        let manager = CacheManager::new();
        let a = manager.get_or_create("a", config(10));
        let b = manager.get_or_create("b", config(10));

        a.set("x", json!(1), None);
        a.get("x");
        b.get("missing");

        let all = manager.get_all_stats();
        assert_eq!(all.len(), 2);
        assert_eq!(all["a"].hits, 1);
        assert_eq!(all["a"].size, 1);
        assert_eq!(all["b"].misses, 1);

        let total = manager.aggregate_stats();
        assert_eq!(total.hits, 1);
        assert_eq!(total.misses, 1);
        assert_eq!(total.sets, 1);
        assert_eq!(total.size, 1);
    }

    #[test]
    fn test_clear_all_keeps_counters() {
        let manager = CacheManager::new();
        let a = manager.get_or_create("a", config(10));
        let b = manager.get_or_create("b", config(10));
        a.set("x", json!(1), None);
        b.set("y", json!(2), None);

        manager.clear_all();

        assert!(a.is_empty());
        assert!(b.is_empty());
        assert_eq!(manager.aggregate_stats().sets, 2);
    }

    #[test]
    fn test_reset_all_counters_keeps_content() {
        let manager = CacheManager::new();
        let a = manager.get_or_create("a", config(10));
        a.set("x", json!(1), None);
        a.get("x");

        manager.reset_all_counters();

        let stats = manager.aggregate_stats();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.sets, 0);
        assert_eq!(stats.size, 1);
        assert_eq!(a.peek("x"), Some(json!(1)));
    }

    #[test]
    fn test_concurrent_first_creation_yields_one_store() {
        let manager = Arc::new(CacheManager::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let manager = Arc::clone(&manager);
                std::thread::spawn(move || manager.get_or_create("shared", config(10)))
            })
            .collect();

        let stores: Vec<Arc<NamedCache>> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(stores.iter().all(|s| Arc::ptr_eq(s, &stores[0])));
        assert_eq!(manager.names().len(), 1);
    }
}
