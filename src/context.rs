//! Application Context
//!
//! Explicitly constructed owner of the cache registry, the invalidation
//! dispatcher and the pool gauges.
//!
//! Lifecycle: built once at process start with [`AppContext::from_config`],
//! cloned into every request handler, and torn down with
//! [`AppContext::shutdown`] after the server stops accepting requests.

use std::sync::Arc;

use tracing::info;

use crate::cache::{CacheManager, NamedCache};
use crate::config::Config;
use crate::error::Result;
use crate::health::{HealthReport, ResourcePoolMonitor};
use crate::invalidation::{EventPayload, InvalidationDispatcher, InvalidationReport};

/// Shared state handed to handlers. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct AppContext {
    /// Named cache stores
    pub caches: Arc<CacheManager>,
    /// Event-driven invalidation over `caches`
    pub dispatcher: InvalidationDispatcher,
    /// Connection pool gauges reported by the health endpoint
    pub pool: Arc<ResourcePoolMonitor>,
}

impl AppContext {
    /// A context with no stores registered yet.
    pub fn new() -> Self {
        let caches = Arc::new(CacheManager::new());
        Self {
            dispatcher: InvalidationDispatcher::new(Arc::clone(&caches)),
            caches,
            pool: Arc::new(ResourcePoolMonitor::new()),
        }
    }

    /// Validates `config` and creates every configured store.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;

        let context = Self::new();
        for (name, store) in config.stores() {
            context.caches.get_or_create(name, store);
        }
        Ok(context)
    }

    /// Looks up a registered store.
    pub fn store(&self, name: &str) -> Result<Arc<NamedCache>> {
        self.caches.require(name)
    }

    /// Entry point for mutation handlers after a successful write.
    pub fn invalidate(&self, event_type: &str, payload: EventPayload) -> InvalidationReport {
        self.dispatcher.trigger_cache_invalidation(event_type, payload)
    }

    pub fn health_report(&self) -> HealthReport {
        HealthReport::collect(&self.caches, &self.pool)
    }

    /// Drops all cached content. Called once the server has stopped.
    pub fn shutdown(&self) {
        self.caches.clear_all();
        info!(stores = self.caches.names().len(), "Cache context shut down");
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new()
    }
}
