//! Compute-Cache Wrapper
//!
//! "Get or compute and store" for request handlers, with single-flight
//! deduplication of concurrent cold-key computations.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

use crate::cache::lock;
use crate::cache::NamedCache;

impl NamedCache {
    // == Get Or Set ==
    /// Returns the cached value for `key`, or runs `compute`, stores its result
    /// for `ttl` (default TTL when `None`) and returns it.
    ///
    /// Concurrent callers on the same cold key wait for the first one; once it
    /// has stored its value they return that value without computing. If
    /// `compute` fails the error is returned unchanged, nothing is stored, and
    /// the next waiter (or the next call) computes again.
    ///
    /// An invalidation that lands while `compute` is running is overwritten by
    /// the late store; the entry then lives until its TTL or the next
    /// invalidation.
    pub async fn get_or_set<F, Fut, E>(
        &self,
        key: &str,
        ttl: Option<Duration>,
        compute: F,
    ) -> Result<Value, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, E>>,
    {
        if let Some(value) = self.get(key) {
            return Ok(value);
        }

        let entry = InFlight::register(self, key);
        let _permit = entry.enter().await;

        // Filled by another caller while we waited
        if let Some(value) = self.peek(key) {
            debug!(store = self.name(), key, "Cold key filled by concurrent caller");
            return Ok(value);
        }

        match compute().await {
            Ok(value) => {
                self.set(key, value.clone(), ttl);
                Ok(value)
            }
            Err(e) => {
                debug!(store = self.name(), key, "Computation failed, nothing cached");
                Err(e)
            }
        }
    }

    /// Number of keys with a computation currently gated.
    pub fn in_flight_count(&self) -> usize {
        lock::lock(&self.in_flight, self.name(), "in_flight_count").len()
    }
}

// == In-Flight Entry ==
/// One caller's hold on a key's gate.
///
/// Dropping it releases the caller's reference and removes the map entry once
/// nobody else holds the gate. This runs on every exit path, including when the
/// `get_or_set` future is cancelled mid-compute.
struct InFlight<'a> {
    cache: &'a NamedCache,
    key: &'a str,
    gate: Option<Arc<Mutex<()>>>,
}

impl<'a> InFlight<'a> {
    fn register(cache: &'a NamedCache, key: &'a str) -> Self {
        let mut in_flight = lock::lock(&cache.in_flight, cache.name(), "register");
        let gate = Arc::clone(in_flight.entry(key.to_string()).or_default());
        Self {
            cache,
            key,
            gate: Some(gate),
        }
    }

    async fn enter(&self) -> Option<OwnedMutexGuard<()>> {
        let gate = self.gate.as_ref()?;
        Some(Arc::clone(gate).lock_owned().await)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut in_flight = lock::lock(&self.cache.in_flight, self.cache.name(), "release");
        drop(self.gate.take());
        // Only the map still holds it: nobody is waiting.
        let idle = in_flight
            .get(self.key)
            .is_some_and(|gate| Arc::strong_count(gate) == 1);
        if idle {
            in_flight.remove(self.key);
        }
    }
}
