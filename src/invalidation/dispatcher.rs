//! Invalidation Dispatcher
//!
//! Resolves the patterns for a domain event and evicts the matching keys from
//! the registered stores.
//!
//! Mutation handlers call this after a successful write. Nothing here can fail
//! the caller's write path: bad payloads, bad patterns and missing stores are
//! logged and the invalidation degrades instead of erroring.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::CacheManager;
use crate::invalidation::events::{DomainEvent, EventPayload};
use crate::invalidation::mapping::get_specific_patterns;
use crate::invalidation::pattern::PatternSet;

// == Invalidation Report ==
/// Outcome of one dispatched event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvalidationReport {
    pub event_type: String,
    pub patterns: Vec<String>,
    pub removed: usize,
}

// == Dispatcher ==
/// Translates domain events into key evictions across the manager's stores.
#[derive(Debug, Clone)]
pub struct InvalidationDispatcher {
    manager: Arc<CacheManager>,
}

impl InvalidationDispatcher {
    pub fn new(manager: Arc<CacheManager>) -> Self {
        Self { manager }
    }

    // == Trigger ==
    /// String entry point used by mutation handlers.
    ///
    /// Payload fields are checked one by one: an unusable field is logged and
    /// skipped while the others still contribute their patterns, so a single
    /// bad identifier never narrows the invalidation below the base patterns.
    pub fn trigger_cache_invalidation(
        &self,
        event_type: &str,
        payload: EventPayload,
    ) -> InvalidationReport {
        self.dispatch(&DomainEvent::lenient(event_type, payload))
    }

    // == Dispatch ==
    /// Deletes every key matching the event's patterns from every store.
    pub fn dispatch(&self, event: &DomainEvent) -> InvalidationReport {
        let names = self.manager.names();
        self.dispatch_to(event, &names)
    }

    /// Deletes matching keys from the named stores only. Unknown names are
    /// logged and skipped.
    pub fn dispatch_to<S: AsRef<str>>(&self, event: &DomainEvent, stores: &[S]) -> InvalidationReport {
        let patterns = get_specific_patterns(event);
        let event_type = event.event_type.to_string();

        if patterns.is_empty() {
            debug!(event_type = %event_type, "No invalidation patterns for event");
            return InvalidationReport {
                event_type,
                patterns,
                removed: 0,
            };
        }

        let compiled = PatternSet::compile(&patterns);
        let mut removed = 0;
        for name in stores {
            let name = name.as_ref();
            match self.manager.get(name) {
                Some(store) => {
                    let count = store.delete_matching(&compiled);
                    if count > 0 {
                        debug!(store = name, removed = count, event_type = %event_type, "Keys invalidated");
                    }
                    removed += count;
                }
                None => warn!(store = name, event_type = %event_type, "Invalidation skipped: unknown store"),
            }
        }

        info!(
            event_type = %event_type,
            patterns = ?patterns,
            removed,
            "Cache invalidation dispatched"
        );

        InvalidationReport {
            event_type,
            patterns,
            removed,
        }
    }
}
