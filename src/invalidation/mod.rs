//! Invalidation Module
//!
//! Event-driven eviction: domain events are mapped to anchored wildcard
//! patterns, which are then matched against the keys of every store.

mod dispatcher;
mod events;
mod mapping;
mod pattern;

pub use dispatcher::{InvalidationDispatcher, InvalidationReport};
pub use events::{DomainEvent, EventPayload, EventScope, EventType};
pub use mapping::{base_patterns, get_specific_patterns};
pub use pattern::{escape_literal, matches_cache_key, pattern_to_regex, PatternSet, MATCH_ALL};
