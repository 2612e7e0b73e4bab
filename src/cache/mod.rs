//! Cache Module
//!
//! Named, bounded, TTL-based key/value stores, key fingerprinting and the
//! get-or-compute wrapper used by request handlers.

mod compute;
mod entry;
mod keys;
pub(crate) mod lock;
mod manager;
mod order;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use keys::{make_key, query_key_to_string, scoped_key, CacheKey, QueryKey};
pub use manager::{CacheManager, NamedCache, StoreConfig};
pub use order::InsertionOrder;
pub use stats::CacheStats;
pub use store::CacheStore;
