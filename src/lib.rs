//! Cache Invalidator - named response caches with event-driven invalidation
//!
//! Provides bounded TTL caches, deterministic key fingerprinting, a
//! get-or-compute wrapper, and a dispatcher that maps domain events to
//! wildcard key patterns for selective eviction.

pub mod api;
pub mod cache;
pub mod config;
pub mod context;
pub mod error;
pub mod health;
pub mod invalidation;
pub mod models;
pub mod tasks;

pub use config::Config;
pub use context::AppContext;
pub use error::{CacheError, Result};
pub use tasks::spawn_cleanup_task;
