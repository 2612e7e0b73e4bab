//! API Module
//!
//! HTTP handlers and routing for the operator surface.
//!
//! # Endpoints
//! - `GET /health` - Health report
//! - `GET /stats` - Cache statistics
//! - `GET /stats/:name` - Statistics of one store
//! - `POST /cache/clear` - Drop cached entries
//! - `POST /cache/reset-stats` - Zero counters
//! - `POST /invalidate` - Dispatch a domain event

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
