//! API Handlers
//!
//! HTTP request handlers for the operator endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::context::AppContext;
use crate::error::{CacheError, Result};
use crate::health::HealthReport;
use crate::invalidation::InvalidationReport;
use crate::models::{InvalidateRequest, ResetResponse, StatsOverview, StatsResponse};

/// Handler for GET /health
///
/// Returns cache and pool health with remediation hints.
pub async fn health_handler(State(ctx): State<AppContext>) -> Json<HealthReport> {
    Json(ctx.health_report())
}

/// Handler for GET /stats
///
/// Returns per-store and aggregate statistics.
pub async fn stats_handler(State(ctx): State<AppContext>) -> Json<StatsOverview> {
    let stores = ctx.caches.get_all_stats();
    let aggregate = ctx.caches.aggregate_stats();

    Json(StatsOverview::new(&stores, &aggregate))
}

/// Handler for GET /stats/:name
///
/// Returns the statistics of one store.
pub async fn store_stats_handler(
    State(ctx): State<AppContext>,
    Path(name): Path<String>,
) -> Result<Json<StatsResponse>> {
    let store = ctx.store(&name)?;

    Ok(Json(StatsResponse::from(&store.stats())))
}

/// Handler for POST /cache/clear
///
/// Drops every entry of every store. Counters are kept.
pub async fn clear_handler(State(ctx): State<AppContext>) -> Json<ResetResponse> {
    ctx.caches.clear_all();

    Json(ResetResponse::new("Cache entries cleared"))
}

/// Handler for POST /cache/reset-stats
///
/// Zeroes every store's counters. Entries are kept.
pub async fn reset_stats_handler(State(ctx): State<AppContext>) -> Json<ResetResponse> {
    ctx.caches.reset_all_counters();

    Json(ResetResponse::new("Cache statistics reset"))
}

/// Handler for POST /invalidate
///
/// Dispatches a domain event on behalf of an external writer.
pub async fn invalidate_handler(
    State(ctx): State<AppContext>,
    Json(req): Json<InvalidateRequest>,
) -> Result<Json<InvalidationReport>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidEvent(error_msg));
    }

    Ok(Json(ctx.invalidate(&req.event_type, req.payload)))
}
