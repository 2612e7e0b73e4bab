//! Response DTOs for the operator API
//!
//! Defines the structure of outgoing HTTP response bodies.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::cache::CacheStats;

/// Stats of one store (or the aggregate), with the derived hit rate.
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
    pub deletes: u64,
    pub evictions: u64,
    pub size: usize,
    /// hits / (hits + misses)
    pub hit_rate: f64,
}

impl From<&CacheStats> for StatsResponse {
    fn from(stats: &CacheStats) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            sets: stats.sets,
            deletes: stats.deletes,
            evictions: stats.evictions,
            size: stats.size,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for `GET /stats`
#[derive(Debug, Clone, Serialize)]
pub struct StatsOverview {
    pub stores: BTreeMap<String, StatsResponse>,
    pub aggregate: StatsResponse,
}

impl StatsOverview {
    pub fn new(stores: &BTreeMap<String, CacheStats>, aggregate: &CacheStats) -> Self {
        Self {
            stores: stores
                .iter()
                .map(|(name, stats)| (name.clone(), StatsResponse::from(stats)))
                .collect(),
            aggregate: StatsResponse::from(aggregate),
        }
    }
}

/// Response body for the reset endpoints
#[derive(Debug, Clone, Serialize)]
pub struct ResetResponse {
    /// What was reset
    pub message: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl ResetResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_response_hit_rate() {
        let stats = CacheStats {
            hits: 80,
            misses: 20,
            sets: 30,
            deletes: 1,
            evictions: 5,
            size: 24,
        };
        let resp = StatsResponse::from(&stats);
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
        assert_eq!(resp.size, 24);
    }

    #[test]
    fn test_stats_response_zero_requests() {
        let resp = StatsResponse::from(&CacheStats::default());
        assert_eq!(resp.hit_rate, 0.0);
    }

    #[test]
    fn test_stats_overview_serialize() {
        let mut stores = BTreeMap::new();
        stores.insert("responses".to_string(), CacheStats::default());
        let overview = StatsOverview::new(&stores, &CacheStats::default());

        let json = serde_json::to_string(&overview).unwrap();
        assert!(json.contains("responses"));
        assert!(json.contains("aggregate"));
        assert!(json.contains("evictions"));
    }

    #[test]
    fn test_reset_response_serialize() {
        let resp = ResetResponse::new("Cache entries cleared");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("cleared"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("Something went wrong");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("error"));
        assert!(json.contains("Something went wrong"));
    }
}
