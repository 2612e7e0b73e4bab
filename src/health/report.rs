//! Operator-facing health report.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use crate::cache::CacheManager;
use crate::health::status::{calculate_health_status, generate_recommendations, HealthInput};
use crate::health::{HealthStatus, PoolSnapshot, ResourcePoolMonitor};
use crate::models::StatsResponse;

#[derive(Debug, Clone, Serialize)]
pub struct CacheHealth {
    pub individual: BTreeMap<String, StatsResponse>,
    pub aggregate: StatsResponse,
}

#[derive(Debug, Clone, Serialize)]
pub struct PoolReport {
    #[serde(flatten)]
    pub snapshot: PoolSnapshot,
    pub usage: f64,
}

/// Everything `GET /health` returns.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: HealthStatus,
    pub caches: CacheHealth,
    pub resource_pool: PoolReport,
    pub recommendations: Vec<String>,
    /// RFC 3339 time the report was built
    pub timestamp: String,
}

impl HealthReport {
    /// Reads current statistics and classifies them.
    pub fn collect(manager: &CacheManager, pool: &ResourcePoolMonitor) -> Self {
        let individual = manager.get_all_stats();
        let aggregate = manager.aggregate_stats();
        let snapshot = pool.snapshot();

        let input = HealthInput::new(&aggregate, &snapshot);
        let status = calculate_health_status(&input);
        if status != HealthStatus::Healthy {
            warn!(
                status = %status,
                hit_rate = input.hit_rate,
                eviction_rate = input.eviction_rate,
                pool_usage = input.pool_usage,
                "Cache health below target"
            );
        }

        Self {
            status,
            caches: CacheHealth {
                individual: individual
                    .iter()
                    .map(|(name, stats)| (name.clone(), StatsResponse::from(stats)))
                    .collect(),
                aggregate: StatsResponse::from(&aggregate),
            },
            resource_pool: PoolReport {
                snapshot,
                usage: input.pool_usage,
            },
            recommendations: generate_recommendations(&input),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::StoreConfig;
    use serde_json::json;
    use std::time::Duration;

    #[test]
    fn test_collect_reports_every_store() {
        let manager = CacheManager::new();
        let config = StoreConfig::new(10, Duration::from_secs(60));
        let a = manager.get_or_create("a", config);
        manager.get_or_create("b", config);
        a.set("k", json!(1), None);
        for _ in 0..9 {
            a.get("k");
        }
        a.get("missing");

        let report = HealthReport::collect(&manager, &ResourcePoolMonitor::new());

        assert_eq!(report.status, HealthStatus::Healthy);
        assert_eq!(report.caches.individual.len(), 2);
        assert_eq!(report.caches.aggregate.hits, 9);
        assert!((report.caches.aggregate.hit_rate - 0.9).abs() < 1e-9);
        assert_eq!(report.recommendations.len(), 1);
    }

    #[test]
    fn test_collect_flags_pool_pressure() {
        let manager = CacheManager::new();
        let pool = ResourcePoolMonitor::new();
        pool.record(PoolSnapshot {
            total: 10,
            active: 10,
            idle: 0,
            waiting: 4,
        });

        let report = HealthReport::collect(&manager, &pool);

        assert_eq!(report.status, HealthStatus::Critical);
        assert_eq!(report.resource_pool.usage, 1.0);
    }

    #[test]
    fn test_report_json_shape() {
        let report = HealthReport::collect(&CacheManager::new(), &ResourcePoolMonitor::new());
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["status"], "healthy");
        assert!(value["caches"]["individual"].is_object());
        assert!(value["caches"]["aggregate"]["hit_rate"].is_number());
        assert_eq!(value["resourcePool"]["total"], 0);
        assert!(value["recommendations"].is_array());
        assert!(value["timestamp"].is_string());
    }
}
