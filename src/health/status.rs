//! Health classification and remediation hints.

use std::fmt;

use serde::Serialize;

use crate::cache::CacheStats;
use crate::health::PoolSnapshot;

// == Thresholds ==
/// Aggregate hit rate below which the cache is critical.
pub const HIT_RATE_CRITICAL: f64 = 0.5;
/// Aggregate hit rate below which the cache is degraded.
pub const HIT_RATE_DEGRADED: f64 = 0.8;
/// Pool usage above which the service is critical.
pub const POOL_USAGE_CRITICAL: f64 = 0.9;
/// Pool usage above which the service is degraded.
pub const POOL_USAGE_DEGRADED: f64 = 0.75;
/// Evictions per write above which capacity is flagged.
pub const EVICTION_RATE_WARNING: f64 = 0.1;

// == Health Status ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Critical,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Degraded => "degraded",
            HealthStatus::Critical => "critical",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// == Health Input ==
/// The signals health is judged on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthInput {
    /// Aggregate hits / (hits + misses)
    pub hit_rate: f64,
    /// Aggregate hits + misses; with zero lookups the hit rate is not judged
    pub lookups: u64,
    /// Aggregate evictions / sets
    pub eviction_rate: f64,
    /// Active / total pool connections
    pub pool_usage: f64,
}

impl HealthInput {
    pub fn new(aggregate: &CacheStats, pool: &PoolSnapshot) -> Self {
        Self {
            hit_rate: aggregate.hit_rate(),
            lookups: aggregate.lookups(),
            eviction_rate: aggregate.eviction_rate(),
            pool_usage: pool.usage(),
        }
    }

    fn hit_rate_below(&self, threshold: f64) -> bool {
        self.lookups > 0 && self.hit_rate < threshold
    }
}

/// Classifies aggregate health. The worst violated threshold wins.
pub fn calculate_health_status(input: &HealthInput) -> HealthStatus {
    if input.hit_rate_below(HIT_RATE_CRITICAL) || input.pool_usage > POOL_USAGE_CRITICAL {
        HealthStatus::Critical
    } else if input.hit_rate_below(HIT_RATE_DEGRADED) || input.pool_usage > POOL_USAGE_DEGRADED {
        HealthStatus::Degraded
    } else {
        HealthStatus::Healthy
    }
}

/// One remediation hint per violated threshold, in a fixed order: hit rate,
/// eviction rate, pool pressure.
pub fn generate_recommendations(input: &HealthInput) -> Vec<String> {
    let mut recommendations = Vec::new();

    if input.hit_rate_below(HIT_RATE_DEGRADED) {
        recommendations.push(format!(
            "Cache hit rate is {:.1}% (target {:.0}%): review TTLs and check that equivalent requests fingerprint to the same key",
            input.hit_rate * 100.0,
            HIT_RATE_DEGRADED * 100.0
        ));
    }

    if input.eviction_rate > EVICTION_RATE_WARNING {
        recommendations.push(format!(
            "Eviction rate is {:.1}% of writes: raise store capacity or shorten TTLs of large views",
            input.eviction_rate * 100.0
        ));
    }

    if input.pool_usage > POOL_USAGE_DEGRADED {
        recommendations.push(format!(
            "Connection pool usage is {:.1}%: increase the pool size or cache more read-heavy queries",
            input.pool_usage * 100.0
        ));
    }

    if recommendations.is_empty() {
        recommendations.push("All cache and pool metrics are within healthy thresholds".to_string());
    }

    recommendations
}
