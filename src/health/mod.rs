//! Health Module
//!
//! Classifies aggregate cache and connection-pool health for operators.

mod pool;
mod report;
mod status;

pub use pool::{PoolSnapshot, ResourcePoolMonitor};
pub use report::{CacheHealth, HealthReport, PoolReport};
pub use status::{
    calculate_health_status, generate_recommendations, HealthInput, HealthStatus,
    EVICTION_RATE_WARNING, HIT_RATE_CRITICAL, HIT_RATE_DEGRADED, POOL_USAGE_CRITICAL,
    POOL_USAGE_DEGRADED,
};
