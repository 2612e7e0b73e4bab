//! Resource pool gauges fed by the database layer.

use std::sync::atomic::{AtomicU32, Ordering};

use serde::Serialize;

/// Point-in-time view of a connection pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PoolSnapshot {
    pub total: u32,
    pub active: u32,
    pub idle: u32,
    pub waiting: u32,
}

impl PoolSnapshot {
    /// Fraction of connections in use, 0.0 for an empty pool.
    pub fn usage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            f64::from(self.active) / f64::from(self.total)
        }
    }
}

/// Lock-free gauges updated by whoever owns the pool.
#[derive(Debug, Default)]
pub struct ResourcePoolMonitor {
    total: AtomicU32,
    active: AtomicU32,
    idle: AtomicU32,
    waiting: AtomicU32,
}

impl ResourcePoolMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, snapshot: PoolSnapshot) {
        self.total.store(snapshot.total, Ordering::Relaxed);
        self.active.store(snapshot.active, Ordering::Relaxed);
        self.idle.store(snapshot.idle, Ordering::Relaxed);
        self.waiting.store(snapshot.waiting, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> PoolSnapshot {
        PoolSnapshot {
            total: self.total.load(Ordering::Relaxed),
            active: self.active.load(Ordering::Relaxed),
            idle: self.idle.load(Ordering::Relaxed),
            waiting: self.waiting.load(Ordering::Relaxed),
        }
    }

    pub fn usage(&self) -> f64 {
        self.snapshot().usage()
    }
}
