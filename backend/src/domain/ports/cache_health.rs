//! Liveness port consumed by the health endpoint.

use async_trait::async_trait;

/// Cheap reachability check for the cache backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheHealth: Send + Sync {
    /// Return `true` when the cache answers a round-trip.
    async fn is_alive(&self) -> bool;
}

/// Fixed-answer probe for tests and for running without a cache.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCacheHealth {
    alive: bool,
}

impl FixtureCacheHealth {
    /// Probe that always reports `alive`.
    pub const fn new(alive: bool) -> Self {
        Self { alive }
    }
}

#[async_trait]
impl CacheHealth for FixtureCacheHealth {
    async fn is_alive(&self) -> bool {
        self.alive
    }
}
