//! Domain ports through which adapters reach external clients.

mod cache_health;
mod lifecycle;

#[cfg(test)]
pub use cache_health::MockCacheHealth;
pub use cache_health::{CacheHealth, FixtureCacheHealth};
pub use lifecycle::{LifecycleError, ManagedClient};
