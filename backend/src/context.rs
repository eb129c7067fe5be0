//! Application context owning the external clients.
//!
//! Built once at startup and shared with handlers through `web::Data`.
//! Clients start in dependency order (database, cache, object store) and
//! stop in reverse.

use std::sync::Arc;

use tracing::info;

use crate::domain::ports::{CacheHealth, LifecycleError, ManagedClient};
use crate::outbound::cache::RedisCache;
use crate::outbound::object_store::ObjectStore;
use crate::outbound::persistence::PostgresClient;
use crate::settings::Settings;

/// Lifecycle-managed clients shared across the process.
#[derive(Clone)]
pub struct AppContext {
    database: Arc<PostgresClient>,
    cache: Arc<RedisCache>,
    object_store: Arc<ObjectStore>,
}

impl AppContext {
    /// Construct uninitialised clients from settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            database: Arc::new(PostgresClient::new(settings.pool_config())),
            cache: Arc::new(RedisCache::new(settings.redis_config())),
            object_store: Arc::new(ObjectStore::new(settings.object_store_config())),
        }
    }

    /// PostgreSQL client.
    pub fn database(&self) -> &Arc<PostgresClient> {
        &self.database
    }

    /// Redis client.
    pub fn cache(&self) -> &Arc<RedisCache> {
        &self.cache
    }

    /// Object storage client.
    pub fn object_store(&self) -> &Arc<ObjectStore> {
        &self.object_store
    }

    /// Cache liveness probe for the health endpoint.
    pub fn cache_health(&self) -> Arc<dyn CacheHealth> {
        self.cache.clone()
    }

    fn clients(&self) -> [&dyn ManagedClient; 3] {
        [
            self.database.as_ref(),
            self.cache.as_ref(),
            self.object_store.as_ref(),
        ]
    }

    /// Initialise every client, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the failing client's [`LifecycleError`]; clients started
    /// before it stay initialised so [`AppContext::shutdown`] can release
    /// them.
    pub async fn init(&self) -> Result<(), LifecycleError> {
        for client in self.clients() {
            client.init().await?;
        }
        info!("application context initialised");
        Ok(())
    }

    /// Shut every client down in reverse order. Safe to call repeatedly.
    pub async fn shutdown(&self) {
        for client in self.clients().into_iter().rev() {
            client.shutdown().await;
        }
        info!("application context shut down");
    }
}
