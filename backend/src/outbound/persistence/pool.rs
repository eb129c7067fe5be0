//! Async PostgreSQL connection pool built on `diesel-async` and `bb8`.

use std::time::Duration;

use diesel::ConnectionResult;
use diesel::connection::InstrumentationEvent;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};
use diesel_async::pooled_connection::{AsyncDieselConnectionManager, ManagerConfig};
use diesel_async::{AsyncConnection, AsyncPgConnection};
use futures_util::FutureExt as _;
use futures_util::future::BoxFuture;
use tracing::debug;
use url::Url;

/// Name reported to PostgreSQL in `pg_stat_activity`.
pub const APPLICATION_NAME: &str = "minimus_api";

/// Errors raised while building the pool or checking out connections.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// Failed to check out a connection from the pool.
    #[error("failed to get connection from pool: {message}")]
    Checkout { message: String },

    /// Failed to build the connection pool.
    #[error("failed to build connection pool: {message}")]
    Build { message: String },
}

impl PoolError {
    /// Create a checkout error with the given message.
    pub fn checkout(message: impl Into<String>) -> Self {
        Self::Checkout {
            message: message.into(),
        }
    }

    /// Create a build error with the given message.
    pub fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }
}

/// Pool sizing and connection target.
///
/// Defaults: 10 connections, 2 idle, 30 second checkout timeout, no query
/// logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
    min_idle: Option<u32>,
    connection_timeout: Duration,
    log_queries: bool,
}

impl PoolConfig {
    /// Create a configuration for the given database URL.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: 10,
            min_idle: Some(2),
            connection_timeout: Duration::from_secs(30),
            log_queries: false,
        }
    }

    /// Set the maximum number of pooled connections.
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self
    }

    /// Set the number of idle connections kept open.
    pub fn with_min_idle(mut self, min_idle: Option<u32>) -> Self {
        self.min_idle = min_idle;
        self
    }

    /// Set the checkout timeout.
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Emit every executed statement as a `debug` event.
    pub fn with_query_logging(mut self, enabled: bool) -> Self {
        self.log_queries = enabled;
        self
    }

    /// Whether executed statements are logged.
    pub fn logs_queries(&self) -> bool {
        self.log_queries
    }

    /// Database URL as configured.
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Database URL tagged with [`APPLICATION_NAME`] unless the caller set one.
    ///
    /// # Errors
    ///
    /// Returns `PoolError::Build` when the URL cannot be parsed.
    pub fn connection_url(&self) -> Result<String, PoolError> {
        let mut url = Url::parse(&self.database_url)
            .map_err(|err| PoolError::build(format!("invalid database URL: {err}")))?;
        let has_name = url.query_pairs().any(|(key, _)| key == "application_name");
        if !has_name {
            url.query_pairs_mut()
                .append_pair("application_name", APPLICATION_NAME);
        }
        Ok(url.into())
    }
}

/// Cloneable handle to the pool; clones share connections.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Build a pool from the configuration.
    ///
    /// # Errors
    ///
    /// Returns `PoolError::Build` for an unparsable URL or when the initial
    /// idle connections cannot be opened.
    pub async fn connect(config: &PoolConfig) -> Result<Self, PoolError> {
        let url = config.connection_url()?;
        let manager = if config.log_queries {
            let mut manager_config = ManagerConfig::<AsyncPgConnection>::default();
            manager_config.custom_setup = Box::new(establish_with_query_log);
            AsyncDieselConnectionManager::new_with_config(url, manager_config)
        } else {
            AsyncDieselConnectionManager::<AsyncPgConnection>::new(url)
        };

        let pool = Pool::builder()
            .max_size(config.max_size)
            .min_idle(config.min_idle)
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .await
            .map_err(|err| PoolError::build(err.to_string()))?;

        Ok(Self { inner: pool })
    }

    /// Check out a connection.
    ///
    /// # Errors
    ///
    /// Returns `PoolError::Checkout` when no connection is available within
    /// the configured timeout.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| PoolError::checkout(err.to_string()))
    }
}

fn establish_with_query_log(url: &str) -> BoxFuture<'_, ConnectionResult<AsyncPgConnection>> {
    async move {
        let mut conn = AsyncPgConnection::establish(url).await?;
        conn.set_instrumentation(log_query);
        Ok(conn)
    }
    .boxed()
}

fn log_query(event: InstrumentationEvent<'_>) {
    if let InstrumentationEvent::FinishQuery { query, error, .. } = event {
        match error {
            Some(error) => debug!(%query, %error, "query failed"),
            None => debug!(%query, "query executed"),
        }
    }
}
