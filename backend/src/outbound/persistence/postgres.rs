//! Lifecycle-managed PostgreSQL client.
//!
//! Owns the connection pool and hands out transactional sessions. A session
//! commits when its callback returns `Ok` and rolls back on `Err`; if the
//! request future is dropped mid-transaction the pool discards the broken
//! connection instead of reusing it.

use async_trait::async_trait;
use diesel::result::Error as DieselError;
use diesel_async::scoped_futures::ScopedBoxFuture;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};
use tracing::info;

use super::pool::{DbPool, PoolConfig, PoolError};
use crate::domain::ports::{LifecycleError, ManagedClient};
use crate::outbound::slot::ClientSlot;

const COMPONENT: &str = "postgres";
const UUID_EXTENSION_SQL: &str = r#"CREATE EXTENSION IF NOT EXISTS "uuid-ossp";"#;

/// Failures surfaced by [`PostgresClient::with_session`].
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The client has not been initialised.
    #[error(transparent)]
    Unavailable(#[from] LifecycleError),
    /// No connection could be checked out.
    #[error(transparent)]
    Checkout(#[from] PoolError),
    /// A statement inside the session failed.
    #[error("database query failed: {0}")]
    Query(#[from] DieselError),
}

/// PostgreSQL client owning one pool for the process.
pub struct PostgresClient {
    config: PoolConfig,
    slot: ClientSlot<DbPool>,
}

impl PostgresClient {
    /// Create an uninitialised client.
    pub fn new(config: PoolConfig) -> Self {
        Self {
            config,
            slot: ClientSlot::new(COMPONENT),
        }
    }

    /// Live pool handle.
    ///
    /// # Errors
    ///
    /// Returns `LifecycleError::Uninitialised` before `init` or after
    /// `shutdown`.
    pub fn pool(&self) -> Result<DbPool, LifecycleError> {
        self.slot.get()
    }

    /// Run `callback` inside a transaction on a pooled connection.
    ///
    /// # Examples
    /// ```ignore
    /// use diesel_async::scoped_futures::ScopedFutureExt as _;
    ///
    /// let rows = client
    ///     .with_session(|conn| async move { demos::table.count().get_result(conn).await.map_err(Into::into) }.scope_boxed())
    ///     .await?;
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Unavailable` before `init`, `Checkout` when the
    /// pool is exhausted, or whatever error the callback produced (after
    /// rolling back).
    pub async fn with_session<'a, R, F>(&self, callback: F) -> Result<R, SessionError>
    where
        F: for<'r> FnOnce(&'r mut AsyncPgConnection) -> ScopedBoxFuture<'a, 'r, Result<R, SessionError>>
            + Send
            + 'a,
        R: Send + 'a,
    {
        let pool = self.pool()?;
        let mut pooled = pool.get().await?;
        let conn: &mut AsyncPgConnection = &mut pooled;
        conn.transaction(callback).await
    }

    async fn connect(&self) -> Result<DbPool, LifecycleError> {
        info!(component = COMPONENT, "connecting to PostgreSQL");
        let pool = DbPool::connect(&self.config)
            .await
            .map_err(|err| LifecycleError::connection(COMPONENT, err.to_string()))?;

        let mut conn = pool
            .get()
            .await
            .map_err(|err| LifecycleError::connection(COMPONENT, err.to_string()))?;
        diesel::sql_query(UUID_EXTENSION_SQL)
            .execute(&mut conn)
            .await
            .map_err(|err| LifecycleError::connection(COMPONENT, err.to_string()))?;
        drop(conn);
        info!(component = COMPONENT, "uuid-ossp extension ensured");

        Ok(pool)
    }
}

#[async_trait]
impl ManagedClient for PostgresClient {
    fn component(&self) -> &'static str {
        self.slot.component()
    }

    async fn init(&self) -> Result<(), LifecycleError> {
        self.slot.init_with(|| self.connect()).await.map(drop)
    }

    async fn shutdown(&self) {
        // Dropping the last pool handle closes its idle connections.
        drop(self.slot.take());
    }

    fn is_initialised(&self) -> bool {
        self.slot.is_initialised()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel_async::scoped_futures::ScopedFutureExt as _;
    use rstest::rstest;
    use std::time::Duration;

    fn unreachable_client() -> PostgresClient {
        PostgresClient::new(
            PoolConfig::new("postgresql://user:pw@127.0.0.1:1/minimus")
                .with_min_idle(None)
                .with_connection_timeout(Duration::from_millis(500)),
        )
    }

    #[rstest]
    fn pool_before_init_is_uninitialised() {
        let client = unreachable_client();

        assert_eq!(
            client.pool().err(),
            Some(LifecycleError::uninitialised(COMPONENT))
        );
    }

    #[rstest]
    #[tokio::test]
    async fn shutdown_twice_is_a_no_op() {
        let client = unreachable_client();

        client.shutdown().await;
        client.shutdown().await;

        assert!(!client.is_initialised());
        assert!(client.pool().is_err());
    }

    #[rstest]
    #[tokio::test]
    async fn init_against_unreachable_server_reports_connection_error() {
        let client = unreachable_client();

        let err = client.init().await.expect_err("nothing listens on port 1");

        assert!(matches!(err, LifecycleError::Connection { .. }));
        assert!(!client.is_initialised());
    }

    #[rstest]
    #[tokio::test]
    async fn session_before_init_is_unavailable() {
        let client = unreachable_client();

        let result = client
            .with_session(|_conn| async move { Ok(()) }.scope_boxed())
            .await;

        assert!(matches!(
            result,
            Err(SessionError::Unavailable(LifecycleError::Uninitialised { .. }))
        ));
    }
}
