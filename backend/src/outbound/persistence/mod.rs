//! PostgreSQL adapter using Diesel with async support.
//!
//! Connections are pooled through `bb8` via `diesel-async`. The
//! [`PostgresClient`] owns the pool for the life of the process and is the
//! only way request handlers reach the database.
//!
//! # Example
//!
//! ```ignore
//! use minimus::outbound::persistence::{PoolConfig, PostgresClient};
//!
//! let client = PostgresClient::new(PoolConfig::new("postgres://localhost/minimus"));
//! client.init().await?;
//! let pool = client.pool()?;
//! ```

mod pool;
mod postgres;

pub use pool::{APPLICATION_NAME, DbPool, PoolConfig, PoolError};
pub use postgres::{PostgresClient, SessionError};
