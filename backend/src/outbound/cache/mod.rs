//! Redis cache adapter.
//!
//! Wraps a `bb8-redis` pool behind the lifecycle contract and exposes a thin
//! set of passthrough commands. Values are plain strings; callers own any
//! serialisation and key naming. No eviction or TTL policy lives here beyond
//! what the caller passes to each command.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use bb8_redis::bb8::Pool;
use bb8_redis::redis::{self, Cmd, FromRedisValue};
use bb8_redis::RedisConnectionManager;
use tracing::{debug, warn};

use crate::domain::ports::{CacheHealth, LifecycleError, ManagedClient};
use crate::outbound::slot::ClientSlot;

const COMPONENT: &str = "redis";

/// Errors raised by cache commands.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CacheError {
    /// The client has not been initialised.
    #[error(transparent)]
    Unavailable(#[from] LifecycleError),
    /// No pooled connection could be obtained.
    #[error("cache connection checkout failed: {message}")]
    Checkout { message: String },
    /// Redis rejected or failed a command.
    #[error("cache command {command} failed: {message}")]
    Command {
        command: &'static str,
        message: String,
    },
}

impl CacheError {
    fn checkout(message: impl Into<String>) -> Self {
        Self::Checkout {
            message: message.into(),
        }
    }

    fn command(command: &'static str, message: impl Into<String>) -> Self {
        Self::Command {
            command,
            message: message.into(),
        }
    }
}

/// Connection target and pool sizing for Redis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedisConfig {
    host: String,
    port: u16,
    db: i64,
    max_size: u32,
    connection_timeout: Duration,
}

impl RedisConfig {
    /// Create a configuration for `host:port`, database `db`.
    pub fn new(host: impl Into<String>, port: u16, db: i64) -> Self {
        Self {
            host: host.into(),
            port,
            db,
            max_size: 10,
            connection_timeout: Duration::from_secs(5),
        }
    }

    /// Set the maximum number of pooled connections.
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self
    }

    /// Set the checkout timeout.
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Connection URL in `redis://host:port/db` form.
    pub fn url(&self) -> String {
        format!("redis://{}:{}/{}", self.host, self.port, self.db)
    }
}

type RedisPool = Pool<RedisConnectionManager>;

/// Redis client owning one pool for the process.
pub struct RedisCache {
    config: RedisConfig,
    slot: ClientSlot<RedisPool>,
}

impl RedisCache {
    /// Create an uninitialised client.
    pub fn new(config: RedisConfig) -> Self {
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
    pub fn pool(&self) -> Result<RedisPool, LifecycleError> {
        self.slot.get()
    }

    async fn connect(&self) -> Result<RedisPool, LifecycleError> {
        let manager = RedisConnectionManager::new(self.config.url())
            .map_err(|err| LifecycleError::configuration(COMPONENT, err.to_string()))?;
        let pool = Pool::builder()
            .max_size(self.config.max_size)
            .connection_timeout(self.config.connection_timeout)
            .build(manager)
            .await
            .map_err(|err| LifecycleError::connection(COMPONENT, err.to_string()))?;

        ping(&pool)
            .await
            .map_err(|err| LifecycleError::connection(COMPONENT, err.to_string()))?;
        Ok(pool)
    }

    async fn run<T: FromRedisValue>(&self, name: &'static str, cmd: &Cmd) -> Result<T, CacheError> {
        let pool = self.pool()?;
        query(&pool, name, cmd).await
    }

    /// `GET key`.
    pub async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut cmd = redis::cmd("GET");
        cmd.arg(key);
        self.run("GET", &cmd).await
    }

    /// `SET key value EX seconds`.
    pub async fn set_ex(&self, key: &str, value: &str, seconds: u64) -> Result<(), CacheError> {
        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(value).arg("EX").arg(seconds);
        self.run::<()>("SET", &cmd).await
    }

    /// `SET key value NX EX seconds`; `true` when the key was written.
    pub async fn set_nx_ex(&self, key: &str, value: &str, seconds: u64) -> Result<bool, CacheError> {
        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(value).arg("NX").arg("EX").arg(seconds);
        let reply: Option<String> = self.run("SET", &cmd).await?;
        Ok(reply.is_some())
    }

    /// `DEL key`; `true` when a key was removed.
    pub async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        let mut cmd = redis::cmd("DEL");
        cmd.arg(key);
        let removed: i64 = self.run("DEL", &cmd).await?;
        Ok(removed > 0)
    }

    /// `EXISTS key`.
    pub async fn exists(&self, key: &str) -> Result<bool, CacheError> {
        let mut cmd = redis::cmd("EXISTS");
        cmd.arg(key);
        let count: i64 = self.run("EXISTS", &cmd).await?;
        Ok(count > 0)
    }

    /// `INCRBY key amount`, returning the new value.
    pub async fn incr_by(&self, key: &str, amount: i64) -> Result<i64, CacheError> {
        let mut cmd = redis::cmd("INCRBY");
        cmd.arg(key).arg(amount);
        self.run("INCRBY", &cmd).await
    }

    /// `DECRBY key amount`, returning the new value.
    pub async fn decr_by(&self, key: &str, amount: i64) -> Result<i64, CacheError> {
        let mut cmd = redis::cmd("DECRBY");
        cmd.arg(key).arg(amount);
        self.run("DECRBY", &cmd).await
    }

    /// `HGET key field`.
    pub async fn hget(&self, key: &str, field: &str) -> Result<Option<String>, CacheError> {
        let mut cmd = redis::cmd("HGET");
        cmd.arg(key).arg(field);
        self.run("HGET", &cmd).await
    }

    /// `HSET key field value`.
    pub async fn hset(&self, key: &str, field: &str, value: &str) -> Result<(), CacheError> {
        let mut cmd = redis::cmd("HSET");
        cmd.arg(key).arg(field).arg(value);
        self.run::<i64>("HSET", &cmd).await.map(drop)
    }

    /// `HSETNX key field value`; `true` when the field was written.
    pub async fn hset_nx(&self, key: &str, field: &str, value: &str) -> Result<bool, CacheError> {
        let mut cmd = redis::cmd("HSETNX");
        cmd.arg(key).arg(field).arg(value);
        self.run("HSETNX", &cmd).await
    }

    /// `HGETALL key`.
    pub async fn hgetall(&self, key: &str) -> Result<HashMap<String, String>, CacheError> {
        let mut cmd = redis::cmd("HGETALL");
        cmd.arg(key);
        self.run("HGETALL", &cmd).await
    }

    /// `HDEL key field`; `true` when the field existed.
    pub async fn hdel(&self, key: &str, field: &str) -> Result<bool, CacheError> {
        let mut cmd = redis::cmd("HDEL");
        cmd.arg(key).arg(field);
        let removed: i64 = self.run("HDEL", &cmd).await?;
        Ok(removed > 0)
    }

    /// `HKEYS key`.
    pub async fn hkeys(&self, key: &str) -> Result<Vec<String>, CacheError> {
        let mut cmd = redis::cmd("HKEYS");
        cmd.arg(key);
        self.run("HKEYS", &cmd).await
    }

    /// `HLEN key`.
    pub async fn hlen(&self, key: &str) -> Result<u64, CacheError> {
        let mut cmd = redis::cmd("HLEN");
        cmd.arg(key);
        self.run("HLEN", &cmd).await
    }

    /// `KEYS pattern`. Scans the whole keyspace; keep off hot paths.
    pub async fn keys(&self, pattern: &str) -> Result<Vec<String>, CacheError> {
        let mut cmd = redis::cmd("KEYS");
        cmd.arg(pattern);
        self.run("KEYS", &cmd).await
    }

    /// `TTL key` in seconds; `-1` without expiry, `-2` when missing.
    pub async fn ttl(&self, key: &str) -> Result<i64, CacheError> {
        let mut cmd = redis::cmd("TTL");
        cmd.arg(key);
        self.run("TTL", &cmd).await
    }

    /// `EXPIRE key seconds`; `true` when the timeout was set.
    pub async fn expire(&self, key: &str, seconds: i64) -> Result<bool, CacheError> {
        let mut cmd = redis::cmd("EXPIRE");
        cmd.arg(key).arg(seconds);
        self.run("EXPIRE", &cmd).await
    }
}

async fn query<T: FromRedisValue>(
    pool: &RedisPool,
    name: &'static str,
    cmd: &Cmd,
) -> Result<T, CacheError> {
    let mut conn = pool
        .get()
        .await
        .map_err(|err| CacheError::checkout(err.to_string()))?;
    debug!(command = name, "running cache command");
    cmd.query_async(&mut *conn)
        .await
        .map_err(|err| CacheError::command(name, err.to_string()))
}

async fn ping(pool: &RedisPool) -> Result<(), CacheError> {
    let reply: String = query(pool, "PING", &redis::cmd("PING")).await?;
    if reply == "PONG" {
        Ok(())
    } else {
        Err(CacheError::command("PING", format!("unexpected reply {reply}")))
    }
}

#[async_trait]
impl ManagedClient for RedisCache {
    fn component(&self) -> &'static str {
        self.slot.component()
    }

    async fn init(&self) -> Result<(), LifecycleError> {
        self.slot.init_with(|| self.connect()).await.map(drop)
    }

    async fn shutdown(&self) {
        drop(self.slot.take());
    }

    fn is_initialised(&self) -> bool {
        self.slot.is_initialised()
    }
}

#[async_trait]
impl CacheHealth for RedisCache {
    async fn is_alive(&self) -> bool {
        let Ok(pool) = self.pool() else {
            return false;
        };
        match ping(&pool).await {
            Ok(()) => true,
            Err(err) => {
                warn!(component = COMPONENT, error = %err, "cache liveness probe failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn unreachable() -> RedisCache {
        RedisCache::new(
            RedisConfig::new("127.0.0.1", 1, 0).with_connection_timeout(Duration::from_millis(500)),
        )
    }

    #[rstest]
    #[case(RedisConfig::new("localhost", 6379, 0), "redis://localhost:6379/0")]
    #[case(RedisConfig::new("cache.internal", 6380, 3), "redis://cache.internal:6380/3")]
    fn url_combines_host_port_and_db(#[case] config: RedisConfig, #[case] expected: &str) {
        assert_eq!(config.url(), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn probe_reports_dead_before_init(unreachable: RedisCache) {
        assert!(!unreachable.is_alive().await);
    }

    #[rstest]
    #[tokio::test]
    async fn commands_before_init_are_unavailable(unreachable: RedisCache) {
        let err = unreachable.get("key").await.expect_err("not initialised");

        assert_eq!(
            err,
            CacheError::Unavailable(LifecycleError::uninitialised(COMPONENT))
        );
    }

    #[rstest]
    #[tokio::test]
    async fn shutdown_twice_is_a_no_op(unreachable: RedisCache) {
        unreachable.shutdown().await;
        unreachable.shutdown().await;

        assert!(!unreachable.is_initialised());
        assert!(unreachable.pool().is_err());
    }

    #[rstest]
    #[tokio::test]
    async fn init_against_unreachable_server_reports_connection_error(unreachable: RedisCache) {
        let err = unreachable.init().await.expect_err("nothing listens on port 1");

        assert!(matches!(err, LifecycleError::Connection { .. }));
        assert!(!unreachable.is_initialised());
    }
}
