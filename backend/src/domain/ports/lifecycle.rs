//! Lifecycle contract shared by the database, cache and object-store clients.
//!
//! Every client owns at most one live handle. `init` builds it, `shutdown`
//! drops it, and the client's accessor refuses to hand out a handle outside
//! that window.

use async_trait::async_trait;

/// Errors raised while bringing a client up or reaching its handle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    /// The backing service could not be reached.
    #[error("{component} connection failed: {message}")]
    Connection { component: String, message: String },
    /// Settings do not describe a usable client.
    #[error("{component} is misconfigured: {message}")]
    Configuration { component: String, message: String },
    /// The handle was requested before `init` or after `shutdown`.
    #[error("{component} is not initialised; call init() first")]
    Uninitialised { component: String },
}

impl LifecycleError {
    /// Create a connection error for the named component.
    pub fn connection(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Connection {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error for the named component.
    pub fn configuration(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create an uninitialised-access error for the named component.
    pub fn uninitialised(component: impl Into<String>) -> Self {
        Self::Uninitialised {
            component: component.into(),
        }
    }
}

/// Client with an explicit init/shutdown lifecycle.
///
/// Both operations are idempotent: a second `init` logs a warning and
/// succeeds without reconnecting, and `shutdown` on a client that holds no
/// handle does nothing.
#[async_trait]
pub trait ManagedClient: Send + Sync {
    /// Stable component name used in logs and errors.
    fn component(&self) -> &'static str;

    /// Establish the underlying connection.
    async fn init(&self) -> Result<(), LifecycleError>;

    /// Release the underlying connection.
    async fn shutdown(&self);

    /// Whether a live handle is currently held.
    fn is_initialised(&self) -> bool;
}
