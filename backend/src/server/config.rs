//! HTTP server configuration object.

use std::net::SocketAddr;

use crate::settings::Settings;

/// Builder-style configuration for creating the HTTP server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    bind_addr: SocketAddr,
    workers: Option<usize>,
}

impl ServerConfig {
    /// Bind to `bind_addr` with actix's default worker count.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            workers: None,
        }
    }

    /// Take the bind address from settings.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.bind_addr)
    }

    /// Override the number of worker threads.
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Configured worker count, if overridden.
    #[must_use]
    pub fn workers(&self) -> Option<usize> {
        self.workers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn defaults_leave_workers_to_actix() {
        let config = ServerConfig::new("127.0.0.1:8000".parse().expect("valid address"));

        assert_eq!(config.workers(), None);
        assert_eq!(config.bind_addr().port(), 8000);
        assert_eq!(config.with_workers(2).workers(), Some(2));
    }
}
