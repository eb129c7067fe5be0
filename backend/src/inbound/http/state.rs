//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they depend only
//! on domain ports and stay testable without I/O.

use std::sync::Arc;

use crate::context::AppContext;
use crate::domain::ports::CacheHealth;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub cache: Arc<dyn CacheHealth>,
}

impl HttpState {
    /// Bundle the given ports.
    pub fn new(cache: Arc<dyn CacheHealth>) -> Self {
        Self { cache }
    }

    /// Wire ports to the live clients held by `context`.
    pub fn from_context(context: &AppContext) -> Self {
        Self::new(context.cache_health())
    }
}
