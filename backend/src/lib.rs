//! Minimus API backend.
//!
//! A service skeleton: settings from the environment, structured logging, a
//! uniform `{code, message, data}` response envelope, a typed error taxonomy
//! translated in one place, and lifecycle-managed PostgreSQL, Redis and
//! object storage clients.

pub mod context;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod logging;
pub mod middleware;
pub mod outbound;
pub mod server;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
