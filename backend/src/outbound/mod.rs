//! Outbound adapters owning connections to external infrastructure.
//!
//! - **persistence**: PostgreSQL pool and transactional sessions (Diesel)
//! - **cache**: Redis pool, liveness probe and passthrough commands
//! - **object_store**: S3-compatible object storage client
//!
//! Each adapter implements [`crate::domain::ports::ManagedClient`] so the
//! application context can bring them up and down uniformly. They contain no
//! business logic.

pub mod cache;
pub mod object_store;
pub mod persistence;
mod slot;
