//! Domain primitives shared by adapters.
//!
//! Purpose: define the transport-agnostic pieces of the service: the
//! application error taxonomy, the response envelope and the ports through
//! which inbound adapters reach infrastructure.
//!
//! Public surface:
//! - AppError / ErrorKind: typed failures carrying business and HTTP codes.
//! - ResponseEnvelope: `{code, message, data}` wrapper for every reply.
//! - ports: lifecycle and liveness contracts for external clients.

pub mod envelope;
pub mod error;
pub mod ports;

pub use self::envelope::ResponseEnvelope;
pub use self::error::{AppError, ErrorKind};
