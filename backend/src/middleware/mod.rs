//! Request middleware.
//!
//! Cross-cutting request concerns: correlation ids, access logging and
//! turning handler panics into ordinary error responses.

pub mod panic;
pub mod trace;

pub use panic::CatchPanic;
pub use trace::Trace;
