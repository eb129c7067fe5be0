//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework-agnostic by not deriving `ToSchema`; the
//! wrappers here mirror their wire shape for documentation only.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ResponseEnvelope`].
///
/// Every reply body, success or failure, has exactly these three fields.
#[derive(ToSchema)]
#[schema(as = crate::domain::ResponseEnvelope)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct EnvelopeSchema {
    /// Business code; 200 on success.
    #[schema(example = 200)]
    code: i32,
    /// Human-readable message.
    #[schema(example = "success")]
    message: String,
    /// Payload; an empty object when there is none.
    #[schema(value_type = Object)]
    data: serde_json::Value,
}

/// OpenAPI schema for [`crate::inbound::http::error::FieldError`].
///
/// Validation failures carry a JSON-encoded list of these in `message`.
#[derive(ToSchema)]
#[schema(as = crate::inbound::http::error::FieldError)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct FieldErrorSchema {
    /// Path to the offending input.
    #[schema(example = json!(["body"]))]
    loc: Vec<String>,
    /// Description of the problem.
    msg: String,
    /// Machine-readable category.
    #[schema(rename = "type", example = "json_invalid")]
    kind: String,
}
