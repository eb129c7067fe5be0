//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the HTTP endpoints and the schema wrappers for the
//! response envelope. Swagger UI serves it at `/docs` in debug builds.

use utoipa::OpenApi;

use crate::inbound::http::health::HealthStatus;
use crate::inbound::http::index::Greeting;
use crate::inbound::http::schemas::{EnvelopeSchema, FieldErrorSchema};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Minimus API",
        description = "Service skeleton exposing health and greeting endpoints. \
                       Every reply uses the `{code, message, data}` envelope."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::index::index,
        crate::inbound::http::health::healthz,
    ),
    components(schemas(EnvelopeSchema, FieldErrorSchema, HealthStatus, Greeting)),
    tags(
        (name = "status", description = "Liveness and greeting endpoints")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // utoipa replaces :: with . in schema names
    const ENVELOPE_SCHEMA_NAME: &str = "crate.domain.ResponseEnvelope";

    #[rstest]
    fn envelope_schema_has_exactly_three_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;

        let Some(RefOr::T(Schema::Object(envelope))) = schemas.get(ENVELOPE_SCHEMA_NAME) else {
            panic!("expected envelope object schema");
        };
        let mut fields: Vec<_> = envelope.properties.keys().map(String::as_str).collect();
        fields.sort_unstable();
        assert_eq!(fields, ["code", "data", "message"]);
    }

    #[rstest]
    #[case("/")]
    #[case("/api/status/healthz")]
    fn endpoints_are_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();

        assert!(doc.paths.paths.contains_key(path), "{path} missing");
    }
}
