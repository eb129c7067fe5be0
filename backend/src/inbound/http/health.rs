//! Health endpoint backed by the cache liveness probe.

use actix_web::web;
use serde::Serialize;
use utoipa::ToSchema;

use super::error::ApiResult;
use super::state::HttpState;
use crate::domain::{AppError, ResponseEnvelope};

/// Message returned when the cache probe fails.
pub const CACHE_DOWN_MESSAGE: &str = "Redis is not alive";

/// Payload of a healthy reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct HealthStatus {
    #[schema(example = "ok")]
    status: &'static str,
}

impl HealthStatus {
    const fn ok() -> Self {
        Self { status: "ok" }
    }
}

/// Report whether the service and its cache are reachable.
///
/// Replies 200 with `{status: "ok"}` when the cache answers a `PING`, and an
/// HTTP 500 envelope otherwise.
#[utoipa::path(
    get,
    path = "/api/status/healthz",
    responses(
        (status = 200, description = "Service healthy", body = crate::inbound::http::schemas::EnvelopeSchema),
        (status = 500, description = "Cache unreachable", body = crate::inbound::http::schemas::EnvelopeSchema)
    ),
    tags = ["status"],
    operation_id = "healthz"
)]
pub async fn healthz(
    state: web::Data<HttpState>,
) -> ApiResult<ResponseEnvelope<HealthStatus>> {
    if state.cache.is_alive().await {
        Ok(ResponseEnvelope::success(Some(HealthStatus::ok())))
    } else {
        Err(AppError::server_error(CACHE_DOWN_MESSAGE).into())
    }
}
