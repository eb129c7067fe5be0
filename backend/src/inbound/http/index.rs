//! Root greeting.

use actix_web::HttpResponse;
use serde::Serialize;
use utoipa::ToSchema;

/// Body of the root greeting.
#[derive(Debug, Serialize, ToSchema)]
pub struct Greeting {
    #[schema(example = "Hello, World!")]
    message: &'static str,
}

/// Greet callers of the root path.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Greeting", body = Greeting)),
    tags = ["status"],
    operation_id = "index"
)]
pub async fn index() -> HttpResponse {
    HttpResponse::Ok().json(Greeting {
        message: "Hello, World!",
    })
}
