//! HTTP inbound adapter exposing REST endpoints.

pub mod error;
pub mod extractors;
pub mod health;
pub mod index;
mod responses;
pub mod schemas;
pub mod state;

use actix_web::web;

pub use error::{ApiError, ApiResult};

/// Register extractor hooks and every route.
///
/// The health endpoint is mounted under `/api`. Each endpoint is a resource
/// whose fallback answers other methods with 405.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(extractors::json_config())
        .app_data(extractors::query_config())
        .app_data(extractors::path_config())
        .app_data(extractors::form_config())
        .service(get_resource("/", index::index))
        .service(web::scope("/api").service(get_resource("/status/healthz", health::healthz)));
}

fn get_resource<F, Args>(path: &str, handler: F) -> actix_web::Resource
where
    F: actix_web::Handler<Args>,
    Args: actix_web::FromRequest + 'static,
    F::Output: actix_web::Responder + 'static,
{
    web::resource(path)
        .route(web::get().to(handler))
        .default_service(web::to(extractors::method_not_allowed))
}
