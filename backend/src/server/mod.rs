//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use actix_cors::Cors;
use actix_web::body::MessageBody;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use crate::context::AppContext;
#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::inbound::http::extractors::not_found;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::configure;
use crate::middleware::{CatchPanic, Trace};

/// Assemble the application: routes, extractor hooks, not-found fallback and
/// middleware.
///
/// Middleware runs outermost first: CORS, then [`Trace`], then
/// [`CatchPanic`] around the handlers. A caught panic reaches [`Trace`] as an
/// error, is logged there, and is rendered by actix through [`ApiError`].
///
/// [`ApiError`]: crate::inbound::http::ApiError
pub fn build_app(
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(http_state)
        .configure(configure)
        .default_service(web::to(not_found));

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app.wrap(CatchPanic).wrap(Trace).wrap(Cors::permissive())
}

/// Construct an Actix HTTP server around the initialised `context`.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(context: &AppContext, config: ServerConfig) -> std::io::Result<Server> {
    let http_state = web::Data::new(HttpState::from_context(context));

    let server = HttpServer::new(move || build_app(http_state.clone()));
    let server = match config.workers() {
        Some(workers) => server.workers(workers),
        None => server,
    };

    Ok(server.bind(config.bind_addr())?.run())
}
