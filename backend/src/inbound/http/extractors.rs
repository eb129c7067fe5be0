//! Extractor configuration routing rejections through [`ApiError`].
//!
//! Register these with `App::app_data` so malformed bodies, queries, paths
//! and forms are answered with the standard envelope instead of actix's
//! plain-text defaults.

use actix_web::{HttpResponse, web};

use super::error::{ApiError, ApiResult};

/// JSON body extractor configuration.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| ApiError::from(err).into())
}

/// Query string extractor configuration.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| ApiError::from(err).into())
}

/// Path segment extractor configuration.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| ApiError::from(err).into())
}

/// URL-encoded form extractor configuration.
pub fn form_config() -> web::FormConfig {
    web::FormConfig::default().error_handler(|err, _req| ApiError::from(err).into())
}

/// Default service for requests no route matched.
pub async fn not_found() -> ApiResult<HttpResponse> {
    Err(ApiError::not_found())
}

/// Default service for known paths called with an unsupported method.
pub async fn method_not_allowed() -> ApiResult<HttpResponse> {
    Err(ApiError::method_not_allowed())
}
