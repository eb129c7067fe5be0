//! Central failure-to-response translation for the HTTP adapter.
//!
//! Every failure a request can produce ends up as an [`ApiError`]: extractor
//! rejections, routing misses, typed application errors, infrastructure
//! errors and caught panics. [`ApiError::translate`] is the only place an
//! error becomes a status code and a [`ResponseEnvelope`], and the
//! [`ResponseError`] impl logs each rendered failure exactly once.

use std::error::Error as StdError;

use actix_web::error::{JsonPayloadError, PathError, PayloadError, QueryPayloadError, UrlencodedError};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use tracing::error;

use crate::domain::ports::LifecycleError;
use crate::domain::{AppError, ResponseEnvelope};
use crate::middleware::trace::TraceId;
use crate::outbound::cache::CacheError;
use crate::outbound::persistence::SessionError;

/// Message sent to clients for every unhandled failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, ApiError>;

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// One request-validation problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Path to the offending input, e.g. `["body"]` or `["query"]`.
    pub loc: Vec<String>,
    /// Human-readable description.
    pub msg: String,
    /// Machine-readable category such as `json_invalid`.
    #[serde(rename = "type")]
    pub kind: String,
}

impl FieldError {
    /// Build a field error located at `loc`.
    pub fn new(loc: &[&str], msg: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            loc: loc.iter().map(|segment| (*segment).to_owned()).collect(),
            msg: msg.into(),
            kind: kind.into(),
        }
    }
}

/// Every failure an HTTP handler can surface.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request failed extraction or validation.
    #[error("request validation failed: {}", summarise(.0))]
    Validation(Vec<FieldError>),
    /// A framework-level failure with an explicit status.
    #[error("{detail}")]
    Http { status: StatusCode, detail: String },
    /// A typed application error.
    #[error(transparent)]
    App(#[from] AppError),
    /// Anything else. Details are logged, never returned.
    #[error("unhandled error: {0}")]
    Unhandled(#[source] BoxError),
}

/// Broad class of a failure, recorded on the log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Validation,
    Http,
    App,
    Unhandled,
}

impl Category {
    /// Label used in logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Http => "http",
            Self::App => "app",
            Self::Unhandled => "unhandled",
        }
    }
}

fn summarise(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|field| field.msg.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

fn status_code_of(status: StatusCode) -> i32 {
    i32::from(status.as_u16())
}

impl ApiError {
    /// Wrap an arbitrary error as an unhandled failure.
    pub fn unhandled(err: impl Into<BoxError>) -> Self {
        Self::Unhandled(err.into())
    }

    /// Framework failure with an explicit status and detail.
    pub fn http(status: StatusCode, detail: impl Into<String>) -> Self {
        Self::Http {
            status,
            detail: detail.into(),
        }
    }

    /// Routing miss.
    pub fn not_found() -> Self {
        Self::http(StatusCode::NOT_FOUND, "Not Found")
    }

    /// Known path, unsupported method.
    pub fn method_not_allowed() -> Self {
        Self::http(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
    }

    /// Classify an arbitrary error.
    ///
    /// Checks run from most to least specific: extractor validation, then
    /// framework HTTP errors, then [`AppError`], then everything else.
    ///
    /// # Examples
    /// ```
    /// use minimus::domain::AppError;
    /// use minimus::inbound::http::error::ApiError;
    ///
    /// let err = AppError::not_found("no such user");
    /// assert!(matches!(ApiError::classify(&err), ApiError::App(_)));
    ///
    /// let io = std::io::Error::other("disk on fire");
    /// assert!(matches!(ApiError::classify(&io), ApiError::Unhandled(_)));
    /// ```
    pub fn classify(err: &(dyn StdError + 'static)) -> Self {
        if let Some(api) = extractor_failure(err) {
            return api;
        }
        if let Some(framework) = err.downcast_ref::<actix_web::Error>() {
            return framework_failure(framework);
        }
        if let Some(api) = err.downcast_ref::<Self>() {
            return api.replicate();
        }
        if let Some(app) = err.downcast_ref::<AppError>() {
            return Self::App(app.clone());
        }
        Self::unhandled(err.to_string())
    }

    /// Category recorded on the log line.
    pub const fn category(&self) -> Category {
        match self {
            Self::Validation(_) => Category::Validation,
            Self::Http { .. } => Category::Http,
            Self::App(_) => Category::App,
            Self::Unhandled(_) => Category::Unhandled,
        }
    }

    /// Translate into an HTTP status and response envelope.
    ///
    /// Never fails: an application error with an unusable HTTP status is sent
    /// as 500 but keeps its business code and message.
    pub fn translate(&self) -> (StatusCode, ResponseEnvelope) {
        match self {
            Self::Validation(fields) => {
                let message = serde_json::to_string(fields).unwrap_or_else(|_| summarise(fields));
                (
                    StatusCode::BAD_REQUEST,
                    ResponseEnvelope::error(status_code_of(StatusCode::BAD_REQUEST), message),
                )
            }
            Self::Http { status, detail } => (
                *status,
                ResponseEnvelope::error(status_code_of(*status), detail.clone()),
            ),
            Self::App(app) => {
                let status = StatusCode::from_u16(app.http_status())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                let envelope = ResponseEnvelope::error(app.business_code(), app.message());
                let envelope = match app.data() {
                    Some(data) => envelope.with_data(data.clone()),
                    None => envelope,
                };
                (status, envelope)
            }
            Self::Unhandled(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ResponseEnvelope::error(
                    status_code_of(StatusCode::INTERNAL_SERVER_ERROR),
                    INTERNAL_ERROR_MESSAGE,
                ),
            ),
        }
    }

    fn replicate(&self) -> Self {
        match self {
            Self::Validation(fields) => Self::Validation(fields.clone()),
            Self::Http { status, detail } => Self::http(*status, detail.clone()),
            Self::App(app) => Self::App(app.clone()),
            Self::Unhandled(err) => Self::unhandled(err.to_string()),
        }
    }

    fn log(&self, status: StatusCode, envelope: &ResponseEnvelope) {
        let trace_id = TraceId::current().map(|id| id.to_string());
        let category = self.category().as_str();
        match self {
            Self::Unhandled(err) => error!(
                category,
                status = status.as_u16(),
                code = envelope.code(),
                detail = envelope.message(),
                trace_id = trace_id.as_deref(),
                error = ?err,
                chain = %source_chain(&**err),
                "unhandled error while serving request"
            ),
            _ => error!(
                category,
                status = status.as_u16(),
                code = envelope.code(),
                detail = envelope.message(),
                trace_id = trace_id.as_deref(),
                "request failed"
            ),
        }
    }
}

fn source_chain(err: &(dyn StdError + 'static)) -> String {
    let mut chain = vec![err.to_string()];
    let mut current = err.source();
    while let Some(source) = current {
        chain.push(source.to_string());
        current = source.source();
    }
    chain.join(": ")
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.translate().0
    }

    fn error_response(&self) -> HttpResponse {
        let (status, envelope) = self.translate();
        self.log(status, &envelope);
        HttpResponse::build(status).json(envelope)
    }
}

fn extractor_failure(err: &(dyn StdError + 'static)) -> Option<ApiError> {
    if let Some(json) = err.downcast_ref::<JsonPayloadError>() {
        return Some(json_failure(json));
    }
    if let Some(query) = err.downcast_ref::<QueryPayloadError>() {
        return Some(query_failure(query));
    }
    if let Some(path) = err.downcast_ref::<PathError>() {
        return Some(path_failure(path));
    }
    err.downcast_ref::<UrlencodedError>().map(form_failure)
}

fn framework_extractor_failure(err: &actix_web::Error) -> Option<ApiError> {
    if let Some(json) = err.as_error::<JsonPayloadError>() {
        return Some(json_failure(json));
    }
    if let Some(query) = err.as_error::<QueryPayloadError>() {
        return Some(query_failure(query));
    }
    if let Some(path) = err.as_error::<PathError>() {
        return Some(path_failure(path));
    }
    err.as_error::<UrlencodedError>().map(form_failure)
}

fn framework_failure(err: &actix_web::Error) -> ApiError {
    if let Some(api) = framework_extractor_failure(err) {
        return api;
    }
    if let Some(api) = err.as_error::<ApiError>() {
        return api.replicate();
    }
    ApiError::http(err.as_response_error().status_code(), err.to_string())
}

fn payload_too_large(err: &impl ToString) -> ApiError {
    ApiError::http(StatusCode::PAYLOAD_TOO_LARGE, err.to_string())
}

fn json_failure(err: &JsonPayloadError) -> ApiError {
    match err {
        JsonPayloadError::OverflowKnownLength { .. }
        | JsonPayloadError::Overflow { .. }
        | JsonPayloadError::Payload(PayloadError::Overflow) => payload_too_large(err),
        JsonPayloadError::ContentType => ApiError::Validation(vec![FieldError::new(
            &["body"],
            err.to_string(),
            "content_type_invalid",
        )]),
        _ => ApiError::Validation(vec![FieldError::new(
            &["body"],
            err.to_string(),
            "json_invalid",
        )]),
    }
}

fn query_failure(err: &QueryPayloadError) -> ApiError {
    ApiError::Validation(vec![FieldError::new(
        &["query"],
        err.to_string(),
        "query_invalid",
    )])
}

fn path_failure(err: &PathError) -> ApiError {
    ApiError::Validation(vec![FieldError::new(
        &["path"],
        err.to_string(),
        "path_invalid",
    )])
}

fn form_failure(err: &UrlencodedError) -> ApiError {
    match err {
        UrlencodedError::Overflow { .. } | UrlencodedError::Payload(PayloadError::Overflow) => {
            payload_too_large(err)
        }
        UrlencodedError::ContentType => ApiError::Validation(vec![FieldError::new(
            &["body"],
            err.to_string(),
            "content_type_invalid",
        )]),
        _ => ApiError::Validation(vec![FieldError::new(
            &["body"],
            err.to_string(),
            "form_invalid",
        )]),
    }
}

impl From<JsonPayloadError> for ApiError {
    fn from(err: JsonPayloadError) -> Self {
        json_failure(&err)
    }
}

impl From<QueryPayloadError> for ApiError {
    fn from(err: QueryPayloadError) -> Self {
        query_failure(&err)
    }
}

impl From<PathError> for ApiError {
    fn from(err: PathError) -> Self {
        path_failure(&err)
    }
}

impl From<UrlencodedError> for ApiError {
    fn from(err: UrlencodedError) -> Self {
        form_failure(&err)
    }
}

impl From<actix_web::Error> for ApiError {
    fn from(err: actix_web::Error) -> Self {
        framework_failure(&err)
    }
}

impl From<LifecycleError> for ApiError {
    fn from(err: LifecycleError) -> Self {
        Self::unhandled(err)
    }
}

impl From<CacheError> for ApiError {
    fn from(err: CacheError) -> Self {
        Self::unhandled(err)
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        Self::unhandled(err)
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        Self::unhandled(err)
    }
}
