//! Application error taxonomy.
//!
//! These errors are transport agnostic. Each one carries a business code and
//! an HTTP status as plain integers; the inbound HTTP adapter turns them into
//! status codes and response envelopes.

use serde_json::Value;

/// Category of an [`AppError`], fixing its default codes and message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Base application failure with caller-chosen codes.
    Application,
    /// The client sent a malformed request.
    BadRequest,
    /// The requested resource does not exist.
    NotFound,
    /// The request data failed validation.
    Validation,
    /// A rate limit was tripped.
    TooManyRequests,
    /// An explicit internal failure.
    ServerError,
}

impl ErrorKind {
    /// Business code attached to errors of this kind.
    pub const fn business_code(self) -> i32 {
        match self {
            Self::Application | Self::BadRequest => 400,
            Self::NotFound => 404,
            Self::Validation => 422,
            Self::TooManyRequests => 429,
            Self::ServerError => 500,
        }
    }

    /// HTTP status attached to errors of this kind.
    pub const fn http_status(self) -> u16 {
        match self {
            Self::Application | Self::BadRequest => 400,
            Self::NotFound => 404,
            Self::Validation => 422,
            Self::TooManyRequests => 429,
            Self::ServerError => 500,
        }
    }

    /// Message used when the caller does not supply one.
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::Application => "Application error, please try again later",
            Self::BadRequest => "Bad request, please check the request and retry",
            Self::NotFound => "Resource not found, please verify and retry",
            Self::Validation => "Request data failed validation, please verify and retry",
            Self::TooManyRequests => "Too many requests, rate limit triggered, please retry later",
            Self::ServerError => "Server error, please try again later",
        }
    }

    /// Stable label used in logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Application => "application",
            Self::BadRequest => "bad_request",
            Self::NotFound => "not_found",
            Self::Validation => "validation",
            Self::TooManyRequests => "too_many_requests",
            Self::ServerError => "server_error",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed application failure raised by request handlers.
///
/// ## Invariants
/// - Supplying a message never changes `business_code` or `http_status`.
/// - Values are immutable; builder methods consume and return a new error.
///
/// # Examples
/// ```
/// use minimus::domain::{AppError, ErrorKind};
///
/// let err = AppError::not_found("no such demo");
/// assert_eq!(err.kind(), ErrorKind::NotFound);
/// assert_eq!(err.http_status(), 404);
/// assert_eq!(err.message(), "no such demo");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AppError {
    kind: ErrorKind,
    business_code: i32,
    http_status: u16,
    message: String,
    data: Option<Value>,
}

impl AppError {
    /// Create an error of the given kind with a caller-supplied message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            business_code: kind.business_code(),
            http_status: kind.http_status(),
            message: message.into(),
            data: None,
        }
    }

    /// Base application error with explicit codes.
    ///
    /// This is the only way to obtain an error whose business code and HTTP
    /// status differ.
    pub fn custom(business_code: i32, http_status: u16, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Application,
            business_code,
            http_status,
            message: message.into(),
            data: None,
        }
    }

    /// Convenience constructor for [`ErrorKind::BadRequest`].
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    /// Convenience constructor for [`ErrorKind::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Convenience constructor for [`ErrorKind::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Convenience constructor for [`ErrorKind::TooManyRequests`].
    pub fn too_many_requests(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TooManyRequests, message)
    }

    /// Convenience constructor for [`ErrorKind::ServerError`].
    pub fn server_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ServerError, message)
    }

    /// Attach an opaque payload returned to clients alongside the message.
    ///
    /// # Examples
    /// ```
    /// use minimus::domain::AppError;
    /// use serde_json::json;
    ///
    /// let err = AppError::validation("bad name").with_data(json!({ "field": "name" }));
    /// assert!(err.data().is_some());
    /// ```
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Category of the failure.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Application-level code placed in the response body.
    pub fn business_code(&self) -> i32 {
        self.business_code
    }

    /// HTTP status used on the wire.
    pub fn http_status(&self) -> u16 {
        self.http_status
    }

    /// Human-readable message returned to clients.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Optional payload returned to clients.
    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }
}

impl From<ErrorKind> for AppError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind, kind.default_message())
    }
}

impl Default for AppError {
    fn default() -> Self {
        Self::from(ErrorKind::Application)
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}
