//! Uniform response envelope shared by success and error replies.
//!
//! Every reply body has exactly three fields: `code`, `message` and `data`.
//! A missing or `null` payload is written as an empty object, never `null`.

use serde::ser::{Error as _, SerializeMap};
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Business code used by successful replies.
pub const SUCCESS_CODE: i32 = 200;
/// Message used by [`ResponseEnvelope::success`].
pub const DEFAULT_SUCCESS_MESSAGE: &str = "success";
/// Message used by [`ResponseEnvelope::error`] callers that have nothing better.
pub const DEFAULT_ERROR_MESSAGE: &str = "error";

/// Fixed-shape wrapper returned by every API call.
///
/// # Examples
/// ```
/// use minimus::domain::ResponseEnvelope;
/// use serde_json::json;
///
/// let body = serde_json::to_value(ResponseEnvelope::ok()).expect("serialises");
/// assert_eq!(body, json!({ "code": 200, "message": "success", "data": {} }));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseEnvelope<T = Value> {
    code: i32,
    message: String,
    #[serde(serialize_with = "serialize_data", bound(serialize = "T: Serialize"))]
    data: Option<T>,
}

fn serialize_data<S, T>(data: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize,
{
    let value = match data {
        Some(value) => serde_json::to_value(value).map_err(S::Error::custom)?,
        None => Value::Null,
    };
    match value {
        Value::Null => serializer.serialize_map(Some(0))?.end(),
        value => value.serialize(serializer),
    }
}

impl<T> ResponseEnvelope<T> {
    /// Successful reply with code 200 and message `"success"`.
    pub fn success(data: Option<T>) -> Self {
        Self {
            code: SUCCESS_CODE,
            message: DEFAULT_SUCCESS_MESSAGE.to_owned(),
            data,
        }
    }

    /// Replace the message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Replace the payload.
    pub fn with_data(mut self, data: T) -> Self {
        self.data = Some(data);
        self
    }

    /// Business code carried in the body.
    pub fn code(&self) -> i32 {
        self.code
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Payload, if any. Absent payloads serialise as `{}`.
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }
}

impl ResponseEnvelope<Value> {
    /// Successful reply without a payload.
    pub fn ok() -> Self {
        Self::success(None)
    }

    /// Error reply with an explicit business code and no payload.
    ///
    /// # Examples
    /// ```
    /// use minimus::domain::ResponseEnvelope;
    ///
    /// let envelope = ResponseEnvelope::error(429, "slow down");
    /// assert_eq!(envelope.code(), 429);
    /// assert!(envelope.data().is_none());
    /// ```
    pub fn error(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }
}
