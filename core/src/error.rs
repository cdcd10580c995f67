//! Error types for the VK API client.
//!
//! # Design
//! Each variant maps to one pipeline failure class so callers can tell a
//! bad flag from a dead network from a garbled body from a well-formed
//! refusal. `RemoteApi` keeps the raw `error` payload for diagnostics.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Errors returned by `VkClient`, `Session` and the `methods` helpers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required argument is missing, empty or malformed.
    #[error("invalid argument: {0}")]
    Argument(String),

    /// The remote host could not be reached or answered with a non-2xx status.
    #[error("transport: {0}")]
    Transport(String),

    /// The body is not a JSON object, or a field has an unexpected shape.
    #[error("json decode: {0}")]
    Decode(String),

    /// The body is a JSON object whose `error` field is present and non-null.
    #[error("api error: {0}")]
    RemoteApi(RemoteError),
}

/// The `error` member of a failed VK response.
///
/// VK sends `{"error_code": N, "error_msg": "..."}`, but nothing guarantees
/// that shape, so both fields are optional and the raw value is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteError {
    pub code: Option<i64>,
    pub message: Option<String>,
    pub payload: Value,
}

impl RemoteError {
    pub fn from_payload(payload: Value) -> Self {
        let code = payload.get("error_code").and_then(Value::as_i64);
        let message = payload
            .get("error_msg")
            .and_then(Value::as_str)
            .map(str::to_string);
        Self {
            code,
            message,
            payload,
        }
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.code, &self.message) {
            (Some(code), Some(msg)) => write!(f, "code {code}: {msg}"),
            (None, Some(msg)) => write!(f, "{msg}"),
            (Some(code), None) => write!(f, "code {code}: {}", self.payload),
            (None, None) => write!(f, "{}", self.payload),
        }
    }
}
