//! Domain types for the VK API client.
//!
//! # Design
//! `Credentials` and `RequestDescriptor` validate on construction so that
//! `VkClient::build_call` never has to. Responses stay as a JSON map; typed
//! data comes out through the `ValueExt` accessors or serde DTOs like `User`.

use std::fmt;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ApiError;

/// API version sent when the caller does not pick one.
pub const DEFAULT_API_VERSION: &str = "5.95";

/// Access token plus API version, fixed for the process lifetime.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    token: String,
    version: String,
}

impl Credentials {
    pub fn new(token: impl Into<String>, version: impl Into<String>) -> Result<Self, ApiError> {
        let token = token.into();
        let version = version.into();
        if token.is_empty() {
            return Err(ApiError::Argument("access token can't be empty".into()));
        }
        if version.is_empty() {
            return Err(ApiError::Argument("api version can't be empty".into()));
        }
        Ok(Self { token, version })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .field("version", &self.version)
            .finish()
    }
}

/// One query parameter of a method call.
///
/// `Debug` masks the value of an `access_token` override.
#[derive(Clone, PartialEq, Eq)]
pub struct Param {
    pub key: String,
    pub value: String,
}

impl Param {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Parse a `name=value` string, splitting on the first `=` only so the
    /// value may itself contain `=`.
    pub fn parse(raw: &str) -> Result<Self, ApiError> {
        let (key, value) = raw
            .split_once('=')
            .ok_or_else(|| ApiError::Argument(format!("parameter {raw:?} is not of the form name=value")))?;
        if key.is_empty() {
            return Err(ApiError::Argument(format!("parameter {raw:?} has an empty name")));
        }
        Ok(Self::new(key, value))
    }
}

impl fmt::Debug for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = if self.key == "access_token" {
            "<redacted>"
        } else {
            self.value.as_str()
        };
        f.debug_struct("Param")
            .field("key", &self.key)
            .field("value", &value)
            .finish()
    }
}

/// Method path plus ordered extra parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    path: String,
    params: Vec<Param>,
}

impl RequestDescriptor {
    pub fn new(path: impl Into<String>) -> Result<Self, ApiError> {
        let path = path.into();
        if path.is_empty() {
            return Err(ApiError::Argument("method path can't be empty".into()));
        }
        Ok(Self {
            path,
            params: Vec::new(),
        })
    }

    pub(crate) fn method(path: &'static str) -> Self {
        Self {
            path: path.to_string(),
            params: Vec::new(),
        }
    }

    /// Build a descriptor from `name=value` strings.
    pub fn parse<S: AsRef<str>>(path: impl Into<String>, params: &[S]) -> Result<Self, ApiError> {
        let mut descriptor = Self::new(path)?;
        for raw in params {
            descriptor.params.push(Param::parse(raw.as_ref())?);
        }
        Ok(descriptor)
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push(Param::new(key, value));
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }
}

/// A decoded VK response: a JSON object whose `error` member is absent or null.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse(Map<String, Value>);

impl ApiResponse {
    pub(crate) fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Look up a top-level member, failing with `Decode` when it is missing.
    pub fn field(&self, name: &str) -> Result<&Value, ApiError> {
        self.0
            .get(name)
            .ok_or_else(|| ApiError::Decode(format!("response has no {name:?} field")))
    }

    /// The `response` member every successful VK call carries.
    pub fn payload(&self) -> Result<&Value, ApiError> {
        self.field("response")
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

/// A VK user as returned by `users.get`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
}

impl User {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Fallible accessors over `serde_json::Value`.
///
/// Every mismatch becomes `ApiError::Decode` naming what was expected, so a
/// schema change on the remote side surfaces as an error rather than a panic.
pub trait ValueExt {
    fn try_object(&self) -> Result<&Map<String, Value>, ApiError>;
    fn try_array(&self) -> Result<&Vec<Value>, ApiError>;
    fn try_str(&self) -> Result<&str, ApiError>;
    fn try_u64(&self) -> Result<u64, ApiError>;
    fn try_field(&self, name: &str) -> Result<&Value, ApiError>;
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn mismatch(expected: &str, got: &Value) -> ApiError {
    ApiError::Decode(format!("expected {expected}, got {}", kind(got)))
}

impl ValueExt for Value {
    fn try_object(&self) -> Result<&Map<String, Value>, ApiError> {
        self.as_object().ok_or_else(|| mismatch("object", self))
    }

    fn try_array(&self) -> Result<&Vec<Value>, ApiError> {
        self.as_array().ok_or_else(|| mismatch("array", self))
    }

    fn try_str(&self) -> Result<&str, ApiError> {
        self.as_str().ok_or_else(|| mismatch("string", self))
    }

    fn try_u64(&self) -> Result<u64, ApiError> {
        self.as_u64().ok_or_else(|| mismatch("unsigned integer", self))
    }

    fn try_field(&self, name: &str) -> Result<&Value, ApiError> {
        self.try_object()?
            .get(name)
            .ok_or_else(|| ApiError::Decode(format!("object has no {name:?} field")))
    }
}
