//! Descriptors and payload decoders for the VK methods the utilities use.

use serde_json::Value;

use crate::error::ApiError;
use crate::types::{ApiResponse, RequestDescriptor, User, ValueExt};

/// `users.get` accepts at most this many ids per call.
pub const USERS_GET_BATCH: usize = 1000;

/// Storage keys are at most this long.
pub const STORAGE_KEY_MAX: usize = 100;

/// Storage values are at most this many bytes.
pub const STORAGE_VALUE_MAX: usize = 4096;

pub fn friends_get() -> RequestDescriptor {
    RequestDescriptor::method("method/friends.get")
}

pub fn friends_get_online() -> RequestDescriptor {
    RequestDescriptor::method("method/friends.getOnline")
}

/// Friend ids from `friends.get` / `friends.getOnline`.
///
/// Accepts a bare id array as well as the `{"count": N, "items": [...]}`
/// object newer API versions send.
pub fn friend_ids(response: &ApiResponse) -> Result<Vec<u64>, ApiError> {
    let payload = response.payload()?;
    let items = match payload {
        Value::Object(_) => payload.try_field("items")?,
        other => other,
    };
    items.try_array()?.iter().map(|id| id.try_u64()).collect()
}

/// Single-user lookup.
pub fn user_get(id: u64) -> RequestDescriptor {
    RequestDescriptor::method("method/users.get").param("user_id", id.to_string())
}

/// Batched lookup. Callers split longer lists into `USERS_GET_BATCH` chunks.
pub fn users_get(ids: &[u64]) -> Result<RequestDescriptor, ApiError> {
    if ids.is_empty() {
        return Err(ApiError::Argument("users.get needs at least one id".into()));
    }
    if ids.len() > USERS_GET_BATCH {
        return Err(ApiError::Argument(format!(
            "users.get takes at most {USERS_GET_BATCH} ids, got {}",
            ids.len()
        )));
    }
    let joined = ids.iter().map(u64::to_string).collect::<Vec<_>>().join(",");
    Ok(RequestDescriptor::method("method/users.get").param("user_ids", joined))
}

/// Users from a `users.get` payload.
pub fn users(response: &ApiResponse) -> Result<Vec<User>, ApiError> {
    let payload = response.payload()?;
    payload.try_array()?;
    serde_json::from_value(payload.clone()).map_err(|e| ApiError::Decode(e.to_string()))
}

fn check_key(key: &str) -> Result<(), ApiError> {
    if key.is_empty() || key.len() > STORAGE_KEY_MAX {
        return Err(ApiError::Argument(format!(
            "storage key must be 1 to {STORAGE_KEY_MAX} characters long"
        )));
    }
    if let Some(bad) = key
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
    {
        return Err(ApiError::Argument(format!(
            "storage key {key:?} contains {bad:?}; only a-z, A-Z, 0-9, _ and - are allowed"
        )));
    }
    Ok(())
}

pub fn storage_get(key: &str) -> Result<RequestDescriptor, ApiError> {
    check_key(key)?;
    Ok(RequestDescriptor::method("method/storage.get").param("key", key))
}

pub fn storage_set(key: &str, value: &str) -> Result<RequestDescriptor, ApiError> {
    check_key(key)?;
    if value.len() > STORAGE_VALUE_MAX {
        return Err(ApiError::Argument(format!(
            "storage value is {} bytes, limit is {STORAGE_VALUE_MAX}",
            value.len()
        )));
    }
    Ok(RequestDescriptor::method("method/storage.set").param("key", key).param("value", value))
}

/// The stored value from a `storage.get` payload.
///
/// Older API versions answer with the bare string, newer ones with a
/// `[{"key": ..., "value": ...}]` list. A key that was never set reads as "".
pub fn storage_value(response: &ApiResponse, key: &str) -> Result<String, ApiError> {
    let payload = response.payload()?;
    match payload {
        Value::String(value) => Ok(value.clone()),
        Value::Array(entries) => {
            for entry in entries {
                if entry.try_field("key")?.try_str()? == key {
                    return Ok(entry.try_field("value")?.try_str()?.to_string());
                }
            }
            Ok(String::new())
        }
        other => Err(ApiError::Decode(format!("unexpected storage.get payload {other}"))),
    }
}

/// Render a payload the way the storage tool prints it: strings bare,
/// everything else as JSON.
pub fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
