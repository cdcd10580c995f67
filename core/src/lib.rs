//! Synchronous VK API client core.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The host supplies a
//! `Transport` that executes the actual HTTP round-trip, and a `Session`
//! threads transport, rate limiter and request counter through a command.
//!
//! # Design
//! - `VkClient` is stateless: it holds only the base URL and `Credentials`.
//! - Every call is split into `build_call` (produces the request) and
//!   `parse_call` (classifies the response), so the I/O boundary is explicit.
//! - Responses stay untyped (`serde_json::Map`); callers pull typed fields
//!   out through the fallible `ValueExt` accessors or the `methods` helpers.
//! - Request counting and pacing live in `Session`, never in globals.

pub mod client;
pub mod error;
pub mod http;
pub mod limiter;
pub mod methods;
pub mod session;
pub mod types;

pub use client::{VkClient, DEFAULT_BASE_URL};
pub use error::{ApiError, RemoteError};
pub use http::{HttpRequest, HttpResponse, Transport};
pub use limiter::{IntervalGate, RateLimiter, Unthrottled, USER_TOKEN_INTERVAL};
pub use session::Session;
pub use types::{ApiResponse, Credentials, Param, RequestDescriptor, User, ValueExt, DEFAULT_API_VERSION};
