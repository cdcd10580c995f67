//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. The core builds `HttpRequest`
//! values and parses `HttpResponse` values; the `Transport` implementation
//! supplied by the host is the only thing that touches the network.
//!
//! VK answers every method with a GET, so there is no method field.

use crate::error::ApiError;

/// An HTTP GET request described as plain data.
///
/// Built by `VkClient::build_call`. The url carries the access token in its
/// query string, so `Debug` prints only the path.
#[derive(Clone)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    /// Scheme, host and path without the query string.
    pub fn endpoint(&self) -> &str {
        self.url.split('?').next().unwrap_or(&self.url)
    }
}

impl std::fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRequest")
            .field("endpoint", &self.endpoint())
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// An HTTP response described as plain data.
///
/// Produced by a `Transport`, then handed to `VkClient::parse_call`.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Executes `HttpRequest`s on behalf of the core.
///
/// Implementations must return non-2xx responses as data and reserve
/// `Err` for failures to complete the exchange at all (DNS, TLS, refused
/// connection, timeout, unreadable body). Those map to `ApiError::Transport`.
pub trait Transport {
    fn get(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}
