//! One command's worth of API calls.
//!
//! # Design
//! `Session` owns the stateless `VkClient`, the host's `Transport`, a
//! `RateLimiter`, and the request counter. Commands take `&mut Session`, so
//! the counter is plain state threaded through the pipeline rather than a
//! global, and the borrow checker keeps calls strictly sequential.

use tracing::debug;

use crate::client::VkClient;
use crate::error::ApiError;
use crate::http::Transport;
use crate::limiter::{RateLimiter, Unthrottled};
use crate::types::{ApiResponse, RequestDescriptor};

pub struct Session<T> {
    client: VkClient,
    transport: T,
    limiter: Box<dyn RateLimiter>,
    requests: u64,
}

impl<T: Transport> Session<T> {
    pub fn new(client: VkClient, transport: T) -> Self {
        Self {
            client,
            transport,
            limiter: Box::new(Unthrottled),
            requests: 0,
        }
    }

    pub fn with_limiter(mut self, limiter: impl RateLimiter + 'static) -> Self {
        self.limiter = Box::new(limiter);
        self
    }

    /// Perform one authenticated GET and classify the result.
    ///
    /// The counter goes up once the request is built and the limiter has
    /// let it through, whether or not the call then succeeds.
    pub fn call(&mut self, descriptor: &RequestDescriptor) -> Result<ApiResponse, ApiError> {
        let request = self.client.build_call(descriptor)?;
        self.limiter.acquire();
        self.requests += 1;

        debug!(method = descriptor.path(), params = ?descriptor.params(), "GET");
        let response = self.transport.get(&request)?;
        debug!(status = response.status, body = %response.body, "API response");

        self.client.parse_call(response)
    }

    /// `call` with parameters given as `name=value` strings.
    pub fn call_with<S: AsRef<str>>(&mut self, path: &str, params: &[S]) -> Result<ApiResponse, ApiError> {
        let descriptor = RequestDescriptor::parse(path, params)?;
        self.call(&descriptor)
    }

    /// Calls attempted so far.
    pub fn requests(&self) -> u64 {
        self.requests
    }

    pub fn client(&self) -> &VkClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}
