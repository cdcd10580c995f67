use std::time::Duration;

use vk_core::{ApiError, HttpRequest, HttpResponse, Transport};

/// Blocking `Transport` over a ureq agent.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    /// Agent with a 30 second global timeout.
    pub fn new() -> Self {
        Self::with_timeout(30)
    }

    pub fn with_timeout(timeout_secs: u64) -> Self {
        Self {
            agent: ureq::Agent::config_builder()
                .timeout_global(Some(Duration::from_secs(timeout_secs)))
                // Status codes are classified by the core.
                .http_status_as_error(false)
                .build()
                .into(),
        }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn get(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut req = self.agent.get(&request.url);
        for (name, value) in &request.headers {
            req = req.header(name.as_str(), value.as_str());
        }

        let mut response = req
            .call()
            .map_err(|e| ApiError::Transport(format!("GET {}: {e}", request.endpoint())))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Transport(format!("read resp: {e}")))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
