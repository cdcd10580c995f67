//! Stateless request builder and response parser for VK API methods.
//!
//! # Design
//! `VkClient` holds the base URL and `Credentials` and carries no mutable
//! state between calls. `build_call` turns a `RequestDescriptor` into an
//! `HttpRequest`; `parse_call` classifies an `HttpResponse` into an
//! `ApiResponse` or an `ApiError`. The caller executes the round-trip.

use serde_json::Value;
use url::Url;

use crate::error::{ApiError, RemoteError};
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{ApiResponse, Credentials, RequestDescriptor};

/// The production API host.
pub const DEFAULT_BASE_URL: &str = "https://api.vk.com";

/// Synchronous, stateless client for VK API methods.
#[derive(Debug, Clone)]
pub struct VkClient {
    base_url: Url,
    credentials: Credentials,
}

impl VkClient {
    pub fn new(base_url: &str, credentials: Credentials) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| ApiError::Argument(format!("invalid base url {base_url:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Argument(format!("base url {base_url} can't carry a path")));
        }
        Ok(Self {
            base_url,
            credentials,
        })
    }

    /// Client against the production host.
    pub fn production(credentials: Credentials) -> Result<Self, ApiError> {
        Self::new(DEFAULT_BASE_URL, credentials)
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Compose the absolute request URL for a method call.
    ///
    /// `access_token` and `version` are set first and every parameter is
    /// then set in order, replacing an earlier value with the same key. A
    /// parameter named `access_token` or `version` therefore overrides the
    /// credentials.
    pub fn build_call(&self, descriptor: &RequestDescriptor) -> Result<HttpRequest, ApiError> {
        let mut url = self.base_url.clone();
        let prefix = url.path().trim_end_matches('/').to_string();
        url.set_path(&format!("{prefix}/{}", descriptor.path().trim_start_matches('/')));

        let mut query: Vec<(&str, &str)> = vec![
            ("access_token", self.credentials.token()),
            ("version", self.credentials.version()),
        ];
        for param in descriptor.params() {
            match query.iter_mut().find(|(key, _)| *key == param.key) {
                Some(slot) => slot.1 = param.value.as_str(),
                None => query.push((param.key.as_str(), param.value.as_str())),
            }
        }
        url.query_pairs_mut().clear().extend_pairs(query);

        Ok(HttpRequest {
            url: url.into(),
            headers: vec![("accept".to_string(), "application/json".to_string())],
        })
    }

    /// Classify a raw response.
    ///
    /// Non-2xx status is a transport failure, a body that is not a JSON
    /// object is a decode failure, and a non-null `error` member is a remote
    /// failure even though the status was 200.
    pub fn parse_call(&self, response: HttpResponse) -> Result<ApiResponse, ApiError> {
        check_status(&response)?;
        let value: Value =
            serde_json::from_str(&response.body).map_err(|e| ApiError::Decode(e.to_string()))?;
        let mut map = match value {
            Value::Object(map) => map,
            Value::Array(_) => return Err(ApiError::Decode("top-level value is an array, not an object".into())),
            other => {
                return Err(ApiError::Decode(format!("top-level value {other} is not an object")))
            }
        };
        match map.remove("error") {
            None | Some(Value::Null) => Ok(ApiResponse::new(map)),
            Some(payload) => Err(ApiError::RemoteApi(RemoteError::from_payload(payload))),
        }
    }
}

/// Map non-success status codes to `ApiError::Transport`.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if (200..300).contains(&response.status) {
        return Ok(());
    }
    Err(ApiError::Transport(format!(
        "HTTP {}: {}",
        response.status,
        response.body.trim()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Param;

    fn client() -> VkClient {
        VkClient::new("http://localhost:3000", Credentials::new("tok", "5.95").unwrap()).unwrap()
    }

    fn ok(body: &str) -> HttpResponse {
        HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    fn query(req: &HttpRequest) -> Vec<(String, String)> {
        Url::parse(&req.url)
            .unwrap()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn build_call_injects_credentials_first() {
        let d = RequestDescriptor::new("method/friends.get").unwrap();
        let req = client().build_call(&d).unwrap();
        assert_eq!(req.endpoint(), "http://localhost:3000/method/friends.get");
        assert_eq!(
            query(&req),
            vec![
                ("access_token".to_string(), "tok".to_string()),
                ("version".to_string(), "5.95".to_string()),
            ]
        );
    }

    #[test]
    fn build_call_appends_params_in_order() {
        let d = RequestDescriptor::parse("method/storage.set", &["key=mykey", "value=a=b c"]).unwrap();
        let req = client().build_call(&d).unwrap();
        let q = query(&req);
        assert_eq!(q[2], ("key".to_string(), "mykey".to_string()));
        assert_eq!(q[3], ("value".to_string(), "a=b c".to_string()));
        assert!(req.url.contains("value=a%3Db+c"));
    }

    #[test]
    fn later_param_overrides_credentials() {
        let d = RequestDescriptor::new("method/users.get")
            .unwrap()
            .param("version", "5.131");
        let q = query(&client().build_call(&d).unwrap());
        assert_eq!(q.len(), 2);
        assert_eq!(q[1], ("version".to_string(), "5.131".to_string()));
    }

    #[test]
    fn duplicate_params_keep_last_value() {
        let mut d = RequestDescriptor::new("method/storage.get").unwrap();
        for raw in ["key=a", "key=b"] {
            let p = Param::parse(raw).unwrap();
            d = d.param(p.key, p.value);
        }
        let q = query(&client().build_call(&d).unwrap());
        assert_eq!(q.len(), 3);
        assert_eq!(q[2].1, "b");
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = VkClient::new("http://localhost:3000/", Credentials::new("t", "v").unwrap()).unwrap();
        let req = client.build_call(&RequestDescriptor::new("method/x").unwrap()).unwrap();
        assert_eq!(req.endpoint(), "http://localhost:3000/method/x");
    }

    #[test]
    fn base_path_prefix_is_kept() {
        let client = VkClient::new("http://localhost:3000/proxy", Credentials::new("t", "v").unwrap()).unwrap();
        let req = client.build_call(&RequestDescriptor::new("method/x").unwrap()).unwrap();
        assert_eq!(req.endpoint(), "http://localhost:3000/proxy/method/x");
    }

    #[test]
    fn invalid_base_url_is_an_argument_error() {
        let err = VkClient::new("not a url", Credentials::new("t", "v").unwrap()).unwrap_err();
        assert!(matches!(err, ApiError::Argument(_)));
    }

    #[test]
    fn production_client_targets_https_host() {
        let client = VkClient::production(Credentials::new("t", "v").unwrap()).unwrap();
        let req = client.build_call(&RequestDescriptor::new("method/friends.get").unwrap()).unwrap();
        assert_eq!(req.endpoint(), "https://api.vk.com/method/friends.get");
    }

    #[test]
    fn parse_call_success() {
        let resp = client().parse_call(ok(r#"{"response":[1,2,3]}"#)).unwrap();
        assert_eq!(resp.payload().unwrap(), &serde_json::json!([1, 2, 3]));
        assert!(resp.as_map().get("error").is_none());
    }

    #[test]
    fn parse_call_null_error_is_success() {
        let resp = client().parse_call(ok(r#"{"response":1,"error":null}"#)).unwrap();
        assert!(resp.as_map().get("error").is_none());
    }

    #[test]
    fn parse_call_remote_error() {
        let err = client()
            .parse_call(ok(r#"{"error":{"error_code":5,"error_msg":"bad token"}}"#))
            .unwrap_err();
        match err {
            ApiError::RemoteApi(remote) => {
                assert_eq!(remote.code, Some(5));
                assert_eq!(remote.message.as_deref(), Some("bad token"));
            }
            other => panic!("expected RemoteApi, got {other:?}"),
        }
    }

    #[test]
    fn parse_call_top_level_array_is_decode_error() {
        let err = client().parse_call(ok("[1,2,3]")).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn parse_call_scalar_is_decode_error() {
        let err = client().parse_call(ok("42")).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn parse_call_bad_json() {
        let err = client().parse_call(ok("not json")).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn parse_call_server_error_status() {
        let response = HttpResponse {
            status: 502,
            headers: Vec::new(),
            body: "bad gateway".to_string(),
        };
        let err = client().parse_call(response).unwrap_err();
        assert_eq!(err.to_string(), "transport: HTTP 502: bad gateway");
    }
}
