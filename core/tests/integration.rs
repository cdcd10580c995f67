//! Core client against the live stub.
//!
//! # Design
//! Starts the stub on a random port, then drives `Session` over real HTTP
//! with a minimal ureq-backed `Transport`. Validates that request building
//! and response classification agree with what the stub actually sends.

use std::sync::Arc;

use mock_server::{demo_fixture, Fixture, Stub};
use vk_core::{methods, ApiError, Credentials, HttpRequest, HttpResponse, Session, Transport, VkClient};

/// Execute requests with ureq, returning 4xx/5xx as data so the core
/// classifies status codes itself.
struct Ureq(ureq::Agent);

impl Ureq {
    fn new() -> Self {
        Self(
            ureq::Agent::config_builder()
                .http_status_as_error(false)
                .build()
                .new_agent(),
        )
    }
}

impl Transport for Ureq {
    fn get(&self, req: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut response = self
            .0
            .get(&req.url)
            .call()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body,
        })
    }
}

/// Start the stub on a random port and return its base url.
fn start(fixture: Fixture) -> (String, Arc<Stub>) {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    let stub = Stub::new(fixture);
    let served = stub.clone();
    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener, served).await
        })
        .unwrap();
    });

    (format!("http://{addr}"), stub)
}

fn session(base: &str, token: &str) -> Session<Ureq> {
    let client = VkClient::new(base, Credentials::new(token, "5.95").unwrap()).unwrap();
    Session::new(client, Ureq::new())
}

#[test]
fn storage_round_trip() {
    let (base, _stub) = start(Fixture::default());
    let mut session = session(&base, "tok");

    // Step 1: unset key reads as empty.
    let resp = session.call(&methods::storage_get("mykey").unwrap()).unwrap();
    assert_eq!(methods::storage_value(&resp, "mykey").unwrap(), "");

    // Step 2: set it.
    let resp = session.call(&methods::storage_set("mykey", "123").unwrap()).unwrap();
    assert_eq!(methods::render(resp.payload().unwrap()), "1");

    // Step 3: read it back.
    let resp = session.call(&methods::storage_get("mykey").unwrap()).unwrap();
    assert_eq!(methods::storage_value(&resp, "mykey").unwrap(), "123");

    assert_eq!(session.requests(), 3);
}

#[test]
fn value_with_equals_survives_the_wire() {
    let (base, _stub) = start(Fixture::default());
    let mut session = session(&base, "tok");

    session
        .call_with("method/storage.set", &["key=eq", "value=a=b=c"])
        .unwrap();
    let resp = session.call_with("method/storage.get", &["key=eq"]).unwrap();
    assert_eq!(methods::storage_value(&resp, "eq").unwrap(), "a=b=c");
}

#[test]
fn friends_and_batched_names() {
    let (base, stub) = start(demo_fixture());
    let mut session = session(&base, "tok");

    let ids = methods::friend_ids(&session.call(&methods::friends_get()).unwrap()).unwrap();
    assert_eq!(ids, vec![1, 2, 3]);

    let users = methods::users(&session.call(&methods::users_get(&ids).unwrap()).unwrap()).unwrap();
    let names: Vec<String> = users.iter().map(|u| u.display_name()).collect();
    assert_eq!(names, vec!["Pavel Durov", "Nikolai Durov", "Ilya Perekopsky"]);

    let online = methods::friend_ids(&session.call(&methods::friends_get_online()).unwrap()).unwrap();
    assert_eq!(online, vec![2]);

    let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
    assert_eq!(rt.block_on(stub.count("users.get")), 1);
}

#[test]
fn remote_error_is_classified_and_counted() {
    let (base, _stub) = start(demo_fixture());
    let mut session = session(&base, "tok");

    // An empty access_token parameter overrides the credentials.
    let err = session
        .call_with("method/friends.get", &["access_token="])
        .unwrap_err();
    match err {
        ApiError::RemoteApi(remote) => assert_eq!(remote.code, Some(5)),
        other => panic!("expected RemoteApi, got {other:?}"),
    }

    let err = session.call_with("method/wall.post", &[] as &[&str]).unwrap_err();
    assert!(matches!(err, ApiError::RemoteApi(_)));

    session.call(&methods::friends_get()).unwrap();
    assert_eq!(session.requests(), 3);
}

#[test]
fn unknown_route_is_transport_error() {
    let (base, _stub) = start(demo_fixture());
    let mut session = session(&base, "tok");

    let err = session.call_with("nope", &[] as &[&str]).unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
    assert_eq!(session.requests(), 1);
}

#[test]
fn refused_connection_is_transport_error() {
    // Bind then drop to find a port nobody listens on.
    let addr = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
    let mut session = session(&format!("http://{addr}"), "tok");

    let err = session.call(&methods::friends_get()).unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
    assert_eq!(session.requests(), 1);
}
