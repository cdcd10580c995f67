use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
}

impl User {
    pub fn new(id: u64, first_name: &str, last_name: &str) -> Self {
        Self {
            id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        }
    }
}

/// What the stub knows about the calling user.
#[derive(Clone, Debug, Default)]
pub struct Fixture {
    pub friends: Vec<User>,
    pub online: Vec<u64>,
    pub storage: HashMap<String, String>,
}

#[derive(Default)]
pub struct Stub {
    fixture: RwLock<Fixture>,
    calls: RwLock<Vec<String>>,
}

impl Stub {
    pub fn new(fixture: Fixture) -> Arc<Self> {
        Arc::new(Self {
            fixture: RwLock::new(fixture),
            calls: RwLock::new(Vec::new()),
        })
    }

    /// Method names received so far, in arrival order.
    pub async fn calls(&self) -> Vec<String> {
        self.calls.read().await.clone()
    }

    pub async fn count(&self, method: &str) -> usize {
        self.calls.read().await.iter().filter(|m| *m == method).count()
    }
}

pub type Shared = Arc<Stub>;

/// A small cast used by the standalone binary and the tests.
pub fn demo_fixture() -> Fixture {
    Fixture {
        friends: vec![
            User::new(1, "Pavel", "Durov"),
            User::new(2, "Nikolai", "Durov"),
            User::new(3, "Ilya", "Perekopsky"),
        ],
        online: vec![2],
        storage: HashMap::new(),
    }
}

pub fn app(stub: Shared) -> Router {
    Router::new()
        .route("/method/{method}", get(dispatch))
        .with_state(stub)
}

pub async fn run(listener: TcpListener, stub: Shared) -> Result<(), std::io::Error> {
    axum::serve(listener, app(stub)).await
}

fn ok(response: Value) -> Json<Value> {
    Json(json!({ "response": response }))
}

fn fail(code: u32, msg: &str) -> Json<Value> {
    Json(json!({
        "error": {
            "error_code": code,
            "error_msg": msg,
        }
    }))
}

// VK reports every failure with HTTP 200 and an `error` member.
async fn dispatch(
    State(stub): State<Shared>,
    Path(method): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    debug!(%method, ?query, "stub call");
    stub.calls.write().await.push(method.clone());

    if query.get("access_token").map_or(true, String::is_empty) {
        return fail(5, "User authorization failed: no access_token passed.");
    }

    match method.as_str() {
        "friends.get" => friends_get(&stub).await,
        "friends.getOnline" => friends_get_online(&stub).await,
        "users.get" => users_get(&stub, &query).await,
        "storage.get" => storage_get(&stub, &query).await,
        "storage.set" => storage_set(&stub, &query).await,
        _ => fail(3, "Unknown method passed"),
    }
}

async fn friends_get(stub: &Stub) -> Json<Value> {
    let fixture = stub.fixture.read().await;
    let ids: Vec<u64> = fixture.friends.iter().map(|u| u.id).collect();
    ok(json!({ "count": ids.len(), "items": ids }))
}

// getOnline answers with a bare array, unlike friends.get.
async fn friends_get_online(stub: &Stub) -> Json<Value> {
    ok(json!(stub.fixture.read().await.online))
}

async fn users_get(stub: &Stub, query: &HashMap<String, String>) -> Json<Value> {
    let raw = match query.get("user_ids").or_else(|| query.get("user_id")) {
        Some(raw) => raw,
        None => return fail(100, "One of the parameters specified was missing or invalid: user_ids"),
    };
    let mut ids = Vec::new();
    for part in raw.split(',') {
        match part.trim().parse::<u64>() {
            Ok(id) => ids.push(id),
            Err(_) => return fail(113, "Invalid user id"),
        }
    }

    let fixture = stub.fixture.read().await;
    let users: Vec<&User> = ids
        .iter()
        .filter_map(|id| fixture.friends.iter().find(|u| u.id == *id))
        .collect();
    ok(json!(users))
}

async fn storage_get(stub: &Stub, query: &HashMap<String, String>) -> Json<Value> {
    let Some(key) = query.get("key") else {
        return fail(100, "One of the parameters specified was missing or invalid: key");
    };
    let value = stub
        .fixture
        .read()
        .await
        .storage
        .get(key)
        .cloned()
        .unwrap_or_default();
    ok(json!(value))
}

async fn storage_set(stub: &Stub, query: &HashMap<String, String>) -> Json<Value> {
    let Some(key) = query.get("key") else {
        return fail(100, "One of the parameters specified was missing or invalid: key");
    };
    let value = query.get("value").cloned().unwrap_or_default();
    let mut fixture = stub.fixture.write().await;
    // Setting an empty value deletes the key.
    if value.is_empty() {
        fixture.storage.remove(key);
    } else {
        fixture.storage.insert(key.clone(), value);
    }
    ok(json!(1))
}
