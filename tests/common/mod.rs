//! Shared test utilities

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use voxrelay::RelayClient;

/// In-memory stand-in for the relay server
#[derive(Clone, Default)]
pub struct MockRelayServer {
    relays: Arc<Mutex<BTreeMap<u8, (bool, u8)>>>,
    requests: Arc<Mutex<Vec<String>>>,
    canned: Arc<Mutex<Option<(StatusCode, serde_json::Value)>>>,
}

impl MockRelayServer {
    fn new() -> Self {
        let relays = (1..=4).map(|id| (id, (false, 0))).collect();
        Self {
            relays: Arc::new(Mutex::new(relays)),
            ..Default::default()
        }
    }

    /// Paths requested so far
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// `(on, brightness)` of a relay
    pub fn relay(&self, id: u8) -> (bool, u8) {
        self.relays.lock().unwrap()[&id]
    }

    /// Answer every request with 503
    pub fn set_failing(&self, failing: bool) {
        if failing {
            self.respond_with(StatusCode::SERVICE_UNAVAILABLE, json!("down"));
        } else {
            *self.canned.lock().unwrap() = None;
        }
    }

    /// Answer every request with `status` and `body`, ignoring relay state
    pub fn respond_with(&self, status: StatusCode, body: serde_json::Value) {
        *self.canned.lock().unwrap() = Some((status, body));
    }

    fn record(&self, path: String) -> Option<Response> {
        self.requests.lock().unwrap().push(path);
        self.canned
            .lock()
            .unwrap()
            .clone()
            .map(|(status, body)| (status, Json(body)).into_response())
    }
}

fn invalid() -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": "invalid" }))).into_response()
}

fn relay_body(id: u8, (on, brightness): (bool, u8)) -> Response {
    Json(json!({ "id": id, "on": on, "brightness": brightness })).into_response()
}

async fn status(State(server): State<MockRelayServer>) -> Response {
    if let Some(resp) = server.record("/status".to_string()) {
        return resp;
    }
    let relays = server.relays.lock().unwrap();
    let body: BTreeMap<String, serde_json::Value> = relays
        .iter()
        .map(|(id, (on, brightness))| {
            (id.to_string(), json!({ "on": on, "brightness": brightness }))
        })
        .collect();
    Json(body).into_response()
}

async fn power(
    State(server): State<MockRelayServer>,
    Path((id, cmd)): Path<(String, String)>,
) -> Response {
    if let Some(resp) = server.record(format!("/relay/{id}/{cmd}")) {
        return resp;
    }
    let mut relays = server.relays.lock().unwrap();
    let Some(id) = id.parse::<u8>().ok().filter(|id| relays.contains_key(id)) else {
        return invalid();
    };
    let on = match cmd.as_str() {
        "on" => true,
        "off" => false,
        _ => return invalid(),
    };
    let entry = relays.get_mut(&id).unwrap();
    entry.0 = on;
    relay_body(id, *entry)
}

async fn brightness(
    State(server): State<MockRelayServer>,
    Path((id, val)): Path<(String, String)>,
) -> Response {
    if let Some(resp) = server.record(format!("/relay/{id}/brightness/{val}")) {
        return resp;
    }
    let mut relays = server.relays.lock().unwrap();
    let Some(id) = id.parse::<u8>().ok().filter(|id| relays.contains_key(id)) else {
        return invalid();
    };
    let Some(val) = val.parse::<u8>().ok().filter(|v| *v <= 100) else {
        return invalid();
    };
    let entry = relays.get_mut(&id).unwrap();
    *entry = (val > 0, val);
    relay_body(id, *entry)
}

/// Start a mock relay server on an ephemeral port
///
/// Returns its base URL and a handle for inspecting state.
pub async fn spawn_relay_server() -> (String, MockRelayServer) {
    let server = MockRelayServer::new();
    let app = Router::new()
        .route("/status", get(status))
        .route("/relay/{id}/{cmd}", get(power))
        .route("/relay/{id}/brightness/{val}", get(brightness))
        .with_state(server.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind mock relay server");
    let addr = listener.local_addr().expect("no local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock relay server failed");
    });

    (format!("http://{addr}"), server)
}

/// Relay client pointed at `base_url`
pub fn relay_client(base_url: &str) -> RelayClient {
    RelayClient::new(base_url, Duration::from_secs(5)).expect("failed to build relay client")
}

/// Base URL where nothing is listening
pub async fn unused_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind");
    let addr = listener.local_addr().expect("no local addr");
    drop(listener);
    format!("http://{addr}")
}
