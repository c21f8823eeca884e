//! Shared helpers for relay integration tests
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use ::common::crypto::{KeyPair, SecretKey, DEFAULT_KEY_BITS};
use filedrop_relay::http_server;
use filedrop_relay::http_server::api::client::ApiClient;
use filedrop_relay::ServiceState;
use tower::ServiceExt;
use url::Url;

/// Keypairs are expensive; hand out one per name per test binary
pub fn keypair(identity: &str) -> KeyPair {
    static KEYS: OnceLock<Mutex<HashMap<String, String>>> = OnceLock::new();
    let keys = KEYS.get_or_init(|| Mutex::new(HashMap::new()));
    let pem = keys
        .lock()
        .unwrap()
        .entry(identity.to_string())
        .or_insert_with(|| {
            let secret = SecretKey::generate(DEFAULT_KEY_BITS).unwrap();
            secret.to_pem().unwrap().to_string()
        })
        .clone();
    KeyPair::new(identity, SecretKey::from_pem(&pem).unwrap())
}

/// Serve the relay on an ephemeral port and return a client for it
pub async fn spawn_relay() -> (ServiceState, ApiClient) {
    let state = ServiceState::new();
    let router = http_server::router(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let remote = Url::parse(&format!("http://{}", addr)).unwrap();
    let client = ApiClient::new(&remote, Duration::from_secs(20)).unwrap();
    (state, client)
}

/// Send one request straight through the router
pub async fn oneshot(
    state: &ServiceState,
    request: Request<Body>,
) -> (StatusCode, Vec<u8>) {
    let response = http_server::router(state.clone())
        .oneshot(request)
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

pub fn json_post(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}
