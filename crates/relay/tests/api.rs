//! Integration tests for the relay HTTP routes

mod common;

use axum::http::StatusCode;
use filedrop_relay::ServiceState;
use serde_json::{json, Value};

fn parse(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap()
}

fn package_json(file_id: &str, sender: &str, receiver: &str) -> Value {
    json!({
        "version": 1,
        "file_id": file_id,
        "sender_id": sender,
        "receiver_id": receiver,
        "nonce_b64": "AAAAAAAAAAAAAAAA",
        "ciphertext_b64": "AQID",
        "wrapped_key_b64": "BA==",
        "signature_b64": "BQ==",
        "original_name": "notes.txt",
        "plaintext_size": 3
    })
}

#[tokio::test]
async fn test_info() {
    let state = ServiceState::new();
    let (status, body) = common::oneshot(&state, common::get("/")).await;
    assert_eq!(status, StatusCode::OK);

    let info = parse(&body);
    assert_eq!(info["crypto"]["key_wrap"], "RSA-OAEP (SHA-256)");
    assert!(info["what_server_never_sees"]
        .as_array()
        .unwrap()
        .contains(&json!("private keys")));
}

#[tokio::test]
async fn test_register_and_fetch_pubkey() {
    let state = ServiceState::new();
    let pem = common::keypair("alice").encode_public_key().unwrap();

    let (status, body) = common::oneshot(
        &state,
        common::json_post("/register", json!({"user_id": "alice", "public_key_pem": pem})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body), json!({"ok": true}));

    let (status, body) = common::oneshot(&state, common::get("/pubkey/alice")).await;
    assert_eq!(status, StatusCode::OK);
    let response = parse(&body);
    assert_eq!(response["ok"], true);
    assert_eq!(response["public_key_pem"], pem.as_str());
}

#[tokio::test]
async fn test_register_overwrites() {
    let state = ServiceState::new();
    let first = common::keypair("alice").encode_public_key().unwrap();
    let second = common::keypair("bob").encode_public_key().unwrap();

    for pem in [&first, &second] {
        let (status, _) = common::oneshot(
            &state,
            common::json_post("/register", json!({"user_id": "carol", "public_key_pem": pem})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, body) = common::oneshot(&state, common::get("/pubkey/carol")).await;
    assert_eq!(parse(&body)["public_key_pem"], second.as_str());
}

#[tokio::test]
async fn test_register_rejects_bad_input() {
    let state = ServiceState::new();
    let pem = common::keypair("alice").encode_public_key().unwrap();

    let (status, _) = common::oneshot(
        &state,
        common::json_post(
            "/register",
            json!({"user_id": "alice", "public_key_pem": "not a key"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = common::oneshot(
        &state,
        common::json_post("/register", json!({"user_id": "../alice", "public_key_pem": pem})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Nothing was stored
    let (status, _) = common::oneshot(&state, common::get("/pubkey/alice")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_pubkey() {
    let state = ServiceState::new();
    let (status, body) = common::oneshot(&state, common::get("/pubkey/nobody")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, b"unknown user");
}

#[tokio::test]
async fn test_upload_list_download() {
    let state = ServiceState::new();

    let (status, body) = common::oneshot(
        &state,
        common::json_post("/upload", json!({"package": package_json("f1", "alice", "bob")})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body), json!({"ok": true, "file_id": "f1"}));

    common::oneshot(
        &state,
        common::json_post("/upload", json!({"package": package_json("f2", "alice", "carol")})),
    )
    .await;

    let (status, body) = common::oneshot(&state, common::get("/list/bob")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        parse(&body),
        json!({
            "ok": true,
            "files": [{
                "file_id": "f1",
                "sender_id": "alice",
                "original_name": "notes.txt",
                "plaintext_size": 3
            }]
        })
    );

    let (status, body) = common::oneshot(&state, common::get("/download/f1")).await;
    assert_eq!(status, StatusCode::OK);
    let response = parse(&body);
    assert_eq!(response["ok"], true);
    assert_eq!(response["package"], package_json("f1", "alice", "bob"));
}

#[tokio::test]
async fn test_upload_assigns_file_id() {
    let state = ServiceState::new();
    let (status, body) = common::oneshot(
        &state,
        common::json_post("/upload", json!({"package": package_json("", "alice", "bob")})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let file_id = parse(&body)["file_id"].as_str().unwrap().to_string();
    assert!(uuid::Uuid::parse_str(&file_id).is_ok());

    let (_, body) = common::oneshot(&state, common::get(&format!("/download/{}", file_id))).await;
    assert_eq!(parse(&body)["package"]["file_id"], file_id.as_str());
}

#[tokio::test]
async fn test_upload_rejects_malformed_packages() {
    let state = ServiceState::new();

    let (status, _) = common::oneshot(
        &state,
        common::json_post("/upload", json!({"package": package_json("f1", "alice", "")})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut bad_base64 = package_json("f2", "alice", "bob");
    bad_base64["ciphertext_b64"] = json!("***");
    let (status, _) =
        common::oneshot(&state, common::json_post("/upload", json!({"package": bad_base64})))
            .await;
    assert!(status.is_client_error());

    let (status, body) = common::oneshot(&state, common::get("/list/bob")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body)["files"], json!([]));
}

#[tokio::test]
async fn test_download_missing() {
    let state = ServiceState::new();
    let (status, body) = common::oneshot(&state, common::get("/download/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, b"no such file");
}

#[tokio::test]
async fn test_health_and_fallback() {
    let state = ServiceState::new();

    let (status, body) = common::oneshot(&state, common::get("/_status/livez")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body), json!({"status": "ok"}));

    let (status, _) = common::oneshot(&state, common::get("/_status/readyz")).await;
    assert_eq!(status, StatusCode::OK);

    state.begin_shutdown();
    let (status, _) = common::oneshot(&state, common::get("/_status/readyz")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, body) = common::oneshot(&state, common::get("/no/such/route")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, b"not found");
}
