use axum::extract::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use crate::http_server::api::client::{endpoint, ApiError, ApiRequest};

pub const SERVICE_NAME: &str = "FileDrop relay";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InfoRequest;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoSuite {
    pub file_encryption: String,
    pub key_wrap: String,
    pub signature: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoResponse {
    pub service: String,
    pub version: String,
    pub what_server_stores: Vec<String>,
    pub what_server_never_sees: Vec<String>,
    pub crypto: CryptoSuite,
}

impl InfoResponse {
    fn current() -> Self {
        let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            service: SERVICE_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            what_server_stores: strings(&[
                "encrypted file packages",
                "metadata",
                "public keys",
            ]),
            what_server_never_sees: strings(&["plaintext files", "symmetric keys", "private keys"]),
            crypto: CryptoSuite {
                file_encryption: "AES-256-GCM".to_string(),
                key_wrap: "RSA-OAEP (SHA-256)".to_string(),
                signature: "RSA-PSS (SHA-256)".to_string(),
            },
        }
    }
}

pub async fn handler() -> Json<InfoResponse> {
    Json(InfoResponse::current())
}

// Client implementation - builds request for this operation
impl ApiRequest for InfoRequest {
    type Response = InfoResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        Ok(client.get(endpoint(base_url, &[])?))
    }
}
