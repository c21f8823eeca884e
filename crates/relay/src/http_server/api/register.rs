use axum::extract::{Json, State};
use axum::response::{IntoResponse, Response};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::crypto::{validate_identity, PublicKey};
use common::relay_store::{RelayStore, RelayStoreError};

use crate::http_server::api::client::{endpoint, ApiError, ApiRequest};
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub user_id: String,
    pub public_key_pem: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub ok: bool,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, RegisterError> {
    validate_identity(&req.user_id).map_err(|e| RegisterError::InvalidUser(e.to_string()))?;

    // Never publish a key nobody could use
    let key = PublicKey::from_pem(&req.public_key_pem)
        .map_err(|e| RegisterError::InvalidPublicKey(e.to_string()))?;
    let fingerprint = key.fingerprint().unwrap_or_default();

    state
        .store()
        .register_key(req.user_id.clone(), req.public_key_pem)
        .await?;

    tracing::info!(user_id = %req.user_id, %fingerprint, "registered public key");
    Ok((http::StatusCode::OK, Json(RegisterResponse { ok: true })).into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    #[error("Invalid user id: {0}")]
    InvalidUser(String),
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),
    #[error("Store error: {0}")]
    Store(String),
}

impl<T: std::fmt::Display> From<RelayStoreError<T>> for RegisterError {
    fn from(e: RelayStoreError<T>) -> Self {
        RegisterError::Store(e.to_string())
    }
}

impl IntoResponse for RegisterError {
    fn into_response(self) -> Response {
        tracing::warn!("REGISTER ERROR: {}", self);
        match self {
            RegisterError::InvalidUser(msg) => (
                http::StatusCode::BAD_REQUEST,
                format!("invalid user id: {}", msg),
            )
                .into_response(),
            RegisterError::InvalidPublicKey(msg) => (
                http::StatusCode::BAD_REQUEST,
                format!("invalid public key: {}", msg),
            )
                .into_response(),
            RegisterError::Store(msg) => (
                http::StatusCode::INTERNAL_SERVER_ERROR,
                format!("store error: {}", msg),
            )
                .into_response(),
        }
    }
}

// Client implementation - builds request for this operation
impl ApiRequest for RegisterRequest {
    type Response = RegisterResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        Ok(client.post(endpoint(base_url, &["register"])?).json(&self))
    }
}
