use axum::extract::{Json, Path, State};
use axum::response::{IntoResponse, Response};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::relay_store::{RelayStore, RelayStoreError};

use crate::http_server::api::client::{endpoint, ApiError, ApiRequest};
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PubkeyRequest {
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PubkeyResponse {
    pub ok: bool,
    pub public_key_pem: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, PubkeyError> {
    let public_key_pem = state
        .store()
        .public_key(&user_id)
        .await?
        .ok_or(PubkeyError::UnknownUser)?;

    Ok(Json(PubkeyResponse {
        ok: true,
        public_key_pem,
    }))
}

#[derive(Debug, thiserror::Error)]
pub enum PubkeyError {
    #[error("unknown user")]
    UnknownUser,
    #[error("Store error: {0}")]
    Store(String),
}

impl<T: std::fmt::Display> From<RelayStoreError<T>> for PubkeyError {
    fn from(e: RelayStoreError<T>) -> Self {
        PubkeyError::Store(e.to_string())
    }
}

impl IntoResponse for PubkeyError {
    fn into_response(self) -> Response {
        match self {
            PubkeyError::UnknownUser => {
                (http::StatusCode::NOT_FOUND, "unknown user").into_response()
            }
            PubkeyError::Store(msg) => {
                tracing::error!("PUBKEY ERROR: {}", msg);
                (
                    http::StatusCode::INTERNAL_SERVER_ERROR,
                    format!("store error: {}", msg),
                )
                    .into_response()
            }
        }
    }
}

// Client implementation - builds request for this operation
impl ApiRequest for PubkeyRequest {
    type Response = PubkeyResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        Ok(client.get(endpoint(base_url, &["pubkey", &self.user_id])?))
    }
}
