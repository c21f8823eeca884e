use axum::extract::{Json, State};
use axum::response::{IntoResponse, Response};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::envelope::Package;
use common::relay_store::{RelayStore, RelayStoreError};

use crate::http_server::api::client::{endpoint, ApiError, ApiRequest};
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadRequest {
    pub package: Package,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub ok: bool,
    pub file_id: String,
}

/// Store a package as-is
///
/// The relay never verifies or opens packages. When `file_id` is empty a fresh
///  one is assigned, which breaks the signature of a package signed without one.
pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<UploadRequest>,
) -> Result<impl IntoResponse, UploadError> {
    let sender_id = req.package.sender_id.clone();
    let receiver_id = req.package.receiver_id.clone();
    let size = req.package.ciphertext.len();
    if req.package.file_id.is_empty() {
        tracing::warn!(%sender_id, "package uploaded without a file id, assigning one");
    }

    let file_id = state.store().put(req.package).await?;

    tracing::info!(%file_id, %sender_id, %receiver_id, ciphertext_len = size, "stored package");
    Ok(Json(UploadResponse { ok: true, file_id }))
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Invalid package: missing {0}")]
    MissingField(&'static str),
    #[error("Store error: {0}")]
    Store(String),
}

impl<T: std::fmt::Display> From<RelayStoreError<T>> for UploadError {
    fn from(e: RelayStoreError<T>) -> Self {
        match e {
            RelayStoreError::MissingField(field) => UploadError::MissingField(field),
            other => UploadError::Store(other.to_string()),
        }
    }
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        tracing::warn!("UPLOAD ERROR: {}", self);
        match self {
            UploadError::MissingField(field) => (
                http::StatusCode::BAD_REQUEST,
                format!("invalid package: missing {}", field),
            )
                .into_response(),
            UploadError::Store(msg) => (
                http::StatusCode::INTERNAL_SERVER_ERROR,
                format!("store error: {}", msg),
            )
                .into_response(),
        }
    }
}

// Client implementation - builds request for this operation
impl ApiRequest for UploadRequest {
    type Response = UploadResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        Ok(client.post(endpoint(base_url, &["upload"])?).json(&self))
    }
}
