use axum::extract::{Json, Path, State};
use axum::response::{IntoResponse, Response};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::envelope::Package;
use common::relay_store::{RelayStore, RelayStoreError};

use crate::http_server::api::client::{endpoint, ApiError, ApiRequest};
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadRequest {
    pub file_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadResponse {
    pub ok: bool,
    pub package: Package,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Path(file_id): Path<String>,
) -> Result<impl IntoResponse, DownloadError> {
    let package = state
        .store()
        .get(&file_id)
        .await?
        .ok_or(DownloadError::NoSuchFile)?;

    tracing::info!(%file_id, receiver_id = %package.receiver_id, "serving package");
    Ok(Json(DownloadResponse { ok: true, package }))
}

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("no such file")]
    NoSuchFile,
    #[error("Store error: {0}")]
    Store(String),
}

impl<T: std::fmt::Display> From<RelayStoreError<T>> for DownloadError {
    fn from(e: RelayStoreError<T>) -> Self {
        DownloadError::Store(e.to_string())
    }
}

impl IntoResponse for DownloadError {
    fn into_response(self) -> Response {
        match self {
            DownloadError::NoSuchFile => {
                (http::StatusCode::NOT_FOUND, "no such file").into_response()
            }
            DownloadError::Store(msg) => {
                tracing::error!("DOWNLOAD ERROR: {}", msg);
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
impl ApiRequest for DownloadRequest {
    type Response = DownloadResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        Ok(client.get(endpoint(base_url, &["download", &self.file_id])?))
    }
}
