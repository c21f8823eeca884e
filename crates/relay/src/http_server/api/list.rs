use axum::extract::{Json, Path, State};
use axum::response::{IntoResponse, Response};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::relay_store::{PackageSummary, RelayStore, RelayStoreError};

use crate::http_server::api::client::{endpoint, ApiError, ApiRequest};
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListRequest {
    pub receiver_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse {
    pub ok: bool,
    pub files: Vec<PackageSummary>,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Path(receiver_id): Path<String>,
) -> Result<impl IntoResponse, ListError> {
    let files = state.store().list(&receiver_id).await?;
    tracing::debug!(%receiver_id, count = files.len(), "listed packages");
    Ok(Json(ListResponse { ok: true, files }))
}

#[derive(Debug, thiserror::Error)]
pub enum ListError {
    #[error("Store error: {0}")]
    Store(String),
}

impl<T: std::fmt::Display> From<RelayStoreError<T>> for ListError {
    fn from(e: RelayStoreError<T>) -> Self {
        ListError::Store(e.to_string())
    }
}

impl IntoResponse for ListError {
    fn into_response(self) -> Response {
        tracing::error!("LIST ERROR: {}", self);
        match self {
            ListError::Store(msg) => (
                http::StatusCode::INTERNAL_SERVER_ERROR,
                format!("store error: {}", msg),
            )
                .into_response(),
        }
    }
}

// Client implementation - builds request for this operation
impl ApiRequest for ListRequest {
    type Response = ListResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        Ok(client.get(endpoint(base_url, &["list", &self.receiver_id])?))
    }
}
