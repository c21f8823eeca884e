use axum::routing::{get, post};
use axum::Router;

pub mod client;
pub mod download;
pub mod info;
pub mod list;
pub mod pubkey;
pub mod register;
pub mod upload;

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/", get(info::handler))
        .route("/register", post(register::handler))
        .route("/pubkey/:user_id", get(pubkey::handler))
        .route("/upload", post(upload::handler))
        .route("/list/:receiver_id", get(list::handler))
        .route("/download/:file_id", get(download::handler))
        .with_state(state)
}
