use axum::routing::get;
use axum::Router;

mod liveness;
mod readiness;

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/livez", get(liveness::handler))
        .route("/readyz", get(readiness::handler))
        .with_state(state)
}
