//! Liveness and readiness probes.

use crate::state::HasServices;
use axum::{extract::State, http::StatusCode, Json};
use serde_json::json;

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn ready<S: HasServices>(
    State(state): State<S>,
) -> (StatusCode, Json<serde_json::Value>) {
    if state.is_ready().await {
        (StatusCode::OK, Json(json!({ "status": "ready" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "unavailable" })),
        )
    }
}
