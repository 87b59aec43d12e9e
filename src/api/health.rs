use crate::state::AppState;
use axum::{response::IntoResponse, routing::get, Json, Router};
use serde_json::json;

/// Basic liveness check handler
async fn healthy() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

pub(super) fn router() -> Router<AppState> {
    Router::new().route("/healthy", get(healthy))
}
