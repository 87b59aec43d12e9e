use crate::state::AppState;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use log::info;

/// Drop a user's cached permissions so the next request re-resolves them,
/// e.g. after an administrator changed the user's grants
pub(super) async fn invalidate_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Response {
    info!("invalidating cached permissions for user {}", user_id);
    state.permissions.invalidate_user_permissions(&user_id).await;
    StatusCode::NO_CONTENT.into_response()
}
