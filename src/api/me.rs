use crate::errors::ApiError;
use crate::models::UserContext;
use axum::extract::Request;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Returns the request's enriched identity
pub(super) async fn me_handler(request: Request) -> Response {
    match request.extensions().get::<UserContext>() {
        Some(identity) => Json(identity.clone()).into_response(),
        None => ApiError::unauthorized("authentication required").into_response(),
    }
}
