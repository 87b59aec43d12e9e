use crate::errors::ApiError;
use crate::session::{SharedSession, SignOutScheme};
use crate::state::AppState;
use crate::token::refresh::RefreshError;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use log::{error, warn};

/// BFF session maintenance: refresh an expiring cookie session's tokens
/// before the request proceeds.
///
/// A failed refresh means the session is dead; serving requests on it would
/// only produce confusing downstream 401s, so the user is signed out of both
/// schemes and the pipeline short-circuits.
pub async fn refresh_session(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let Some(SharedSession(session)) = request.extensions().get::<SharedSession>().cloned() else {
        // Header-token API request; nothing to maintain
        return next.run(request).await;
    };

    match state.refresh.refresh_if_needed(session.as_ref()).await {
        Ok(_) => next.run(request).await,
        Err(RefreshError::MissingSessionState) => {
            error!("session lost its authentication state during refresh");
            ApiError::internal("session state corrupted").into_response()
        }
        Err(e) => {
            warn!("token refresh failed, signing session out: {}", e);
            session.sign_out(SignOutScheme::Session).await;
            session.sign_out(SignOutScheme::Provider).await;
            ApiError::unauthorized("session expired, sign in again").into_response()
        }
    }
}
