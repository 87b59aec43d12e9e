pub(crate) mod health;
mod me;
mod permissions;

use crate::authz::policy::{enforce_permissions, PermissionPolicy};
use crate::middleware::enrich::enrich_claims;
use crate::middleware::identity::identity_middleware;
use crate::middleware::session_refresh::refresh_session;
use crate::state::AppState;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};

/// Combines all API routes into a single router
pub(super) fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(authenticated_routes(state))
}

/// Routes that run the full session-refresh → identity → enrichment pipeline
fn authenticated_routes(state: &AppState) -> Router<AppState> {
    let invalidate = Router::new()
        .route(
            "/permissions/invalidate/{user_id}",
            post(permissions::invalidate_handler),
        )
        .route_layer(middleware::from_fn_with_state(
            PermissionPolicy::parse("permissions:manage"),
            enforce_permissions,
        ));

    Router::new()
        .route("/me", get(me::me_handler))
        .merge(invalidate)
        // Layers run bottom-up: refresh the session first, then build the
        // identity, then enrich it with permission claims
        .layer(middleware::from_fn_with_state(
            state.clone(),
            enrich_claims,
        ))
        .layer(middleware::from_fn(identity_middleware))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            refresh_session,
        ))
}
