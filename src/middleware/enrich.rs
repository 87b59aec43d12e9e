use crate::authz::permissions::Permission;
use crate::models::{AccessToken, UserContext};
use crate::state::AppState;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use log::debug;

/// Claims enrichment: append one `permission` claim per resolved permission
/// to the request's identity before authorization runs.
///
/// Permission lookup failures never abort the request; the service already
/// degrades them to an empty list, so the worst case is an unenriched
/// identity passing through unchanged.
pub async fn enrich_claims(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let token = request
        .extensions()
        .get::<AccessToken>()
        .map(|AccessToken(token)| token.clone());
    let user_id = request
        .extensions()
        .get::<UserContext>()
        .map(|identity| identity.user_id.clone());

    if let (Some(token), Some(user_id)) = (token, user_id) {
        let permissions = state.permissions.get_user_permissions(&user_id, &token).await;
        if let Some(identity) = request.extensions_mut().get_mut::<UserContext>() {
            debug!(
                "enriching identity {} with {} permission claim(s)",
                user_id,
                permissions.len()
            );
            identity
                .permission_claims
                .extend(permissions.iter().map(Permission::claim_value));
            identity.permissions = permissions;
        }
    }

    next.run(request).await
}
