use crate::errors::ApiError;
use crate::models::UserContext;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

/// An authorization policy resolved from its name at lookup time.
///
/// A name containing `resource:action` permission strings (comma-separated
/// for more than one) is a permission-set policy with OR semantics; any
/// other name refers to a realm role.
#[derive(Debug, Clone, PartialEq)]
pub enum PermissionPolicy {
    Named(String),
    AnyOf(Vec<String>),
}

impl PermissionPolicy {
    pub fn parse(name: &str) -> Self {
        if name.contains(':') {
            let required = name
                .split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(str::to_string)
                .collect();
            Self::AnyOf(required)
        } else {
            Self::Named(name.trim().to_string())
        }
    }
}

/// Outcome of evaluating a policy against an enriched identity
#[derive(Debug, Clone, PartialEq)]
pub enum PolicyDecision {
    Granted,
    Denied { missing: Vec<String> },
}

/// Authorization-time decision: the identity must hold at least one of the
/// listed permission claims (or the named role). Case-insensitive.
pub fn evaluate(policy: &PermissionPolicy, identity: &UserContext) -> PolicyDecision {
    match policy {
        PermissionPolicy::Named(role) => {
            if identity
                .roles
                .iter()
                .any(|held| held.eq_ignore_ascii_case(role))
            {
                PolicyDecision::Granted
            } else {
                PolicyDecision::Denied {
                    missing: vec![role.clone()],
                }
            }
        }
        PermissionPolicy::AnyOf(required) => {
            if required
                .iter()
                .any(|permission| identity.holds_permission(permission))
            {
                PolicyDecision::Granted
            } else {
                PolicyDecision::Denied {
                    missing: required.clone(),
                }
            }
        }
    }
}

/// Route-layer middleware enforcing a policy against the request's identity.
///
/// Wire it with `middleware::from_fn_with_state(PermissionPolicy::parse(...), enforce_permissions)`.
pub async fn enforce_permissions(
    State(policy): State<PermissionPolicy>,
    request: Request,
    next: Next,
) -> Response {
    let Some(identity) = request.extensions().get::<UserContext>() else {
        return ApiError::unauthorized("authentication required").into_response();
    };

    match evaluate(&policy, identity) {
        PolicyDecision::Granted => next.run(request).await,
        PolicyDecision::Denied { missing } => {
            ApiError::forbidden_missing_permissions(missing).into_response()
        }
    }
}
