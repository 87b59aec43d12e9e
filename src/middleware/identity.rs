use crate::models::{AccessToken, UserContext};
use crate::provider::decode_jwt_claims;
use crate::session::{SharedSession, ACCESS_TOKEN};
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use http::header::AUTHORIZATION;
use http::HeaderMap;
use log::debug;

/// Builds the request's identity from its access token.
///
/// API callers present a bearer token in the Authorization header; BFF
/// requests carry their token in the session's token bag. Requests without
/// a usable token pass through anonymous — downstream policy enforcement
/// decides whether that matters.
pub async fn identity_middleware(mut request: Request, next: Next) -> Response {
    let token = match bearer_token(request.headers()) {
        Some(token) => Some(token),
        None => session_token(request.extensions()).await,
    };

    if let Some(token) = token {
        if let Some(claims) = decode_jwt_claims(&token) {
            if let Some(identity) = UserContext::from_claims(claims) {
                request.extensions_mut().insert(AccessToken(token));
                request.extensions_mut().insert(identity);
            } else {
                debug!("access token carries no subject claim, treating request as anonymous");
            }
        } else {
            debug!("access token is not a decodable JWT, treating request as anonymous");
        }
    }

    next.run(request).await
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
}

async fn session_token(extensions: &http::Extensions) -> Option<String> {
    let SharedSession(session) = extensions.get::<SharedSession>()?;
    session.get_token(ACCESS_TOKEN).await
}
