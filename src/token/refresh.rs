use crate::provider::{KeycloakClient, ProviderError};
use crate::session::{TokenSession, ACCESS_TOKEN, EXPIRES_AT, REFRESH_TOKEN};
use crate::token::clock;
use chrono::{Duration, Utc};
use log::{debug, warn};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

/// Result of a refresh attempt that didn't fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A new token pair was obtained and written to the session
    Refreshed,
    /// The session needed no refresh (unauthenticated, no expiry recorded,
    /// token still fresh, or another request refreshed it first)
    Skipped,
}

#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("session has no refresh token")]
    NoRefreshToken,
    #[error("token refresh failed: {0}")]
    Provider(#[from] ProviderError),
    /// The session lost its authentication state mid-refresh. This is an
    /// invariant violation, not a transient condition; callers must not
    /// swallow it.
    #[error("session is missing required authentication state")]
    MissingSessionState,
}

/// Single-flight refresh of a session's access/refresh token pair.
///
/// One process-wide lock serializes all refresh attempts: two concurrent
/// refresh calls with the same stale refresh token would invalidate each
/// other at the provider. Per-user parallelism is traded away for that
/// guarantee.
pub struct TokenRefreshCoordinator {
    keycloak: Arc<KeycloakClient>,
    refresh_lock: Mutex<()>,
    skew: Duration,
}

impl TokenRefreshCoordinator {
    pub fn new(keycloak: Arc<KeycloakClient>, skew_seconds: u64) -> Self {
        Self {
            keycloak,
            refresh_lock: Mutex::new(()),
            skew: Duration::seconds(skew_seconds as i64),
        }
    }

    /// Refresh the session's token pair if its recorded expiry has passed.
    ///
    /// On failure the caller is responsible for signing the user out of both
    /// schemes; refreshes are not retried here.
    pub async fn refresh_if_needed(
        &self,
        session: &dyn TokenSession,
    ) -> Result<RefreshOutcome, RefreshError> {
        if !session.is_authenticated().await {
            return Ok(RefreshOutcome::Skipped);
        }
        let expires_at = session.get_token(EXPIRES_AT).await;
        if expires_at.is_none() {
            // Not a token-carrying session; nothing to refresh
            return Ok(RefreshOutcome::Skipped);
        }
        if !clock::is_expired(expires_at.as_deref(), self.skew, Utc::now()) {
            return Ok(RefreshOutcome::Skipped);
        }

        // The guard is dropped on every exit path, including cancellation
        let _guard = self.refresh_lock.lock().await;

        // Another request may have refreshed while this one waited
        let expires_at = session.get_token(EXPIRES_AT).await;
        if !clock::is_expired(expires_at.as_deref(), self.skew, Utc::now()) {
            debug!("token already refreshed by a concurrent request");
            return Ok(RefreshOutcome::Skipped);
        }

        let refresh_token = session
            .get_token(REFRESH_TOKEN)
            .await
            .ok_or(RefreshError::NoRefreshToken)?;

        let response = match self.keycloak.refresh(&refresh_token).await {
            Ok(response) => response,
            Err(e) => {
                warn!("provider refused token refresh: {}", e);
                return Err(e.into());
            }
        };

        // Durations from the provider become absolute instants immediately
        let new_expiry = Utc::now() + Duration::seconds(response.expires_in as i64);
        session
            .update_token_value(ACCESS_TOKEN, response.access_token)
            .await;
        session
            .update_token_value(REFRESH_TOKEN, response.refresh_token)
            .await;
        session
            .update_token_value(EXPIRES_AT, new_expiry.to_rfc3339())
            .await;
        session
            .sign_in()
            .await
            .map_err(|_| RefreshError::MissingSessionState)?;

        debug!("refreshed session tokens, new expiry {}", new_expiry);
        Ok(RefreshOutcome::Refreshed)
    }
}
