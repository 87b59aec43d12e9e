use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

/// Token names stored in the session's token bag
pub const ACCESS_TOKEN: &str = "access_token";
pub const REFRESH_TOKEN: &str = "refresh_token";
pub const EXPIRES_AT: &str = "expires_at";

/// Authentication schemes a session can be signed out of
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignOutScheme {
    /// The gateway's own cookie session
    Session,
    /// The upstream identity provider session
    Provider,
}

/// Errors raised by session operations.
///
/// A missing authentication state during re-issue is a configuration or
/// programming error, not a transient condition; proceeding would silently
/// corrupt the session, so it propagates instead of soft-failing.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session has no authentication state to re-issue")]
    MissingAuthenticationState,
}

/// The session/cookie store boundary.
///
/// The gateway treats the session as a key-value token bag with an atomic
/// re-issue operation; the durable storage behind it (cookie, server-side
/// store) is owned by the host application.
#[async_trait]
pub trait TokenSession: Send + Sync {
    /// Whether the session carries an authenticated identity
    async fn is_authenticated(&self) -> bool;

    /// Read a token value from the bag
    async fn get_token(&self, name: &str) -> Option<String>;

    /// Write a token value into the bag
    async fn update_token_value(&self, name: &str, value: String);

    /// Re-issue the session's authentication artifact carrying the current
    /// token values (e.g. re-sign the session cookie)
    async fn sign_in(&self) -> Result<(), SessionError>;

    /// Sign the session out of the given scheme
    async fn sign_out(&self, scheme: SignOutScheme);
}

/// Shared session handle carried as a request extension by whatever cookie
/// layer fronts the gateway.
#[derive(Clone)]
pub struct SharedSession(pub Arc<dyn TokenSession>);

/// In-process session implementation backing BFF-style deployments and tests
#[derive(Default)]
pub struct MemorySession {
    tokens: RwLock<HashMap<String, String>>,
    authenticated: AtomicBool,
    reissue_count: AtomicUsize,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an authenticated session pre-populated with a token triple
    pub fn authenticated(access: &str, refresh: &str, expires_at: &str) -> Self {
        let mut tokens = HashMap::new();
        tokens.insert(ACCESS_TOKEN.to_string(), access.to_string());
        tokens.insert(REFRESH_TOKEN.to_string(), refresh.to_string());
        tokens.insert(EXPIRES_AT.to_string(), expires_at.to_string());
        Self {
            tokens: RwLock::new(tokens),
            authenticated: AtomicBool::new(true),
            reissue_count: AtomicUsize::new(0),
        }
    }

    /// Create an authenticated session that never received a refresh token
    #[cfg(test)]
    pub fn authenticated_without_refresh_token(access: &str, expires_at: &str) -> Self {
        let mut tokens = HashMap::new();
        tokens.insert(ACCESS_TOKEN.to_string(), access.to_string());
        tokens.insert(EXPIRES_AT.to_string(), expires_at.to_string());
        Self {
            tokens: RwLock::new(tokens),
            authenticated: AtomicBool::new(true),
            reissue_count: AtomicUsize::new(0),
        }
    }

    /// Number of times the authentication artifact was re-issued
    pub fn reissue_count(&self) -> usize {
        self.reissue_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenSession for MemorySession {
    async fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }

    async fn get_token(&self, name: &str) -> Option<String> {
        self.tokens.read().await.get(name).cloned()
    }

    async fn update_token_value(&self, name: &str, value: String) {
        self.tokens.write().await.insert(name.to_string(), value);
    }

    async fn sign_in(&self) -> Result<(), SessionError> {
        if !self.authenticated.load(Ordering::SeqCst) {
            return Err(SessionError::MissingAuthenticationState);
        }
        self.reissue_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn sign_out(&self, _scheme: SignOutScheme) {
        self.authenticated.store(false, Ordering::SeqCst);
        self.tokens.write().await.clear();
    }
}
