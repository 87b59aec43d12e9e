use crate::cache::{Cache, CacheBackend};
use crate::provider::DecodedAuthorizationToken;
use chrono::Utc;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// A cached RPT with its absolute expiry in unix seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredRpt {
    token: DecodedAuthorizationToken,
    expires_at: i64,
}

/// Per-user cache of decoded RPT tokens.
///
/// Keys incorporate the client id so multi-tenant deployments sharing a
/// process don't collide. Entries carry their own absolute expiry on top of
/// the backend TTL: the configured TTL when caching is enabled, otherwise
/// the RPT's own `expires_in`.
pub struct RptCache {
    cache: Cache,
    client_id: String,
    ttl_secs: u64,
}

impl RptCache {
    /// `ttl_secs` of 0 means entries live as long as the token itself
    pub fn new(cache: Cache, client_id: String, ttl_secs: u64) -> Self {
        Self {
            cache,
            client_id,
            ttl_secs,
        }
    }

    fn key(&self, user_id: &str) -> String {
        format!("rpt:{}:{}", self.client_id, user_id)
    }

    /// Store a decoded RPT for a user, returning it for chaining
    pub async fn store(
        &self,
        user_id: &str,
        token: DecodedAuthorizationToken,
    ) -> DecodedAuthorizationToken {
        let ttl = if self.ttl_secs > 0 {
            self.ttl_secs
        } else {
            token.expires_in
        };
        let entry = StoredRpt {
            token: token.clone(),
            expires_at: Utc::now().timestamp() + ttl as i64,
        };
        let key = self.key(user_id);
        if let Err(e) = self.cache.set(&key, &entry).await {
            warn!("failed to cache RPT for {}: {}", key, e);
        }
        token
    }

    /// Retrieve a user's cached RPT if it hasn't expired
    pub async fn get(&self, user_id: &str) -> Option<DecodedAuthorizationToken> {
        let key = self.key(user_id);
        let entry: StoredRpt = match self.cache.get(&key).await {
            Ok(Some(entry)) => entry,
            Ok(None) => return None,
            Err(e) => {
                warn!("cache error reading {}: {}", key, e);
                return None;
            }
        };

        if Utc::now().timestamp() >= entry.expires_at {
            debug!("cached RPT for {} expired, dropping", key);
            if let Err(e) = self.cache.delete(&key).await {
                warn!("failed to delete expired RPT {}: {}", key, e);
            }
            return None;
        }

        Some(entry.token)
    }

    /// Remove a user's cached RPT
    pub async fn remove(&self, user_id: &str) {
        let key = self.key(user_id);
        if let Err(e) = self.cache.delete(&key).await {
            warn!("failed to delete cached RPT {}: {}", key, e);
        }
    }
}
