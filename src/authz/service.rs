use crate::authz::permissions::{self, Permission};
use crate::authz::rpt_cache::RptCache;
use crate::cache::{Cache, CacheBackend};
use crate::provider::{DecodedAuthorizationToken, KeycloakClient};
use log::{debug, warn};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Orchestrates RPT acquisition, the two cache layers, and permission
/// extraction behind a stable lookup contract.
///
/// All provider and cache failures degrade to an empty permission list; a
/// permission lookup must never break the request pipeline, it results in
/// "no extra permissions granted".
pub struct PermissionService {
    keycloak: Arc<KeycloakClient>,
    rpt_cache: RptCache,
    permission_cache: Cache,
    client_id: String,
    // Serializes RPT fetches process-wide; deliberately distinct from the
    // token refresh lock, which protects a different resource
    fetch_lock: Mutex<()>,
}

impl PermissionService {
    pub fn new(
        keycloak: Arc<KeycloakClient>,
        rpt_cache: RptCache,
        permission_cache: Cache,
        client_id: String,
    ) -> Self {
        Self {
            keycloak,
            rpt_cache,
            permission_cache,
            client_id,
            fetch_lock: Mutex::new(()),
        }
    }

    fn permission_key(&self, user_id: &str) -> String {
        format!("permissions:{}:{}", self.client_id, user_id)
    }

    /// Resolve a user's permission list, consulting the permission cache,
    /// then the RPT cache, then the provider.
    pub async fn get_user_permissions(&self, user_id: &str, access_token: &str) -> Vec<Permission> {
        let key = self.permission_key(user_id);
        if let Some(cached) = self.cached_permissions(&key).await {
            debug!("permission cache hit for {}", key);
            return cached;
        }

        // Single-flight the expensive RPT acquisition
        let _guard = self.fetch_lock.lock().await;

        // Another request may have populated the RPT cache while we waited
        let decoded = match self.rpt_cache.get(user_id).await {
            Some(decoded) => decoded,
            None => match self.keycloak.fetch_rpt(access_token).await {
                Some(decoded) => self.rpt_cache.store(user_id, decoded).await,
                // No negative caching: a transient provider failure must not
                // poison the cache
                None => return Vec::new(),
            },
        };

        let resolved = Self::permissions_from_rpt(&decoded);
        if let Err(e) = self.permission_cache.set(&key, &resolved).await {
            warn!("failed to cache permissions for {}: {}", key, e);
        }
        resolved
    }

    /// Case-insensitive check for a single resource/action pair
    pub async fn has_permission(
        &self,
        user_id: &str,
        access_token: &str,
        resource: &str,
        action: &str,
    ) -> bool {
        self.get_user_permissions(user_id, access_token)
            .await
            .iter()
            .any(|permission| permission.matches(resource, action))
    }

    /// Drop a user's cached permissions.
    ///
    /// Invalidation cascades through both layers; clearing only the outer
    /// list would let stale permissions resurface from the RPT cache.
    pub async fn invalidate_user_permissions(&self, user_id: &str) {
        let key = self.permission_key(user_id);
        if let Err(e) = self.permission_cache.delete(&key).await {
            warn!("failed to invalidate permissions {}: {}", key, e);
        }
        self.rpt_cache.remove(user_id).await;
    }

    async fn cached_permissions(&self, key: &str) -> Option<Vec<Permission>> {
        match self.permission_cache.get::<Vec<Permission>>(key).await {
            Ok(hit) => hit,
            Err(e) => {
                warn!("cache error reading {}: {}", key, e);
                None
            }
        }
    }

    fn permissions_from_rpt(decoded: &DecodedAuthorizationToken) -> Vec<Permission> {
        match decoded.claims.get("authorization") {
            Some(claim) => permissions::extract(claim),
            None => Vec::new(),
        }
    }
}
