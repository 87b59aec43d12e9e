use crate::authz::rpt_cache::RptCache;
use crate::authz::service::PermissionService;
use crate::cache::{create_cache, CacheError};
use crate::config::GatewaySettings;
use crate::provider::KeycloakClient;
use crate::token::refresh::TokenRefreshCoordinator;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<GatewaySettings>,
    pub keycloak: Arc<KeycloakClient>,
    pub refresh: Arc<TokenRefreshCoordinator>,
    pub permissions: Arc<PermissionService>,
}

impl AppState {
    pub fn new(settings: GatewaySettings) -> Result<Self, CacheError> {
        let keycloak = Arc::new(KeycloakClient::new(&settings.keycloak));

        // The two cache layers carry independent TTLs
        let rpt_cache = RptCache::new(
            create_cache(
                &settings.cache.store,
                effective_ttl(settings.cache.rpt_ttl),
                settings.cache.capacity,
            )?,
            settings.keycloak.client_id.clone(),
            settings.cache.rpt_ttl,
        );
        let permission_cache = create_cache(
            &settings.cache.store,
            settings.cache.permission_ttl,
            settings.cache.capacity,
        )?;

        let refresh = Arc::new(TokenRefreshCoordinator::new(
            keycloak.clone(),
            settings.keycloak.token_skew_seconds,
        ));
        let permissions = Arc::new(PermissionService::new(
            keycloak.clone(),
            rpt_cache,
            permission_cache,
            settings.keycloak.client_id.clone(),
        ));

        Ok(Self {
            settings: Arc::new(settings),
            keycloak,
            refresh,
            permissions,
        })
    }
}

// An rpt_ttl of 0 defers to each token's own expiry; the backing store still
// needs some bound for entries whose expiry never gets read again
fn effective_ttl(rpt_ttl: u64) -> u64 {
    if rpt_ttl > 0 {
        rpt_ttl
    } else {
        3600
    }
}
