pub(crate) use crate::config::cache::{CacheSettings, CacheStore};
pub(crate) use crate::config::keycloak::KeycloakSettings;
use config::{Config as ConfigCrate, ConfigError};
use serde::Deserialize;

pub mod cache;
pub mod keycloak;

/// Main configuration structure for the gateway
#[derive(Debug, Deserialize, Clone)]
pub struct GatewaySettings {
    /// The port the gateway will listen to (default: 7780)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Identity provider configuration
    #[serde(default)]
    pub keycloak: KeycloakSettings,

    /// Cache configuration
    #[serde(default)]
    pub cache: CacheSettings,
}

fn default_port() -> u16 {
    7780
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            port: default_port(),
            keycloak: KeycloakSettings::default(),
            cache: CacheSettings::default(),
        }
    }
}

impl GatewaySettings {
    /// Creates a new settings instance from environment variables
    pub fn new() -> Result<Self, String> {
        ConfigCrate::builder()
            .add_source(
                config::Environment::with_prefix("GATEWAY")
                    .prefix_separator("_")
                    .separator("_")
                    .convert_case(config::Case::Snake),
            )
            .build()
            .map_err(|e: ConfigError| e.to_string())?
            .try_deserialize()
            .map_err(|e| e.to_string())
    }

    #[cfg(test)]
    pub fn for_test_with_mocks(keycloak_mock: &wiremock::MockServer) -> Self {
        Self {
            port: 0, // Let the OS choose a port
            keycloak: KeycloakSettings {
                base_url: keycloak_mock.uri(),
                realm: "test".to_string(),
                client_id: "test-client".to_string(),
                client_secret: "test-secret".to_string(),
                rpt_audience: "".to_string(),
                token_skew_seconds: 10,
                client_timeout: 5,
            },
            cache: CacheSettings {
                store: CacheStore::InMemory,
                rpt_ttl: 60,
                permission_ttl: 60,
                capacity: 16,
            },
        }
    }
}
