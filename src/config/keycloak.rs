use serde::Deserialize;

/// Identity provider (Keycloak) configuration options
#[derive(Debug, Deserialize, Clone)]
pub struct KeycloakSettings {
    /// Base URL of the Keycloak server (default: http://localhost:8080)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Realm name (default: master)
    #[serde(default = "default_realm")]
    pub realm: String,

    /// Client id used for refresh and RPT requests
    #[serde(default)]
    pub client_id: String,

    /// Client secret used for refresh requests
    #[serde(default)]
    pub client_secret: String,

    /// Audience requested for RPT tokens; empty means the client id is used
    #[serde(default)]
    pub rpt_audience: String,

    /// Clock skew applied when deciding whether a token is expired (default: 10s)
    #[serde(default = "default_token_skew")]
    pub token_skew_seconds: u64,

    /// Request timeout towards the provider in seconds (default: 5)
    #[serde(default = "default_client_timeout")]
    pub client_timeout: u64,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_realm() -> String {
    "master".to_string()
}

fn default_token_skew() -> u64 {
    10
}

fn default_client_timeout() -> u64 {
    5
}

impl Default for KeycloakSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            realm: default_realm(),
            client_id: String::new(),
            client_secret: String::new(),
            rpt_audience: String::new(),
            token_skew_seconds: default_token_skew(),
            client_timeout: default_client_timeout(),
        }
    }
}

impl KeycloakSettings {
    /// The realm's OIDC token endpoint, used for both refresh and UMA ticket grants
    pub fn token_endpoint(&self) -> String {
        format!(
            "{}/realms/{}/protocol/openid-connect/token",
            self.base_url.trim_end_matches('/'),
            self.realm
        )
    }

    /// Audience for RPT requests, falling back to the client id
    pub fn audience(&self) -> &str {
        if self.rpt_audience.is_empty() {
            &self.client_id
        } else {
            &self.rpt_audience
        }
    }
}
