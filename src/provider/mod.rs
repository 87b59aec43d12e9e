use crate::config::KeycloakSettings;
use http::StatusCode;
use log::warn;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

pub mod jwt;

pub use jwt::decode_jwt_claims;

const UMA_TICKET_GRANT: &str = "urn:ietf:params:oauth:grant-type:uma-ticket";

/// Token pair returned by the provider's refresh grant
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    pub expires_in: u64,
}

/// A decoded RPT: the provider's UMA access token plus its parsed claims.
/// Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodedAuthorizationToken {
    pub claims: serde_json::Map<String, serde_json::Value>,
    pub raw_access_token: String,
    pub expires_in: u64,
}

/// Errors from the provider's token endpoint.
///
/// Only the refresh path surfaces these; RPT acquisition soft-fails to None
/// because a missing RPT means "no extra permissions", not a broken request.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request to identity provider failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("identity provider rejected the request ({status}): {detail}")]
    Rejected { status: StatusCode, detail: String },
}

/// HTTP client for the Keycloak token endpoint (refresh + UMA ticket grants)
pub struct KeycloakClient {
    http: Client,
    token_endpoint: String,
    client_id: String,
    client_secret: String,
    audience: String,
}

impl KeycloakClient {
    pub fn new(settings: &KeycloakSettings) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.client_timeout))
            .connect_timeout(Duration::from_secs(2))
            // Keep a small pool of warm connections to the provider
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Some(Duration::from_secs(90)))
            .build()
            .expect("Failed to create identity provider client");

        Self {
            http,
            token_endpoint: settings.token_endpoint(),
            client_id: settings.client_id.clone(),
            client_secret: settings.client_secret.clone(),
            audience: settings.audience().to_string(),
        }
    }

    /// Exchange a refresh token for a new access/refresh token pair
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse, ProviderError> {
        let params = [
            ("grant_type", "refresh_token"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("refresh_token", refresh_token),
        ];

        let response = self
            .http
            .post(&self.token_endpoint)
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ProviderError::Rejected { status, detail });
        }

        Ok(response.json::<TokenResponse>().await?)
    }

    /// Trade an access token for an RPT scoped to the configured audience.
    ///
    /// Soft failure: any error (transport, non-2xx, undecodable token) logs a
    /// warning and yields None; the caller proceeds with zero permissions.
    pub async fn fetch_rpt(&self, access_token: &str) -> Option<DecodedAuthorizationToken> {
        let params = [
            ("grant_type", UMA_TICKET_GRANT),
            ("audience", self.audience.as_str()),
        ];

        let response = match self
            .http
            .post(&self.token_endpoint)
            .bearer_auth(access_token)
            .form(&params)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("RPT request to identity provider failed: {}", e);
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!("identity provider rejected RPT request with status {}", status);
            return None;
        }

        let body: TokenResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                warn!("failed to parse RPT response: {}", e);
                return None;
            }
        };

        let claims = match decode_jwt_claims(&body.access_token) {
            Some(claims) => claims,
            None => {
                warn!("RPT access token could not be decoded as a JWT");
                return None;
            }
        };

        Some(DecodedAuthorizationToken {
            claims,
            raw_access_token: body.access_token,
            expires_in: body.expires_in,
        })
    }
}
