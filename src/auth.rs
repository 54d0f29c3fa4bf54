//! OAuth2 client-credentials authentication
//!
//! Exchanges an application's client id and secret for an app-only
//! bearer token scoped to a tenant, using the Microsoft identity
//! platform v2.0 token endpoint.

use crate::config::BenchmarkConfig;
use crate::error::{Error, Result};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::fmt;
use tracing::{debug, info};

/// Scope requesting every application permission granted on Graph.
pub const GRAPH_SCOPE: &str = "https://graph.microsoft.com/.default";

/// Application credentials for one tenant.
#[derive(Clone)]
pub struct ClientSecretCredential {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub authority_host: String,
    pub scope: String,
}

impl ClientSecretCredential {
    #[must_use]
    pub fn from_config(config: &BenchmarkConfig) -> Self {
        Self {
            tenant_id: config.tenant_id.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            authority_host: config.authority_host.clone(),
            scope: GRAPH_SCOPE.to_string(),
        }
    }

    #[must_use]
    pub fn token_endpoint(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.authority_host, self.tenant_id
        )
    }

    /// Request a fresh access token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Auth`] if the token endpoint rejects the
    /// credentials, or [`Error::Transport`] if it cannot be reached.
    pub async fn request_token(&self, http: &reqwest::Client) -> Result<AccessToken> {
        let endpoint = self.token_endpoint();
        debug!("Requesting token from {}", endpoint);

        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("scope", self.scope.as_str()),
        ];
        let response = http.post(&endpoint).form(&params).send().await?;

        let status = response.status();
        if status.is_success() {
            let token: TokenResponse = response
                .json()
                .await
                .map_err(|e| Error::Auth(format!("Invalid token response: {e}")))?;
            info!("Acquired token for tenant {}", self.tenant_id);
            return AccessToken::from_response(token);
        }

        let body = response.text().await.unwrap_or_default();
        let reason = serde_json::from_str::<TokenErrorResponse>(&body).map_or_else(
            |_| format!("token endpoint returned {status}"),
            |e| format!("{}: {}", e.error, e.error_description),
        );
        Err(Error::Auth(reason))
    }
}

impl fmt::Debug for ClientSecretCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSecretCredential")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("authority_host", &self.authority_host)
            .field("scope", &self.scope)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: String,
}

/// A bearer token with its expiry.
#[derive(Clone)]
pub struct AccessToken {
    secret: String,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    #[must_use]
    pub const fn new(secret: String, expires_at: DateTime<Utc>) -> Self {
        Self { secret, expires_at }
    }

    fn from_response(response: TokenResponse) -> Result<Self> {
        let expires_at = Duration::try_seconds(response.expires_in)
            .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
            .ok_or_else(|| Error::Auth(format!("invalid expires_in {}", response.expires_in)))?;
        Ok(Self {
            secret: response.access_token,
            expires_at,
        })
    }

    /// Expired, or expiring within five minutes.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now() + Duration::minutes(5) >= self.expires_at
    }

    #[must_use]
    pub const fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Value for the `Authorization` header.
    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.secret)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("secret", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
