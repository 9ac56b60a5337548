use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use log::{debug, warn};
use serde::Deserialize;

#[cfg(test)]
use mockall::automock;

use crate::{config::OAuthClientConfig, error::IssuerError};

/// Tokens minted by the issuer in exchange for a refresh token.
#[derive(Clone, Debug, PartialEq)]
pub struct IssuedToken {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: SystemTime,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<u64>,
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    async fn refresh(&self, refresh_token: &str) -> Result<IssuedToken, IssuerError>;
}

/// Performs the OAuth2 `refresh_token` grant against a token endpoint,
/// authenticating the client with HTTP Basic credentials.
pub struct OAuth2TokenIssuer {
    client: reqwest::Client,
    config: OAuthClientConfig,
}

impl OAuth2TokenIssuer {
    pub fn new(config: OAuthClientConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: OAuthClientConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl TokenIssuer for OAuth2TokenIssuer {
    async fn refresh(&self, refresh_token: &str) -> Result<IssuedToken, IssuerError> {
        debug!("Refreshing access token at {}", self.config.token_url);
        let response = self
            .client
            .post(self.config.token_url.clone())
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await
            .map_err(|e| IssuerError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Token endpoint rejected refresh with status {}", status);
            return Err(IssuerError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let token = response
            .json::<TokenResponse>()
            .await
            .map_err(|e| IssuerError::InvalidResponse(e.to_string()))?;
        let expires_in = token.expires_in.ok_or_else(|| {
            IssuerError::InvalidResponse("token response has no expires_in".to_owned())
        })?;
        let expires_at = SystemTime::now()
            .checked_add(Duration::from_secs(expires_in))
            .ok_or_else(|| {
                IssuerError::InvalidResponse(format!("expires_in {} is out of range", expires_in))
            })?;

        Ok(IssuedToken {
            access_token: token.access_token,
            refresh_token: token
                .refresh_token
                .unwrap_or_else(|| refresh_token.to_owned()),
            expires_at,
        })
    }
}
