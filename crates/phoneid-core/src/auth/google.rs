//! Google access token verifier
//!
//! Google issues opaque access tokens, so validation goes through the
//! tokeninfo endpoint (audience and scopes) and the claims come from the
//! OpenID Connect userinfo endpoint.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::auth::{AccessToken, AuthError, TokenVerifier};
use crate::config::GoogleConfig;
use crate::{Error, Result};

/// Verifies Google OAuth access tokens against Google's endpoints
#[derive(Clone)]
pub struct GoogleTokenVerifier {
    client: Client,
    client_id: String,
    required_scopes: Vec<String>,
    tokeninfo_url: String,
    userinfo_url: String,
}

/// Subset of the tokeninfo response this verifier checks
#[derive(Debug, Deserialize)]
struct TokenInfo {
    aud: Option<String>,
    azp: Option<String>,
    #[serde(default)]
    scope: String,
}

impl GoogleTokenVerifier {
    /// Create a verifier from the Google provider configuration
    pub fn new(config: &GoogleConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(Error::Http)?;

        Ok(Self::with_client(client, config))
    }

    /// Create with custom client (for testing)
    pub fn with_client(client: Client, config: &GoogleConfig) -> Self {
        Self {
            client,
            client_id: config.client_id.clone(),
            required_scopes: config.required_scopes.clone(),
            tokeninfo_url: config.tokeninfo_url.clone(),
            userinfo_url: config.userinfo_url.clone(),
        }
    }

    async fn token_info(&self, token: &str) -> std::result::Result<TokenInfo, AuthError> {
        let response = self
            .client
            .get(&self.tokeninfo_url)
            .query(&[("access_token", token)])
            .send()
            .await
            .map_err(|e| AuthError::ProviderUnavailable(e.to_string()))?;

        match response.status() {
            status if status.is_success() => response
                .json::<TokenInfo>()
                .await
                .map_err(|e| AuthError::ProviderUnavailable(e.to_string())),
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => Err(AuthError::InvalidToken),
            status => {
                warn!("Google tokeninfo returned {}", status);
                Err(AuthError::ProviderUnavailable(format!(
                    "tokeninfo returned {}",
                    status
                )))
            }
        }
    }

    async fn user_info(&self, token: &str) -> std::result::Result<JsonValue, AuthError> {
        let response = self
            .client
            .get(&self.userinfo_url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AuthError::ProviderUnavailable(e.to_string()))?;

        match response.status() {
            status if status.is_success() => response
                .json::<JsonValue>()
                .await
                .map_err(|e| AuthError::ProviderUnavailable(e.to_string())),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AuthError::InvalidToken),
            status => {
                warn!("Google userinfo returned {}", status);
                Err(AuthError::ProviderUnavailable(format!(
                    "userinfo returned {}",
                    status
                )))
            }
        }
    }

    fn check_audience(&self, info: &TokenInfo) -> std::result::Result<(), AuthError> {
        if self.client_id.is_empty() {
            return Ok(());
        }
        let matches = [&info.aud, &info.azp]
            .into_iter()
            .flatten()
            .any(|value| value == &self.client_id);
        if matches {
            Ok(())
        } else {
            debug!("Rejecting token issued for another client");
            Err(AuthError::InvalidToken)
        }
    }

    fn check_scopes(&self, granted: &[String]) -> std::result::Result<(), AuthError> {
        let missing: Vec<&str> = self
            .required_scopes
            .iter()
            .filter(|required| !granted.contains(required))
            .map(String::as_str)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AuthError::InsufficientScope(missing.join(" ")))
        }
    }
}

#[async_trait]
impl TokenVerifier for GoogleTokenVerifier {
    async fn verify(&self, token: &str) -> std::result::Result<AccessToken, AuthError> {
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        let info = self.token_info(token).await?;
        self.check_audience(&info)?;

        let scopes: Vec<String> = info.scope.split_whitespace().map(str::to_string).collect();
        self.check_scopes(&scopes)?;

        let claims = match self.user_info(token).await? {
            JsonValue::Object(object) => AccessToken::claims_from_json(&object),
            _ => {
                return Err(AuthError::ProviderUnavailable(
                    "userinfo response is not an object".to_string(),
                ));
            }
        };

        Ok(AccessToken::new(claims, scopes))
    }
}
