//! Token verifier port
//!
//! The HTTP layer depends on [`TokenVerifier`] only, so the identity
//! provider can be swapped for a static table in development and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::auth::{AccessToken, Claims};

/// Reasons a bearer token is not accepted
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing bearer token")]
    MissingToken,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Token is missing required scopes: {0}")]
    InsufficientScope(String),

    #[error("Identity provider unavailable: {0}")]
    ProviderUnavailable(String),
}

/// Validates a raw bearer token and returns its claims
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Verify `token`, returning the validated access token
    async fn verify(&self, token: &str) -> Result<AccessToken, AuthError>;
}

/// In-memory verifier backed by a fixed token table
#[derive(Debug, Default)]
pub struct StaticTokenVerifier {
    tokens: HashMap<String, AccessToken>,
}

impl StaticTokenVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `token` and resolve it to `claims`
    pub fn with_token(mut self, token: impl Into<String>, claims: Claims) -> Self {
        self.tokens
            .insert(token.into(), AccessToken::new(claims, Vec::new()));
        self
    }
}

#[async_trait]
impl TokenVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str) -> Result<AccessToken, AuthError> {
        self.tokens
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}
