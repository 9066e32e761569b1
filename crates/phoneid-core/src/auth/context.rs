//! Per-invocation context
//!
//! The dispatcher builds one context per tool call and passes it to the
//! tool by reference. Concurrent invocations never share a context.

use std::sync::Arc;

use crate::auth::{AccessToken, Claims};
use crate::{Error, Result};

/// Context handed to a tool for a single invocation
#[derive(Debug, Clone, Default)]
pub struct InvocationContext {
    access_token: Option<Arc<AccessToken>>,
}

impl InvocationContext {
    /// Context for a request the provider has authenticated
    pub fn authenticated(token: AccessToken) -> Self {
        Self {
            access_token: Some(Arc::new(token)),
        }
    }

    /// Context with no access token bound
    pub fn unauthenticated() -> Self {
        Self::default()
    }

    /// The access token bound to this invocation
    ///
    /// # Errors
    /// Returns [`Error::NoActiveToken`] outside an authenticated invocation.
    pub fn access_token(&self) -> Result<&AccessToken> {
        self.access_token.as_deref().ok_or(Error::NoActiveToken)
    }

    /// The bound token's claims, unmodified
    ///
    /// # Errors
    /// Returns [`Error::NoActiveToken`] outside an authenticated invocation.
    pub fn claims(&self) -> Result<&Claims> {
        self.access_token().map(AccessToken::claims)
    }
}

impl From<Option<AccessToken>> for InvocationContext {
    fn from(token: Option<AccessToken>) -> Self {
        token.map(Self::authenticated).unwrap_or_default()
    }
}
