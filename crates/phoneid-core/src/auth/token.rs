//! Validated access token and its claims

use std::collections::BTreeMap;

use serde_json::{Map, Value as JsonValue};

/// Claim name to claim value, as asserted by the identity provider
pub type Claims = BTreeMap<String, String>;

/// A successfully validated OAuth access token for one invocation
///
/// Only token verifiers build these; tools see them read-only through
/// [`InvocationContext`](super::InvocationContext).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    claims: Claims,
    scopes: Vec<String>,
}

impl AccessToken {
    /// Create a token from verified claims and granted scopes
    pub fn new(claims: Claims, scopes: Vec<String>) -> Self {
        Self { claims, scopes }
    }

    /// The token's claim mapping
    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    /// Scopes granted to the token
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    /// Convert a provider JSON object into claims
    ///
    /// Strings are kept as-is, `null` claims are dropped, and any other
    /// value is stored as its JSON text.
    pub fn claims_from_json(object: &Map<String, JsonValue>) -> Claims {
        object
            .iter()
            .filter_map(|(name, value)| {
                let value = match value {
                    JsonValue::Null => return None,
                    JsonValue::String(s) => s.clone(),
                    other => other.to_string(),
                };
                Some((name.clone(), value))
            })
            .collect()
    }
}
