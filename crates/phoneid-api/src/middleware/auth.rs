//! Authentication middleware
//!
//! Validates the bearer token through the configured [`TokenVerifier`] and
//! stores the resulting [`AccessToken`] in the request extensions. Requests
//! without a valid token never reach a tool.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use http::HeaderValue;
use phoneid_core::{AccessToken, AuthError, TokenVerifier};
use serde_json::json;
use tracing::{debug, error};

/// Auth middleware state
#[derive(Clone)]
pub struct AuthState {
    pub verifier: Arc<dyn TokenVerifier>,
    /// Advertised in `WWW-Authenticate` so clients can discover the provider
    pub resource_metadata_url: String,
}

impl AuthState {
    pub fn new(verifier: Arc<dyn TokenVerifier>, resource_metadata_url: impl Into<String>) -> Self {
        Self {
            verifier,
            resource_metadata_url: resource_metadata_url.into(),
        }
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value
pub fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Bearer token authentication middleware
pub async fn auth_middleware(
    State(auth): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token);

    let result = match token {
        Some(token) => auth.verifier.verify(token).await,
        None => Err(AuthError::MissingToken),
    };

    match result {
        Ok(access_token) => {
            request.extensions_mut().insert::<AccessToken>(access_token);
            next.run(request).await
        }
        Err(e) => rejection(&auth, &e),
    }
}

fn rejection(auth: &AuthState, e: &AuthError) -> Response {
    let (status, error_code) = match e {
        AuthError::MissingToken => (StatusCode::UNAUTHORIZED, None),
        AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, Some("invalid_token")),
        AuthError::InsufficientScope(_) => (StatusCode::FORBIDDEN, Some("insufficient_scope")),
        AuthError::ProviderUnavailable(msg) => {
            error!("Auth provider unavailable: {}", msg);
            (StatusCode::SERVICE_UNAVAILABLE, None)
        }
    };
    debug!("Rejecting request: {}", e);

    let challenge = match error_code {
        Some(code) => format!(
            r#"Bearer error="{}", resource_metadata="{}""#,
            code, auth.resource_metadata_url
        ),
        None => format!(r#"Bearer resource_metadata="{}""#, auth.resource_metadata_url),
    };

    let message = match e {
        AuthError::ProviderUnavailable(_) => "Authentication service unavailable".to_string(),
        other => other.to_string(),
    };

    let mut response = (
        status,
        Json(json!({
            "error": message,
            "code": "AUTH_ERROR"
        })),
    )
        .into_response();

    if let Ok(value) = HeaderValue::from_str(&challenge) {
        response
            .headers_mut()
            .insert(header::WWW_AUTHENTICATE, value);
    }
    response
}
