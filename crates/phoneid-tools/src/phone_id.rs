//! get_phone_id tool
//!
//! Proxies a lookup to Telesign's PhoneID API and normalizes the response.
//! Every failure, from missing credentials to an undecodable body, comes
//! back as a [`PhoneLookupResult::Error`]; nothing escapes as a fault.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use phoneid_core::tool::SchemaBuilder;
use phoneid_core::{InvocationContext, Result, TelesignConfig, Tool, ToolResult};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Message returned when either credential half is missing
pub const MISSING_CREDENTIALS_MESSAGE: &str =
    "Missing credentials: set TELESIGN_ID and TELESIGN_TOKEN in the environment.";

/// Message returned for non-2xx upstream responses
pub const REQUEST_FAILED_MESSAGE: &str = "Telesign PhoneID request failed";

/// Raw error bodies are cut to this many characters
const MAX_ERROR_BODY_CHARS: usize = 2000;

/// Telesign customer ID and API key used for Basic auth
#[derive(Clone, PartialEq, Eq)]
pub struct ProxyCredentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for ProxyCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Where the tool reads its credentials from on each invocation
#[derive(Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Re-read `TELESIGN_ID` / `TELESIGN_TOKEN` on every call
    Env,
    /// Fixed values taken from configuration
    Static {
        customer_id: Option<String>,
        api_key: Option<String>,
    },
}

impl fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Env => write!(f, "Env"),
            Self::Static { customer_id, api_key } => f
                .debug_struct("Static")
                .field("customer_id", customer_id)
                .field("api_key", &api_key.as_ref().map(|_| "<redacted>"))
                .finish(),
        }
    }
}

impl CredentialSource {
    /// Static credentials when configuration supplied any, env otherwise
    pub fn from_config(config: &TelesignConfig) -> Self {
        if config.has_configured_credentials() {
            Self::Static {
                customer_id: config.customer_id.clone(),
                api_key: config.api_key.clone(),
            }
        } else {
            Self::Env
        }
    }

    /// Resolve both halves; `None` if either is absent or empty
    pub fn resolve(&self) -> Option<ProxyCredentials> {
        let (username, password) = match self {
            Self::Env => (
                std::env::var("TELESIGN_ID").ok(),
                std::env::var("TELESIGN_TOKEN").ok(),
            ),
            Self::Static {
                customer_id,
                api_key,
            } => (customer_id.clone(), api_key.clone()),
        };

        Some(ProxyCredentials {
            username: username.filter(|v| !v.is_empty())?,
            password: password.filter(|v| !v.is_empty())?,
        })
    }
}

/// Normalized outcome of a PhoneID lookup
#[derive(Debug, Clone, PartialEq)]
pub enum PhoneLookupResult {
    /// Upstream 2xx body, decoded but not interpreted
    Success(Value),
    /// Any failure, with upstream status and payload when there was a response
    Error {
        message: String,
        status: Option<u16>,
        details: Option<Value>,
    },
}

impl PhoneLookupResult {
    fn message(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
            status: None,
            details: None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Wire shape: the upstream body verbatim, or `{"error", "status"?, "details"?}`
    pub fn to_json(&self) -> Value {
        match self {
            Self::Success(body) => body.clone(),
            Self::Error {
                message,
                status,
                details,
            } => {
                let mut payload = serde_json::Map::new();
                payload.insert("error".to_string(), json!(message));
                if let Some(status) = status {
                    payload.insert("status".to_string(), json!(status));
                }
                if let Some(details) = details {
                    payload.insert("details".to_string(), details.clone());
                }
                Value::Object(payload)
            }
        }
    }
}

impl From<PhoneLookupResult> for ToolResult {
    fn from(result: PhoneLookupResult) -> Self {
        let output = result.to_json();
        if result.is_success() {
            ToolResult::success(output)
        } else {
            ToolResult::error(output)
        }
    }
}

/// Failure stages of the outbound call
#[derive(Error, Debug)]
enum LookupFailure {
    #[error("Telesign PhoneID request failed")]
    Upstream { status: u16, details: Value },

    #[error("Network error while calling Telesign: {kind}: {source}")]
    Network {
        kind: &'static str,
        source: reqwest::Error,
    },

    #[error("Unexpected error: {kind}: {detail}")]
    Unexpected { kind: &'static str, detail: String },
}

impl LookupFailure {
    /// Transport failures are network errors; a request that could not be
    /// built is not.
    fn from_transport(error: reqwest::Error) -> Self {
        let kind = reqwest_error_kind(&error);
        if error.is_builder() {
            Self::Unexpected {
                kind,
                detail: error.to_string(),
            }
        } else {
            Self::Network { kind, source: error }
        }
    }
}

impl From<LookupFailure> for PhoneLookupResult {
    fn from(failure: LookupFailure) -> Self {
        let message = failure.to_string();
        match failure {
            LookupFailure::Upstream { status, details } => Self::Error {
                message,
                status: Some(status),
                details: Some(details),
            },
            LookupFailure::Network { .. } | LookupFailure::Unexpected { .. } => {
                Self::message(message)
            }
        }
    }
}

fn reqwest_error_kind(error: &reqwest::Error) -> &'static str {
    if error.is_timeout() {
        "TimeoutError"
    } else if error.is_connect() {
        "ConnectError"
    } else if error.is_builder() {
        "BuilderError"
    } else if error.is_redirect() {
        "RedirectError"
    } else if error.is_body() {
        "BodyError"
    } else if error.is_decode() {
        "DecodeError"
    } else if error.is_request() {
        "RequestError"
    } else {
        "TransportError"
    }
}

/// First `max_chars` characters of `text`
fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// get_phone_id input parameters
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PhoneIdInput {
    /// Target phone number in E.164 format
    phone_number: String,
}

/// Telesign PhoneID proxy tool
pub struct PhoneIdTool {
    client: Client,
    base_url: String,
    credentials: CredentialSource,
}

impl PhoneIdTool {
    /// Create a new PhoneIdTool from the Telesign configuration
    pub fn new(config: &TelesignConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(phoneid_core::Error::Http)?;

        Ok(Self::with_client(
            client,
            &config.base_url,
            CredentialSource::from_config(config),
        ))
    }

    /// Create with custom client (for testing)
    pub fn with_client(client: Client, base_url: &str, credentials: CredentialSource) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    /// Look up `phone_number`, returning a normalized result
    ///
    /// The number is interpolated into the URL path as given; callers are
    /// expected to pass E.164.
    pub async fn lookup(&self, phone_number: &str) -> PhoneLookupResult {
        let Some(credentials) = self.credentials.resolve() else {
            warn!("Telesign credentials are not configured");
            return PhoneLookupResult::message(MISSING_CREDENTIALS_MESSAGE);
        };

        match self.request(phone_number, &credentials).await {
            Ok(body) => PhoneLookupResult::Success(body),
            Err(failure) => {
                warn!("PhoneID lookup failed: {}", failure);
                failure.into()
            }
        }
    }

    async fn request(
        &self,
        phone_number: &str,
        credentials: &ProxyCredentials,
    ) -> std::result::Result<Value, LookupFailure> {
        let url = Url::parse(&format!("{}/v1/phoneid/{}", self.base_url, phone_number))
            .map_err(|e| LookupFailure::Unexpected {
                kind: "InvalidUrl",
                detail: e.to_string(),
            })?;

        debug!(url = %url, "Sending PhoneID request");

        let response = self
            .client
            .post(url)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .basic_auth(&credentials.username, Some(&credentials.password))
            .json(&json!({}))
            .send()
            .await
            .map_err(LookupFailure::from_transport)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(LookupFailure::from_transport)?;

        if !status.is_success() {
            let details = serde_json::from_str::<Value>(&body).unwrap_or_else(|_| {
                json!({
                    "status": status.as_u16(),
                    "body": truncate_chars(&body, MAX_ERROR_BODY_CHARS),
                })
            });
            return Err(LookupFailure::Upstream {
                status: status.as_u16(),
                details,
            });
        }

        info!(status = status.as_u16(), "PhoneID request succeeded");

        serde_json::from_str(&body).map_err(|e| LookupFailure::Unexpected {
            kind: "JSONDecodeError",
            detail: e.to_string(),
        })
    }
}

#[async_trait]
impl Tool for PhoneIdTool {
    fn name(&self) -> &str {
        "get_phone_id"
    }

    fn description(&self) -> &str {
        "Retrieve PhoneID information from Telesign for a given phone number. \
         Returns the JSON response from Telesign's PhoneID API, or an object with an \
         \"error\" field describing what went wrong."
    }

    fn input_schema(&self) -> Value {
        SchemaBuilder::object_schema_with_descriptions(vec![(
            "phoneNumber",
            "string",
            "The target phone number in E.164 format, e.g. \"+14155550123\".",
            true,
        )])
    }

    async fn execute(&self, _ctx: &InvocationContext, input: Value) -> Result<ToolResult> {
        let input: PhoneIdInput = serde_json::from_value(input).map_err(|e| {
            phoneid_core::Error::InvalidArguments(format!("Invalid input parameters: {}", e))
        })?;

        Ok(self.lookup(&input.phone_number).await.into())
    }
}
