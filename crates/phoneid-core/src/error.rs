//! Error types for phoneid-core

use thiserror::Error;

/// Main error type for phoneid-core
#[derive(Error, Debug)]
pub enum Error {
    /// Claims were requested outside an authenticated invocation.
    ///
    /// This is a wiring bug in the dispatcher, never a user-facing condition.
    #[error("No active access token for this invocation")]
    NoActiveToken,

    #[error("Unknown tool: {0}")]
    ToolNotFound(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for phoneid-core
pub type Result<T> = std::result::Result<T, Error>;
