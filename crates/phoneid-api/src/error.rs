//! エラー型定義 (phoneid-api)

use axum::http::StatusCode;
use thiserror::Error;

use crate::rpc::error_codes;

/// phoneid-api のエラー型
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Core error: {0}")]
    Core(#[from] phoneid_core::Error),
}

impl ApiError {
    /// HTTP status for the REST surface
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::InvalidParams(_) | Self::Json(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::MethodNotFound(_) => StatusCode::NOT_FOUND,
            Self::Core(phoneid_core::Error::ToolNotFound(_)) => StatusCode::NOT_FOUND,
            Self::Core(phoneid_core::Error::InvalidArguments(_)) => StatusCode::BAD_REQUEST,
            Self::Core(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// JSON-RPC error code for the MCP surface
    pub fn rpc_code(&self) -> i64 {
        match self {
            Self::InvalidRequest(_) => error_codes::INVALID_REQUEST,
            Self::MethodNotFound(_) => error_codes::METHOD_NOT_FOUND,
            Self::InvalidParams(_) | Self::Json(_) => error_codes::INVALID_PARAMS,
            Self::Core(phoneid_core::Error::ToolNotFound(_))
            | Self::Core(phoneid_core::Error::InvalidArguments(_)) => error_codes::INVALID_PARAMS,
            Self::Core(_) => error_codes::INTERNAL_ERROR,
        }
    }

    /// Message safe to return to the caller
    ///
    /// Internal failures are reported generically; details stay in the log.
    pub fn public_message(&self) -> String {
        match self {
            Self::Core(
                e @ (phoneid_core::Error::ToolNotFound(_)
                | phoneid_core::Error::InvalidArguments(_)),
            ) => e.to_string(),
            Self::Core(_) => "Internal error".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result 型エイリアス
pub type Result<T> = std::result::Result<T, ApiError>;
