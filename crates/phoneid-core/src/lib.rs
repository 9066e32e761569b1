//! phoneid-core: PhoneID Gateway Core Library
//!
//! 認証済みアクセストークンとクレーム、ツールシステム、
//! 設定読み込みのコア機能を提供します。

pub mod auth;
pub mod config;
pub mod error;
pub mod tool;

pub use auth::{
    AccessToken, AuthError, Claims, GoogleTokenVerifier, InvocationContext, StaticTokenVerifier,
    TokenVerifier,
};
pub use config::{Config, GoogleConfig, ServerConfig, TelesignConfig};
pub use error::{Error, Result};
pub use tool::{Tool, ToolDefinition, ToolManager, ToolResult};
