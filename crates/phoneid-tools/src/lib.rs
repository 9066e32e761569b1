//! phoneid-tools: Built-in tools for phoneid-gateway
//!
//! This crate provides the tools exposed by the gateway:
//! `get_user_info` and `get_phone_id`.

use phoneid_core::{TelesignConfig, ToolManager};

pub mod phone_id;
pub mod user_info;

pub use phone_id::{CredentialSource, PhoneIdTool, PhoneLookupResult, ProxyCredentials};
pub use user_info::{IdentityProjection, UserInfoTool};

use std::sync::Arc;

/// Register all default built-in tools with the tool manager
pub fn register_default_tools(
    manager: &mut ToolManager,
    telesign: &TelesignConfig,
) -> phoneid_core::Result<()> {
    manager.register(Arc::new(UserInfoTool));
    manager.register(Arc::new(PhoneIdTool::new(telesign)?));
    Ok(())
}
