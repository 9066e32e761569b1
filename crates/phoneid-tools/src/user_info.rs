//! get_user_info tool
//!
//! Returns a fixed projection of the caller's identity claims.

use async_trait::async_trait;
use phoneid_core::tool::SchemaBuilder;
use phoneid_core::{Claims, InvocationContext, Result, Tool, ToolResult};
use serde::Serialize;
use serde_json::Value;

/// The caller's identity as exposed to clients
///
/// Every field is a copy of one claim, or `null` when the claim is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IdentityProjection {
    pub google_id: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
    pub locale: Option<String>,
}

impl IdentityProjection {
    pub fn from_claims(claims: &Claims) -> Self {
        let claim = |name: &str| claims.get(name).cloned();
        Self {
            google_id: claim("sub"),
            email: claim("email"),
            name: claim("name"),
            picture: claim("picture"),
            locale: claim("locale"),
        }
    }
}

/// Reports the authenticated Google user
pub struct UserInfoTool;

#[async_trait]
impl Tool for UserInfoTool {
    fn name(&self) -> &str {
        "get_user_info"
    }

    fn description(&self) -> &str {
        "Returns information about the authenticated Google user."
    }

    fn input_schema(&self) -> Value {
        SchemaBuilder::empty_object()
    }

    async fn execute(&self, ctx: &InvocationContext, _input: Value) -> Result<ToolResult> {
        let projection = IdentityProjection::from_claims(ctx.claims()?);
        Ok(ToolResult::success(serde_json::to_value(projection)?))
    }
}
