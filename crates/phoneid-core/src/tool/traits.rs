//! Tool trait definition
//!
//! Defines the core trait for implementing tools that can be
//! invoked through the gateway.

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::auth::InvocationContext;
use crate::Result;

/// Tool execution result
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResult {
    /// Structured output returned to the caller as-is
    pub output: JsonValue,
    /// Whether the execution resulted in an error
    pub is_error: bool,
}

impl ToolResult {
    /// Create a successful tool result
    pub fn success(output: JsonValue) -> Self {
        Self {
            output,
            is_error: false,
        }
    }

    /// Create an error tool result
    pub fn error(output: JsonValue) -> Self {
        Self {
            output,
            is_error: true,
        }
    }
}

/// A named, independently invocable unit of server-side logic
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool name (used for dispatch)
    fn name(&self) -> &str;

    /// Get the tool description (shown to callers listing tools)
    fn description(&self) -> &str;

    /// Get the JSON schema for the tool's input parameters
    fn input_schema(&self) -> JsonValue;

    /// Execute the tool with the given input
    ///
    /// # Arguments
    /// * `ctx` - The invocation context carrying the caller's access token
    /// * `input` - JSON value containing the tool input parameters
    ///
    /// # Returns
    /// A `ToolResult` containing the structured output or error payload
    async fn execute(&self, ctx: &InvocationContext, input: JsonValue) -> Result<ToolResult>;
}
