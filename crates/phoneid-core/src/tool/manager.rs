//! Tool manager for registering and executing tools

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value as JsonValue;
use tracing::{debug, error};

use crate::auth::InvocationContext;
use crate::tool::{Tool, ToolDefinition, ToolResult};
use crate::{Error, Result};

/// Manager for registered tools
///
/// Handles tool registration, retrieval, and execution.
pub struct ToolManager {
    /// Registered tools indexed by name
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolManager {
    /// Create a new empty tool manager
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool
    ///
    /// If a tool with the same name already exists, it will be replaced.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Get all registered tool definitions, sorted by name
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut definitions: Vec<ToolDefinition> = self
            .tools
            .values()
            .map(|t| ToolDefinition::new(t.name(), t.description(), t.input_schema()))
            .collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }

    /// Execute a tool by name
    ///
    /// # Arguments
    /// * `name` - The name of the tool to execute
    /// * `ctx` - The caller's invocation context
    /// * `input` - The input parameters for the tool
    ///
    /// # Errors
    /// Returns an error if the tool is not found, the input is rejected, or
    /// the tool was dispatched without an access token.
    pub async fn execute(
        &self,
        name: &str,
        ctx: &InvocationContext,
        input: JsonValue,
    ) -> Result<ToolResult> {
        let tool = self
            .get(name)
            .ok_or_else(|| Error::ToolNotFound(name.to_string()))?;

        debug!(tool = %name, "Executing tool");
        let result = tool.execute(ctx, input).await;

        if let Err(Error::NoActiveToken) = &result {
            error!(tool = %name, "Tool dispatched without an access token");
        }
        result
    }

    /// Check if a tool is registered
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if no tools are registered
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Get all registered tool names
    pub fn tool_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl Default for ToolManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AccessToken, Claims};
    use async_trait::async_trait;
    use serde_json::json;

    struct EchoSubTool;

    #[async_trait]
    impl Tool for EchoSubTool {
        fn name(&self) -> &str {
            "echo_sub"
        }

        fn description(&self) -> &str {
            "Returns the caller's subject claim"
        }

        fn input_schema(&self) -> JsonValue {
            json!({"type": "object"})
        }

        async fn execute(&self, ctx: &InvocationContext, _input: JsonValue) -> Result<ToolResult> {
            let claims = ctx.claims()?;
            Ok(ToolResult::success(json!({ "sub": claims.get("sub") })))
        }
    }

    fn authenticated() -> InvocationContext {
        let mut claims = Claims::new();
        claims.insert("sub".to_string(), "user-1".to_string());
        InvocationContext::authenticated(AccessToken::new(claims, vec![]))
    }

    #[test]
    fn test_register_and_lookup() {
        let mut manager = ToolManager::new();
        assert!(manager.is_empty());

        manager.register(Arc::new(EchoSubTool));
        assert_eq!(manager.len(), 1);
        assert!(manager.contains("echo_sub"));
        assert!(manager.get("missing").is_none());
        assert_eq!(manager.tool_names(), vec!["echo_sub"]);

        let definitions = manager.definitions();
        assert_eq!(definitions[0].name, "echo_sub");
        assert_eq!(definitions[0].description, "Returns the caller's subject claim");
    }

    #[tokio::test]
    async fn test_execute_with_context() {
        let mut manager = ToolManager::new();
        manager.register(Arc::new(EchoSubTool));

        let result = manager
            .execute("echo_sub", &authenticated(), json!({}))
            .await
            .unwrap();
        assert!(!result.is_error);
        assert_eq!(result.output, json!({"sub": "user-1"}));
    }

    #[tokio::test]
    async fn test_execute_unknown_tool() {
        let manager = ToolManager::new();
        let result = manager.execute("nope", &authenticated(), json!({})).await;
        assert!(matches!(result, Err(Error::ToolNotFound(name)) if name == "nope"));
    }

    #[tokio::test]
    async fn test_execute_without_token_propagates() {
        let mut manager = ToolManager::new();
        manager.register(Arc::new(EchoSubTool));

        let result = manager
            .execute("echo_sub", &InvocationContext::unauthenticated(), json!({}))
            .await;
        assert!(matches!(result, Err(Error::NoActiveToken)));
    }
}
