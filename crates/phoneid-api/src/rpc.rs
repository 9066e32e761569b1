//! MCP JSON-RPC message types
//!
//! Only the subset of the Model Context Protocol the gateway serves:
//! lifecycle, ping and the tools methods.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value as JsonValue};

use phoneid_core::{ToolDefinition, ToolResult};

/// Protocol revision advertised when the client does not ask for one
pub const DEFAULT_PROTOCOL_VERSION: &str = "2025-06-18";

/// Standard JSON-RPC 2.0 error codes
pub mod error_codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;
}

/// Incoming JSON-RPC request or notification
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    /// Absent for notifications; an explicit `null` stays `Some(Null)`
    #[serde(default, deserialize_with = "present")]
    pub id: Option<JsonValue>,
    pub method: String,
    #[serde(default)]
    pub params: Option<JsonValue>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<JsonValue>, D::Error>
where
    D: Deserializer<'de>,
{
    JsonValue::deserialize(deserializer).map(Some)
}

impl JsonRpcRequest {
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }

    /// Envelope checks that apply to requests and notifications alike
    pub fn validate(&self) -> Result<(), String> {
        if self.jsonrpc != "2.0" {
            return Err(format!("unsupported jsonrpc version {:?}", self.jsonrpc));
        }
        match &self.id {
            Some(JsonValue::Null) => Err("id must not be null".to_string()),
            Some(JsonValue::String(_) | JsonValue::Number(_)) | None => Ok(()),
            Some(_) => Err("id must be a string or a number".to_string()),
        }
    }
}

/// JSON-RPC error object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
}

/// Outgoing JSON-RPC response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: JsonValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    pub fn success(id: JsonValue, result: JsonValue) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: JsonValue, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

/// `tools/call` parameters
#[derive(Debug, Clone, Deserialize)]
pub struct CallToolParams {
    pub name: String,
    #[serde(default)]
    pub arguments: Option<JsonValue>,
}

/// `initialize` parameters (only the fields the server reads)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    #[serde(default)]
    pub protocol_version: Option<String>,
}

/// `initialize` result
pub fn initialize_result(params: &InitializeParams, server_name: &str) -> JsonValue {
    let protocol_version = params
        .protocol_version
        .as_deref()
        .unwrap_or(DEFAULT_PROTOCOL_VERSION);

    json!({
        "protocolVersion": protocol_version,
        "capabilities": {
            "tools": { "listChanged": false }
        },
        "serverInfo": {
            "name": server_name,
            "version": env!("CARGO_PKG_VERSION")
        }
    })
}

/// `tools/list` result
pub fn list_tools_result(definitions: &[ToolDefinition]) -> JsonValue {
    json!({ "tools": definitions })
}

/// `tools/call` result: text and structured copies of the tool output
pub fn call_tool_result(result: &ToolResult) -> JsonValue {
    json!({
        "content": [{
            "type": "text",
            "text": result.output.to_string()
        }],
        "structuredContent": result.output,
        "isError": result.is_error
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_request_and_notification() {
        let req: JsonRpcRequest = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "tools/list"
        }))
        .unwrap();
        assert!(!req.is_notification());
        assert!(req.params.is_none());

        let note: JsonRpcRequest = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "method": "notifications/initialized"
        }))
        .unwrap();
        assert!(note.is_notification());
    }

    #[test]
    fn test_null_id_is_not_a_notification() {
        let req: JsonRpcRequest = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": null,
            "method": "tools/call"
        }))
        .unwrap();
        assert!(!req.is_notification());
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_validate_envelope() {
        let parse = |value: JsonValue| serde_json::from_value::<JsonRpcRequest>(value).unwrap();

        assert!(parse(json!({"jsonrpc": "2.0", "id": 1, "method": "ping"})).validate().is_ok());
        assert!(parse(json!({"jsonrpc": "2.0", "id": "a", "method": "ping"})).validate().is_ok());
        assert!(parse(json!({"jsonrpc": "2.0", "method": "ping"})).validate().is_ok());
        assert!(parse(json!({"jsonrpc": "1.0", "method": "ping"})).validate().is_err());
        assert!(parse(json!({"jsonrpc": "2.0", "id": [1], "method": "ping"})).validate().is_err());
    }

    #[test]
    fn test_response_serialization_skips_empty_fields() {
        let ok = serde_json::to_value(JsonRpcResponse::success(json!(1), json!({}))).unwrap();
        assert!(ok.get("error").is_none());

        let err = serde_json::to_value(JsonRpcResponse::failure(
            json!("a"),
            error_codes::METHOD_NOT_FOUND,
            "nope",
        ))
        .unwrap();
        assert!(err.get("result").is_none());
        assert_eq!(err["error"]["code"], -32601);
    }

    #[test]
    fn test_initialize_echoes_protocol_version() {
        let params = InitializeParams {
            protocol_version: Some("2025-03-26".to_string()),
        };
        let result = initialize_result(&params, "PhoneID Gateway");
        assert_eq!(result["protocolVersion"], "2025-03-26");
        assert_eq!(result["serverInfo"]["name"], "PhoneID Gateway");

        let result = initialize_result(&InitializeParams::default(), "x");
        assert_eq!(result["protocolVersion"], DEFAULT_PROTOCOL_VERSION);
    }

    #[test]
    fn test_call_tool_result_shape() {
        let result = call_tool_result(&ToolResult::error(json!({"error": "boom"})));
        assert_eq!(result["isError"], true);
        assert_eq!(result["structuredContent"]["error"], "boom");
        assert_eq!(result["content"][0]["type"], "text");
        assert_eq!(result["content"][0]["text"], r#"{"error":"boom"}"#);
    }
}
