//! HTTP API handlers
//!
//! MCP JSON-RPC endpoint, REST tool endpoints and discovery metadata.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{Extensions, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value as JsonValue};
use tracing::{debug, error, info, warn};

use phoneid_core::{AccessToken, InvocationContext};

use crate::error::ApiError;
use crate::rpc::{
    call_tool_result, error_codes, initialize_result, list_tools_result, CallToolParams,
    InitializeParams, JsonRpcRequest, JsonRpcResponse,
};
use crate::server::AppState;

/// Google's authorization server, advertised to MCP clients
const AUTHORIZATION_SERVER: &str = "https://accounts.google.com";

/// Generic API error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Build the invocation context from what the auth middleware stored
fn invocation_context(extensions: &Extensions) -> InvocationContext {
    InvocationContext::from(extensions.get::<AccessToken>().cloned())
}

fn log_api_error(e: &ApiError) {
    match e {
        ApiError::Core(phoneid_core::Error::NoActiveToken) => {
            error!("Tool invoked without an authenticated context: {}", e)
        }
        ApiError::Core(_) if e.status_code().is_server_error() => error!("{}", e),
        _ => debug!("{}", e),
    }
}

/// Health check endpoint
pub async fn health() -> &'static str {
    "OK"
}

/// OAuth protected resource metadata (RFC 9728)
pub async fn protected_resource_metadata(State(state): State<AppState>) -> Json<JsonValue> {
    Json(json!({
        "resource": state.resource_url(),
        "authorization_servers": [AUTHORIZATION_SERVER],
        "scopes_supported": state.required_scopes,
        "bearer_methods_supported": ["header"]
    }))
}

/// MCP endpoint - JSON-RPC over HTTP POST
pub async fn mcp(State(state): State<AppState>, extensions: Extensions, body: Bytes) -> Response {
    let value: JsonValue = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(JsonRpcResponse::failure(
                    JsonValue::Null,
                    error_codes::PARSE_ERROR,
                    format!("Parse error: {}", e),
                )),
            )
                .into_response();
        }
    };

    let request: JsonRpcRequest = match serde_json::from_value(value) {
        Ok(request) => request,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(JsonRpcResponse::failure(
                    JsonValue::Null,
                    error_codes::INVALID_REQUEST,
                    format!("Invalid request: {}", e),
                )),
            )
                .into_response();
        }
    };

    if let Err(reason) = request.validate() {
        let e = ApiError::InvalidRequest(reason);
        debug!("{}", e);
        return (
            StatusCode::BAD_REQUEST,
            Json(JsonRpcResponse::failure(
                JsonValue::Null,
                e.rpc_code(),
                e.public_message(),
            )),
        )
            .into_response();
    }

    if request.is_notification() {
        debug!(method = %request.method, "Notification received");
        return StatusCode::ACCEPTED.into_response();
    }

    let id = request.id.clone().unwrap_or(JsonValue::Null);
    let ctx = invocation_context(&extensions);

    match dispatch(&state, &ctx, request).await {
        Ok(result) => Json(JsonRpcResponse::success(id, result)).into_response(),
        Err(e) => {
            log_api_error(&e);
            Json(JsonRpcResponse::failure(id, e.rpc_code(), e.public_message())).into_response()
        }
    }
}

async fn dispatch(
    state: &AppState,
    ctx: &InvocationContext,
    request: JsonRpcRequest,
) -> crate::Result<JsonValue> {
    match request.method.as_str() {
        "initialize" => {
            let params: InitializeParams = match request.params {
                Some(params) => serde_json::from_value(params)
                    .map_err(|e| ApiError::InvalidParams(e.to_string()))?,
                None => InitializeParams::default(),
            };
            Ok(initialize_result(&params, &state.server_name))
        }
        "ping" => Ok(json!({})),
        "tools/list" => Ok(list_tools_result(&state.tools.definitions())),
        "tools/call" => {
            let params: CallToolParams = request
                .params
                .ok_or_else(|| ApiError::InvalidParams("missing params".to_string()))
                .and_then(|params| {
                    serde_json::from_value(params)
                        .map_err(|e| ApiError::InvalidParams(e.to_string()))
                })?;

            info!(tool = %params.name, "tools/call");
            let input = params.arguments.unwrap_or_else(|| json!({}));
            let result = state.tools.execute(&params.name, ctx, input).await?;
            if result.is_error {
                warn!(tool = %params.name, "Tool returned an error result");
            }
            Ok(call_tool_result(&result))
        }
        other => Err(ApiError::MethodNotFound(other.to_string())),
    }
}

/// List registered tools
pub async fn list_tools(State(state): State<AppState>) -> Json<JsonValue> {
    Json(list_tools_result(&state.tools.definitions()))
}

/// Invoke a tool directly; the body is the arguments object
pub async fn call_tool(
    State(state): State<AppState>,
    Path(name): Path<String>,
    extensions: Extensions,
    body: Bytes,
) -> Result<Json<JsonValue>, (StatusCode, Json<ErrorResponse>)> {
    let into_response = |e: ApiError| {
        log_api_error(&e);
        (
            e.status_code(),
            Json(ErrorResponse {
                error: e.public_message(),
            }),
        )
    };

    let input = if body.is_empty() {
        json!({})
    } else {
        serde_json::from_slice(&body).map_err(|e| into_response(ApiError::Json(e)))?
    };

    info!(tool = %name, "REST tool call");
    let ctx = invocation_context(&extensions);
    let result = state
        .tools
        .execute(&name, &ctx, input)
        .await
        .map_err(|e| into_response(ApiError::Core(e)))?;

    Ok(Json(result.output))
}
