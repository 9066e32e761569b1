//! Route definitions
//!
//! Defines all HTTP API endpoints.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::handlers::{call_tool, health, list_tools, mcp, protected_resource_metadata};
use crate::middleware::auth::auth_middleware;
use crate::server::AppState;

/// Path of the OAuth protected resource metadata document
pub const RESOURCE_METADATA_PATH: &str = "/.well-known/oauth-protected-resource";

/// Create the API router
pub fn routes(state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        // MCP endpoint
        .route("/mcp", post(mcp))
        // REST tool endpoints
        .route("/api/tools", get(list_tools))
        .route("/api/tools/{name}", post(call_tool))
        .route_layer(middleware::from_fn_with_state(
            state.auth.clone(),
            auth_middleware,
        ));

    Router::new()
        // Health check
        .route("/health", get(health))
        // Discovery
        .route(RESOURCE_METADATA_PATH, get(protected_resource_metadata))
        .merge(protected)
}
