//! HTTP API Server
//!
//! Starts and manages the axum-based HTTP server.

use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use phoneid_core::{ServerConfig, TokenVerifier, ToolManager};

use crate::middleware::auth::AuthState;
use crate::routes::{routes, RESOURCE_METADATA_PATH};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub tools: Arc<ToolManager>,
    pub auth: AuthState,
    pub server_name: String,
    /// Public base URL, without trailing slash
    pub public_url: String,
    pub required_scopes: Vec<String>,
}

impl AppState {
    pub fn new(
        tools: ToolManager,
        verifier: Arc<dyn TokenVerifier>,
        public_url: &str,
        required_scopes: Vec<String>,
    ) -> Self {
        let public_url = public_url.trim_end_matches('/').to_string();
        let auth = AuthState::new(
            verifier,
            format!("{}{}", public_url, RESOURCE_METADATA_PATH),
        );

        Self {
            tools: Arc::new(tools),
            auth,
            server_name: "PhoneID Gateway".to_string(),
            public_url,
            required_scopes,
        }
    }

    /// URL of the protected MCP resource
    pub fn resource_url(&self) -> String {
        format!("{}/mcp", self.public_url)
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(routes(&state))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP API server
pub async fn start_server(config: &ServerConfig, state: AppState) -> anyhow::Result<()> {
    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("HTTP API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
