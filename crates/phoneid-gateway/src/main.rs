//! phoneid-gateway: PhoneID Gateway Main Binary
//!
//! Main entry point for the PhoneID Gateway server.
//!
//! Usage:
//!   phoneid-gateway           - Start the HTTP server
//!   phoneid-gateway --help    - Show help

use std::future::Future;
use std::sync::Arc;

use phoneid_api::AppState;
use phoneid_core::{Config, GoogleTokenVerifier, ServerConfig, ToolManager};
use phoneid_tools::register_default_tools;
use tracing_subscriber::EnvFilter;

/// Run mode
enum RunMode {
    /// Serve the gateway
    Server,
    /// Show help
    Help,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    match parse_args() {
        RunMode::Help => {
            print_help();
            return Ok(());
        }
        RunMode::Version => {
            println!("phoneid-gateway {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        RunMode::Server => {}
    }

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    // Load .env file (existing variables win)
    dotenvy::dotenv().ok();

    let config = Config::load().map_err(|e| anyhow::anyhow!("Config error: {}", e))?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Config error: {}", e))?;

    tracing::info!("Starting phoneid-gateway...");
    tracing::info!("Public URL: {}", config.server.public_url);

    if !config.telesign.has_configured_credentials() {
        tracing::info!("Telesign credentials will be read from the environment per call");
    }

    run_server(config).await
}

/// Parse command line arguments
fn parse_args() -> RunMode {
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--help" | "-h" => return RunMode::Help,
            "--version" | "-v" => return RunMode::Version,
            _ => {}
        }
    }

    RunMode::Server
}

/// Print help message
fn print_help() {
    println!("phoneid-gateway - Authenticated Telesign PhoneID tool gateway");
    println!();
    println!("Usage:");
    println!("  phoneid-gateway           Start the HTTP server");
    println!("  phoneid-gateway --help    Show this help message");
    println!("  phoneid-gateway --version Show version");
    println!();
    println!("Environment Variables:");
    println!("  GOOGLE_CLIENT_ID         Google OAuth client ID (required)");
    println!("  GOOGLE_CLIENT_SECRET     Google OAuth client secret (required)");
    println!("  SERVER_URL               Public base URL (default: http://localhost:8000)");
    println!("  SERVER_HOST              Bind address (default: 0.0.0.0)");
    println!("  SERVER_PORT              Bind port (default: 8000)");
    println!("  TELESIGN_ID              Telesign customer ID");
    println!("  TELESIGN_TOKEN           Telesign API key");
    println!("  TELESIGN_BASE_URL        Telesign API base URL");
}

/// Run the HTTP server until Ctrl+C
async fn run_server(config: Config) -> anyhow::Result<()> {
    let mut tool_manager = ToolManager::new();
    register_default_tools(&mut tool_manager, &config.telesign)
        .map_err(|e| anyhow::anyhow!("Failed to register tools: {}", e))?;

    tracing::info!(
        "Registered {} tools: {:?}",
        tool_manager.len(),
        tool_manager.tool_names()
    );

    let verifier = GoogleTokenVerifier::new(&config.google)
        .map_err(|e| anyhow::anyhow!("Failed to create token verifier: {}", e))?;

    let state = AppState::new(
        tool_manager,
        Arc::new(verifier),
        &config.server.public_url,
        config.google.required_scopes.clone(),
    );

    tracing::info!("Press Ctrl+C to exit");

    serve_until(&config.server, state, tokio::signal::ctrl_c()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Serve until `shutdown` resolves; a server failure ends the process with an error
async fn serve_until<F>(config: &ServerConfig, state: AppState, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = std::io::Result<()>>,
{
    tokio::select! {
        result = phoneid_api::start_server(config, state) => {
            result.map_err(|e| anyhow::anyhow!("HTTP API error: {}", e))
        }
        signal = shutdown => {
            signal?;
            tracing::info!("Shutting down...");
            Ok(())
        }
    }
}
