//! phoneid-api: HTTP API for PhoneID Gateway
//!
//! Exposes the registered tools over MCP JSON-RPC and a small REST
//! surface. Every tool route sits behind bearer-token authentication.
//! Built with axum for async HTTP handling.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod rpc;
pub mod server;

pub use error::{ApiError, Result};
pub use server::{router, start_server, AppState};
