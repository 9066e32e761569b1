//! Middleware modules
//!
//! Contains bearer-token authentication middleware.

pub mod auth;
