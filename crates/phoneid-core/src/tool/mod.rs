//! Tool system
//!
//! This module provides the named tools a caller can invoke through the
//! gateway, and the manager that dispatches calls to them.

pub mod definition;
pub mod manager;
pub mod traits;

pub use definition::{SchemaBuilder, ToolDefinition};
pub use manager::ToolManager;
pub use traits::{Tool, ToolResult};
