//! Error types for the MCP crate.

use thiserror::Error;

/// Errors that can occur in the MCP server.
///
/// Catalog failures are not represented here: they are reported to the
/// caller as tool results with `isError: true`.
#[derive(Debug, Error)]
pub enum McpError {
    /// Failed to start the server.
    #[error("failed to start MCP server: {0}")]
    StartupFailed(String),

    /// Tool not found.
    #[error("tool not found: {name}")]
    ToolNotFound { name: String },

    /// Invalid arguments for tool.
    #[error("invalid arguments for tool {tool}: {reason}")]
    InvalidArguments { tool: String, reason: String },

    /// Serialization error.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl McpError {
    /// JSON-RPC error code for errors surfaced as protocol errors.
    pub fn code(&self) -> i32 {
        match self {
            McpError::ToolNotFound { .. } | McpError::InvalidArguments { .. } => -32602,
            _ => -32603,
        }
    }
}
