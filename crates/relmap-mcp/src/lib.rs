//! # relmap-mcp
//!
//! MCP (Model Context Protocol) server exposing read-only catalog tools to
//! AI agents.
//!
//! ```text
//! AI Agent
//!       │
//!       │ MCP protocol (list tools / call tool)
//!       ▼
//! ┌──────────────────┐
//! │ relmap MCP server│
//! │  1. Parse args   │
//! │  2. Read catalog │  ← CatalogBrowser (relmap-adapter-pg)
//! │  3. Find rels    │  ← relmap-relations
//! │  4. Render text  │
//! │     + JSON       │
//! └────────┬─────────┘
//!          │
//!          ▼
//!    Upstream Postgres
//! ```
//!
//! ## Tools
//!
//! | Tool | Arguments |
//! |------|-----------|
//! | `list_schemas` | none |
//! | `list_tables` | `db_schema?`, `name_like?`, `case_sensitive?` |
//! | `describe_table` | `table_name`, `db_schema?` |
//! | `get_foreign_keys` | `table_name`, `db_schema?` |
//! | `find_relationships` | `table_name`, `db_schema?` |
//!
//! `db_schema` falls back to the configured default schema.

pub mod error;
pub mod executor;
pub mod http_transport;
pub mod protocol;
pub mod render;
pub mod server;
pub mod tools;

pub use error::McpError;
pub use executor::{ExecutionResult, ToolExecutor};
pub use protocol::{
    CallToolParams, CallToolResponse, JsonRpcRequest, JsonRpcResponse, ToolAnnotations,
    ToolContent, ToolDefinition,
};
pub use server::McpServer;
pub use tools::ToolRegistry;
