//! `relmap serve`: run the MCP server.

use super::GlobalArgs;
use anyhow::{Context, Result};
use clap::Args;
use relmap_core::Transport;
use relmap_mcp::{McpServer, ToolExecutor};
use std::sync::Arc;
use tracing::info;

/// Arguments for `relmap serve`.
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Transport type (stdio or http). Overrides the config file.
    #[arg(long)]
    pub transport: Option<Transport>,

    /// HTTP bind host (only for http transport).
    #[arg(long)]
    pub host: Option<String>,

    /// HTTP port (only for http transport).
    #[arg(long)]
    pub port: Option<u16>,
}

pub async fn execute(global: &GlobalArgs, args: ServeArgs) -> Result<()> {
    let mut config = super::load_config(global)?;

    if let Some(transport) = args.transport {
        config.mcp.transport = transport;
    }
    if let Some(host) = args.host {
        config.mcp.host = host;
    }
    if let Some(port) = args.port {
        config.mcp.port = port;
    }

    let catalog = super::connect(&config).await?;
    let executor = ToolExecutor::new(Arc::new(catalog), config.catalog.default_schema.clone());
    let server = McpServer::new(config.mcp.clone(), executor);

    info!(
        transport = %config.mcp.transport,
        default_schema = %config.catalog.default_schema,
        tools = server.tools().len(),
        "Starting MCP server"
    );
    if config.mcp.transport == Transport::Http {
        info!(address = %config.mcp.bind_address(), "HTTP endpoint: POST /mcp");
    }

    server.run().await.context("MCP server failed")
}
