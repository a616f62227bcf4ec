//! MCP server implementation.
//!
//! Dispatches JSON-RPC requests to the catalog tools over stdio or HTTP.

use crate::error::McpError;
use crate::executor::ToolExecutor;
use crate::http_transport::HttpServer;
use crate::protocol::*;
use crate::tools::ToolRegistry;
use relmap_core::{McpConfig, Transport};
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

/// The MCP server.
#[derive(Clone)]
pub struct McpServer {
    config: McpConfig,
    tools: ToolRegistry,
    executor: ToolExecutor,
}

impl McpServer {
    /// Create a server exposing the catalog tools through `executor`.
    pub fn new(config: McpConfig, executor: ToolExecutor) -> Self {
        let tools = ToolRegistry::catalog(executor.default_schema());
        Self {
            config,
            tools,
            executor,
        }
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Start the MCP server on the configured transport.
    pub async fn run(&self) -> Result<(), McpError> {
        match self.config.transport {
            Transport::Stdio => self.run_stdio().await,
            Transport::Http => self.run_http().await,
        }
    }

    /// Run the server with stdio transport.
    async fn run_stdio(&self) -> Result<(), McpError> {
        tracing::info!(tools = self.tools.len(), "Starting MCP server with stdio transport");

        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.serve_lines(stdin, stdout).await
    }

    /// Serve newline-delimited JSON-RPC from `reader`, writing responses to `writer`.
    ///
    /// Unparsable lines are answered with a parse error and the loop keeps going.
    /// Notifications are handled without a response.
    pub async fn serve_lines<R, W>(&self, reader: R, mut writer: W) -> Result<(), McpError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();

        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let response = match serde_json::from_str::<JsonRpcRequest>(line) {
                Ok(request) if request.is_notification() => {
                    tracing::debug!(method = %request.method, "Notification received");
                    continue;
                }
                Ok(request) => self.handle_request(request).await,
                Err(e) => {
                    tracing::warn!(error = %e, "Unparsable request");
                    JsonRpcResponse::error(None, PARSE_ERROR, format!("Parse error: {}", e))
                }
            };

            let mut response_json = serde_json::to_string(&response)?;
            response_json.push('\n');
            writer.write_all(response_json.as_bytes()).await?;
            writer.flush().await?;
        }

        tracing::info!("Input closed, stopping MCP server");
        Ok(())
    }

    /// Run the server with HTTP transport.
    pub async fn run_http(&self) -> Result<(), McpError> {
        let address = self.config.bind_address();
        tracing::info!(address = %address, "Starting MCP server with HTTP transport");

        let (request_tx, mut request_rx) =
            mpsc::channel::<(JsonRpcRequest, mpsc::Sender<JsonRpcResponse>)>(100);

        let server = self.clone();
        tokio::spawn(async move {
            while let Some((request, response_tx)) = request_rx.recv().await {
                let server = server.clone();
                tokio::spawn(async move {
                    let response = server.handle_request(request).await;
                    let _ = response_tx.send(response).await;
                });
            }
        });

        HttpServer::new(address, request_tx).run().await
    }

    /// Handle a JSON-RPC request.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.clone();

        match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "initialized" | "notifications/initialized" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => self.handle_list_tools(id),
            "tools/call" => self.handle_call_tool(id, request.params).await,
            "shutdown" => self.handle_shutdown(id),
            _ => JsonRpcResponse::error(
                id,
                METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            ),
        }
    }

    fn handle_initialize(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = json!({
            "protocolVersion": PROTOCOL_VERSION,
            "serverInfo": {
                "name": "relmap-mcp",
                "version": env!("CARGO_PKG_VERSION")
            },
            "capabilities": {
                "tools": {
                    "listChanged": false
                }
            }
        });
        JsonRpcResponse::success(id, result)
    }

    fn handle_list_tools(&self, id: Option<Value>) -> JsonRpcResponse {
        let response = ListToolsResponse {
            tools: self.tools.list().into_iter().cloned().collect(),
        };
        match serde_json::to_value(response) {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(e) => JsonRpcResponse::error(id, INTERNAL_ERROR, e.to_string()),
        }
    }

    async fn handle_call_tool(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: CallToolParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(id, INVALID_PARAMS, format!("Invalid params: {}", e))
                }
            },
            None => return JsonRpcResponse::error(id, INVALID_PARAMS, "Missing params"),
        };

        if !self.tools.contains(&params.name) {
            return JsonRpcResponse::error(
                id,
                INVALID_PARAMS,
                format!("Tool not found: {}", params.name),
            );
        }

        let result = match self.executor.execute(&params.name, params.arguments).await {
            Ok(result) => result,
            Err(e) => {
                tracing::debug!(tool = %params.name, error = %e, "Tool call rejected");
                return JsonRpcResponse::error(id, e.code(), e.to_string());
            }
        };

        match serde_json::to_value(result.into_response()) {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => JsonRpcResponse::error(id, INTERNAL_ERROR, e.to_string()),
        }
    }

    fn handle_shutdown(&self, id: Option<Value>) -> JsonRpcResponse {
        tracing::info!("MCP server shutdown requested");
        JsonRpcResponse::success(id, json!(null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relmap_relations::memory::InMemoryCatalog;
    use std::sync::Arc;

    fn server() -> McpServer {
        let catalog = InMemoryCatalog::new().with_table("public", "orders", &[("id", "integer")]);
        McpServer::new(McpConfig::default(), ToolExecutor::new(Arc::new(catalog), "public"))
    }

    #[tokio::test]
    async fn test_initialize() {
        let response = server()
            .handle_request(JsonRpcRequest::new(1, "initialize", None))
            .await;
        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], "relmap-mcp");
        assert!(response.error.is_none());
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let response = server()
            .handle_request(JsonRpcRequest::new(1, "resources/list", None))
            .await;
        assert_eq!(response.error.unwrap().code, METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_call_nonexistent_tool() {
        let request = JsonRpcRequest::new(
            1,
            "tools/call",
            Some(json!({"name": "nonexistent", "arguments": {}})),
        );
        let response = server().handle_request(request).await;
        assert_eq!(response.error.unwrap().code, INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_call_missing_params() {
        let response = server()
            .handle_request(JsonRpcRequest::new(1, "tools/call", None))
            .await;
        assert_eq!(response.error.unwrap().message, "Missing params");
    }
}
