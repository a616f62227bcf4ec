//! HTTP transport for MCP server.
//!
//! JSON-RPC requests are POSTed to `/mcp` and forwarded to the server's
//! request handler over a channel.

use crate::error::McpError;
use crate::protocol::{JsonRpcRequest, JsonRpcResponse, INTERNAL_ERROR};
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tower_http::trace::TraceLayer;

/// A request paired with the channel its response goes back on.
pub type RequestSender = mpsc::Sender<(JsonRpcRequest, mpsc::Sender<JsonRpcResponse>)>;

/// HTTP transport handler state.
pub struct HttpTransportState {
    request_tx: RequestSender,
}

impl HttpTransportState {
    pub fn new(request_tx: RequestSender) -> Self {
        Self { request_tx }
    }
}

/// Create the HTTP router for MCP.
pub fn create_router(state: Arc<HttpTransportState>) -> Router {
    Router::new()
        .route("/mcp", post(handle_mcp_post))
        .route("/health", get(handle_health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Handle POST requests to /mcp (JSON-RPC over HTTP).
async fn handle_mcp_post(
    State(state): State<Arc<HttpTransportState>>,
    Json(request): Json<JsonRpcRequest>,
) -> impl IntoResponse {
    let (response_tx, mut response_rx) = mpsc::channel(1);

    if state.request_tx.send((request, response_tx)).await.is_err() {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(JsonRpcResponse::error(
                None,
                INTERNAL_ERROR,
                "MCP server unavailable",
            )),
        );
    }

    match response_rx.recv().await {
        Some(response) => (StatusCode::OK, Json(response)),
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(JsonRpcResponse::error(
                None,
                INTERNAL_ERROR,
                "No response from MCP server",
            )),
        ),
    }
}

async fn handle_health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "relmap-mcp",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// HTTP server for MCP transport.
pub struct HttpServer {
    address: String,
    state: Arc<HttpTransportState>,
}

impl HttpServer {
    pub fn new(address: impl Into<String>, request_tx: RequestSender) -> Self {
        Self {
            address: address.into(),
            state: Arc::new(HttpTransportState::new(request_tx)),
        }
    }

    /// Run the HTTP server.
    pub async fn run(self) -> Result<(), McpError> {
        let app = create_router(self.state);

        let listener = tokio::net::TcpListener::bind(&self.address)
            .await
            .map_err(|e| {
                McpError::StartupFailed(format!("Failed to bind to {}: {}", self.address, e))
            })?;

        tracing::info!(address = %self.address, "MCP HTTP server listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| McpError::Internal(e.into()))?;

        Ok(())
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Ctrl-C received, stopping MCP HTTP server"),
        Err(e) => {
            tracing::warn!(error = %e, "Cannot listen for Ctrl-C, serving until killed");
            std::future::pending::<()>().await
        }
    }
}
