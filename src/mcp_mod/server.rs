//! MCP server (stdio)
//!
//! Newline-delimited JSON-RPC. Requests are handled one at a time, so at
//! most one notification wait is in flight.

use std::sync::Arc;

use anyhow::Result;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use super::registry::tool_descriptors;
use super::tools::NotificationTools;
use super::types::{error_code, McpRequest, McpResponse, ToolError};
use crate::config::{Config, ErrorPolicy};
use crate::notification::{NativeNotifier, NotificationDriver, TerminalNotifier};

pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "Notifications";

/// MCP Server
pub struct McpServer {
    tools: NotificationTools,
}

impl McpServer {
    /// Server backed by terminal-notifier, configured from `config`
    pub fn new(config: &Config) -> Self {
        let notifier = match TerminalNotifier::locate(config.terminal_notifier_path.as_deref()) {
            Ok(notifier) => {
                info!(program = %notifier.program().display(), "Using terminal-notifier");
                notifier
            }
            Err(e) => {
                // Keep serving; each call will report the missing binary.
                warn!(error = %e, "terminal-notifier not found");
                TerminalNotifier::new(TerminalNotifier::BINARY)
            }
        };
        let notifier = notifier.with_sender(config.sender.clone());
        Self::with_notifier(Arc::new(notifier), config.error_policy)
    }

    /// Server backed by any notifier
    pub fn with_notifier(notifier: Arc<dyn NativeNotifier>, error_policy: ErrorPolicy) -> Self {
        Self {
            tools: NotificationTools::new(NotificationDriver::new(notifier), error_policy),
        }
    }

    pub fn tools(&self) -> &NotificationTools {
        &self.tools
    }

    /// Run on stdin/stdout until EOF
    pub async fn run(&self) -> Result<()> {
        info!("Notifications MCP server running on stdio");
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }

    /// Serve newline-delimited JSON-RPC from `reader`, writing responses to `writer`
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut line = String::new();

        loop {
            line.clear();
            let bytes_read = reader.read_line(&mut line).await?;

            if bytes_read == 0 {
                break; // EOF
            }

            let Some(response) = self.handle_line(line.trim()).await else {
                continue;
            };

            let response_json = serde_json::to_string(&response)?;
            writer.write_all(response_json.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }

        info!("stdin closed, shutting down");
        Ok(())
    }

    /// Handle one raw line. Returns `None` when nothing should be written back.
    pub async fn handle_line(&self, line: &str) -> Option<McpResponse> {
        if line.is_empty() {
            return None;
        }

        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Failed to parse request");
                return Some(McpResponse::parse_error(format!("Parse error: {}", e)));
            }
        };

        let id = value.get("id").cloned();
        let request: McpRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "Invalid request");
                return Some(McpResponse::error(
                    id,
                    error_code::INVALID_REQUEST,
                    format!("Invalid request: {}", e),
                ));
            }
        };

        if request.is_notification() {
            debug!(method = %request.method, "Received notification");
            return None;
        }

        Some(self.handle_request(request).await)
    }

    /// Handle an MCP request
    pub async fn handle_request(&self, request: McpRequest) -> McpResponse {
        if request.jsonrpc != "2.0" {
            return McpResponse::error(
                request.id,
                error_code::INVALID_REQUEST,
                format!("Unsupported jsonrpc version: {}", request.jsonrpc),
            );
        }

        debug!(method = %request.method, "Handling request");
        let result = match request.method.as_str() {
            "initialize" => Ok(self.handle_initialize()),
            "ping" => Ok(serde_json::json!({})),
            "tools/list" => Ok(self.handle_tools_list()),
            "tools/call" => self.handle_tools_call(request.params).await,
            method => return McpResponse::method_not_found(request.id, method),
        };

        match result {
            Ok(value) => McpResponse::success(request.id, value),
            Err(e) => {
                warn!(code = e.code(), error = %e, "Request failed");
                McpResponse::from_tool_error(request.id, &e)
            }
        }
    }

    /// Handle initialize
    fn handle_initialize(&self) -> Value {
        serde_json::json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": {}
            },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION")
            }
        })
    }

    /// Handle tools/list
    fn handle_tools_list(&self) -> Value {
        serde_json::json!({
            "tools": tool_descriptors()
        })
    }

    /// Handle tools/call
    async fn handle_tools_call(&self, params: Option<Value>) -> Result<Value, ToolError> {
        let params = params.ok_or_else(|| ToolError::InvalidParams("Missing params".to_string()))?;
        let name = params["name"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidParams("Missing tool name".to_string()))?;

        self.tools.call(name, params.get("arguments").cloned()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::{DispatchCallback, EventHub, NormalizedOptions, NotificationId};

    struct AlwaysSent;

    impl NativeNotifier for AlwaysSent {
        fn name(&self) -> &str {
            "always-sent"
        }

        fn notify(
            &self,
            _id: NotificationId,
            _options: &NormalizedOptions,
            _events: Arc<EventHub>,
            callback: DispatchCallback,
        ) -> Result<()> {
            callback(Ok(None));
            Ok(())
        }
    }

    fn server() -> McpServer {
        McpServer::with_notifier(Arc::new(AlwaysSent), ErrorPolicy::Text)
    }

    #[tokio::test]
    async fn test_initialize() {
        let response = server()
            .handle_request(McpRequest::new(1, "initialize", Some(serde_json::json!({}))))
            .await;

        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], SERVER_NAME);
        assert!(result["capabilities"]["tools"].is_object());
    }

    #[tokio::test]
    async fn test_ping() {
        let response = server().handle_request(McpRequest::new(2, "ping", None)).await;
        assert_eq!(response.result, Some(serde_json::json!({})));
    }

    #[tokio::test]
    async fn test_invalid_method_returns_error() {
        let response = server()
            .handle_request(McpRequest::new(1, "invalid/method", Some(serde_json::json!({}))))
            .await;
        assert_eq!(response.error.unwrap().code, error_code::METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_tools_call_without_params() {
        let response = server().handle_request(McpRequest::new(1, "tools/call", None)).await;
        assert_eq!(response.error.unwrap().code, error_code::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_handle_line_parse_error_and_notifications() {
        let server = server();

        let response = server.handle_line("{not json").await.unwrap();
        assert_eq!(response.error.unwrap().code, error_code::PARSE_ERROR);
        assert!(response.id.is_none());

        let response = server.handle_line(r#"{"id": 4, "jsonrpc": "2.0"}"#).await.unwrap();
        assert_eq!(response.error.unwrap().code, error_code::INVALID_REQUEST);
        assert_eq!(response.id, Some(serde_json::json!(4)));

        assert!(server
            .handle_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await
            .is_none());
        assert!(server.handle_line("").await.is_none());
    }

    #[tokio::test]
    async fn test_wrong_jsonrpc_version() {
        let mut request = McpRequest::new(1, "ping", None);
        request.jsonrpc = "1.0".to_string();
        let response = server().handle_request(request).await;
        assert_eq!(response.error.unwrap().code, error_code::INVALID_REQUEST);
    }

    #[tokio::test]
    async fn test_serve_writes_one_line_per_request() {
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
            "\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"send_simple_notification","arguments":{"title":"Ping","message":"pong"}}}"#,
            "\n"
        );
        let mut output = Vec::new();

        server().serve(input.as_bytes(), &mut output).await.unwrap();

        let output = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        let second: Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["id"], 2);
        assert_eq!(
            second["result"]["content"][0]["text"],
            r#"Notification sent successfully: "Ping""#
        );
    }
}
