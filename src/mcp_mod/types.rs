//! MCP 类型定义
//!
//! 包含 JSON-RPC 2.0 协议信封，以及工具处理函数返回的错误类型。

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 本服务使用的 JSON-RPC 错误码
pub mod error_code {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
}

/// MCP 请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpRequest {
    pub jsonrpc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl McpRequest {
    pub fn new(id: impl Into<Value>, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id: Some(id.into()),
            method: method.into(),
            params,
        }
    }

    /// JSON-RPC 通知没有 id，不需要响应
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// MCP 响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpResponse {
    pub jsonrpc: String,
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<McpError>,
}

/// MCP 错误
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpError {
    pub code: i32,
    pub message: String,
}

/// MCP 工具定义
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McpTool {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// 协议边界上的错误
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("{0}")]
    InvalidParams(String),
    #[error("Unknown tool: {0}")]
    MethodNotFound(String),
    #[error("{0}")]
    Internal(String),
}

impl ToolError {
    pub fn code(&self) -> i32 {
        match self {
            ToolError::InvalidParams(_) => error_code::INVALID_PARAMS,
            ToolError::MethodNotFound(_) => error_code::METHOD_NOT_FOUND,
            ToolError::Internal(_) => error_code::INTERNAL_ERROR,
        }
    }
}

impl McpResponse {
    /// 创建成功响应
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// 创建错误响应
    pub fn error(id: Option<Value>, code: i32, message: String) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(McpError { code, message }),
        }
    }

    /// 创建方法未找到错误
    pub fn method_not_found(id: Option<Value>, method: &str) -> Self {
        Self::error(id, error_code::METHOD_NOT_FOUND, format!("Method not found: {}", method))
    }

    pub fn parse_error(message: String) -> Self {
        Self::error(None, error_code::PARSE_ERROR, message)
    }

    pub fn from_tool_error(id: Option<Value>, err: &ToolError) -> Self {
        Self::error(id, err.code(), err.to_string())
    }
}

/// 工具调用结果：`{content: [{type: "text", text}]}`
pub fn text_content(text: impl Into<String>) -> Value {
    serde_json::json!({
        "content": [{
            "type": "text",
            "text": text.into()
        }]
    })
}
