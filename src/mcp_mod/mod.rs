//! MCP Server - Model Context Protocol implementation

pub mod registry;
pub mod server;
pub mod tools;
pub mod types;

pub use registry::{tool_descriptors, MACOS_SOUNDS};
pub use server::McpServer;
pub use tools::NotificationTools;
pub use types::{McpError, McpRequest, McpResponse, McpTool, ToolError};
