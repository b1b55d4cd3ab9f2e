//! mac-notify-mcp - macOS notifications over the Model Context Protocol

pub mod config;
#[path = "mcp_mod/mod.rs"]
pub mod mcp;
pub mod notification;

pub use config::{Config, ErrorPolicy};
pub use mcp::{McpServer, NotificationTools, ToolError};
pub use notification::{
    EventHub, NativeNotifier, NormalizedOptions, NotificationDriver, NotificationOutcome,
    NotificationRequest, NotifierEvent, SimpleNotificationRequest, Sound, TerminalNotifier,
};
