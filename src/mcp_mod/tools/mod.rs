//! MCP tool handlers

pub mod notification;

pub use notification::NotificationTools;
