//! Notification tool handlers
//!
//! Routes `tools/call` to send_notification / send_simple_notification.
//! Routing problems (no arguments, unknown tool, arguments the schema rejects)
//! are protocol errors. Delivery failures follow the configured [`ErrorPolicy`].

use serde_json::Value;
use tracing::{info, warn};

use crate::config::ErrorPolicy;
use crate::mcp::registry::{SEND_NOTIFICATION, SEND_SIMPLE_NOTIFICATION};
use crate::mcp::types::{text_content, ToolError};
use crate::notification::{
    format_outcome, normalize, normalize_simple, NormalizedOptions, NotificationDriver,
    NotificationOutcome, NotificationRequest, SimpleNotificationRequest,
};

/// Tool dispatcher bound to one driver
pub struct NotificationTools {
    driver: NotificationDriver,
    error_policy: ErrorPolicy,
}

impl NotificationTools {
    pub fn new(driver: NotificationDriver, error_policy: ErrorPolicy) -> Self {
        Self {
            driver,
            error_policy,
        }
    }

    pub fn driver(&self) -> &NotificationDriver {
        &self.driver
    }

    /// Route a tool call. Missing arguments are rejected before the name is looked at.
    pub async fn call(&self, name: &str, arguments: Option<Value>) -> Result<Value, ToolError> {
        let arguments = arguments
            .filter(|a| !a.is_null())
            .ok_or_else(|| ToolError::InvalidParams("No arguments provided".to_string()))?;

        match name {
            SEND_NOTIFICATION => self.handle_send_notification(&arguments).await,
            SEND_SIMPLE_NOTIFICATION => self.handle_send_simple_notification(&arguments).await,
            _ => {
                warn!(tool = name, "Unknown tool");
                Err(ToolError::MethodNotFound(name.to_string()))
            }
        }
    }

    /// Handle send_notification
    pub async fn handle_send_notification(&self, arguments: &Value) -> Result<Value, ToolError> {
        let request = NotificationRequest::from_arguments(arguments).map_err(invalid_params)?;
        let cwd = std::env::current_dir()
            .map_err(|e| ToolError::Internal(format!("Cannot read working directory: {}", e)))?;

        let options = normalize(&request, &cwd);
        self.run(options).await
    }

    /// Handle send_simple_notification
    pub async fn handle_send_simple_notification(
        &self,
        arguments: &Value,
    ) -> Result<Value, ToolError> {
        let request = SimpleNotificationRequest::from_arguments(arguments).map_err(invalid_params)?;
        self.run(normalize_simple(&request)).await
    }

    async fn run(&self, options: NormalizedOptions) -> Result<Value, ToolError> {
        let outcome = self.driver.deliver(&options).await;
        self.respond(options.title(), outcome)
    }

    fn respond(&self, title: &str, outcome: NotificationOutcome) -> Result<Value, ToolError> {
        match (&outcome, self.error_policy) {
            (NotificationOutcome::Failed(reason), ErrorPolicy::Protocol) => Err(ToolError::Internal(
                format!("Failed to send notification: {}", reason),
            )),
            _ => {
                info!(title, outcome = outcome.kind(), "Tool call finished");
                Ok(text_content(format_outcome(title, &outcome)))
            }
        }
    }
}

fn invalid_params(err: anyhow::Error) -> ToolError {
    ToolError::InvalidParams(format!("{:#}", err))
}
