//! Native notifier backends
//!
//! `TerminalNotifier` shells out to the `terminal-notifier` binary, which
//! posts to macOS Notification Center and, with `-json`, prints how the user
//! interacted with the notification once it is done.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::events::{EventHub, NotificationId, NotifierEvent};
use super::options::{NormalizedOptions, SoundSetting};

/// Receives the dispatch result: the native response string, or the error.
pub type DispatchCallback = Box<dyn FnOnce(Result<Option<String>>) + Send + 'static>;

/// A platform notification subsystem
pub trait NativeNotifier: Send + Sync {
    /// Backend name (for logs)
    fn name(&self) -> &str;

    /// Post one notification.
    ///
    /// Returns `Err` when the notification could not be dispatched at all.
    /// Otherwise `callback` is called exactly once when the native side
    /// finishes, and at most one interaction event for `id` is emitted on `events`.
    fn notify(
        &self,
        id: NotificationId,
        options: &NormalizedOptions,
        events: Arc<EventHub>,
        callback: DispatchCallback,
    ) -> Result<()>;
}

/// Backend driving the `terminal-notifier` CLI
#[derive(Debug, Clone)]
pub struct TerminalNotifier {
    program: PathBuf,
    sender: Option<String>,
}

impl TerminalNotifier {
    pub const BINARY: &'static str = "terminal-notifier";

    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            sender: None,
        }
    }

    /// Use `configured` when given, otherwise look the binary up on `PATH`.
    pub fn locate(configured: Option<&str>) -> Result<Self> {
        let program = match configured {
            Some(path) => PathBuf::from(path),
            None => which::which(Self::BINARY).with_context(|| {
                format!("{} not found on PATH (brew install terminal-notifier)", Self::BINARY)
            })?,
        };
        Ok(Self::new(program))
    }

    /// Post notifications on behalf of another application bundle id
    pub fn with_sender(mut self, sender: Option<String>) -> Self {
        self.sender = sender;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Command-line flags for one notification
    pub fn build_args(&self, options: &NormalizedOptions) -> Vec<String> {
        let mut args = vec![
            "-title".to_string(),
            options.title().to_string(),
            "-message".to_string(),
            options.message().to_string(),
        ];

        if let Some(subtitle) = options.subtitle() {
            args.extend(["-subtitle".to_string(), subtitle.to_string()]);
        }
        match options.sound() {
            SoundSetting::SystemDefault => args.extend(["-sound".to_string(), "default".to_string()]),
            SoundSetting::Named(name) => args.extend(["-sound".to_string(), name.clone()]),
            SoundSetting::Silent => {}
        }
        if let Some(icon) = options.icon() {
            args.extend(["-appIcon".to_string(), icon.display().to_string()]);
        }
        if let Some(image) = options.content_image() {
            args.extend(["-contentImage".to_string(), image.display().to_string()]);
        }
        args.extend(["-timeout".to_string(), options.timeout_secs().to_string()]);
        if let Some(label) = options.close_label() {
            args.extend(["-closeLabel".to_string(), label.to_string()]);
        }
        if !options.actions().is_empty() {
            args.extend(["-actions".to_string(), options.actions().join(",")]);
        }
        if options.reply() {
            args.push("-reply".to_string());
        }
        if let Some(sender) = &self.sender {
            args.extend(["-sender".to_string(), sender.clone()]);
        }
        args.push("-json".to_string());
        args
    }
}

impl NativeNotifier for TerminalNotifier {
    fn name(&self) -> &str {
        Self::BINARY
    }

    fn notify(
        &self,
        id: NotificationId,
        options: &NormalizedOptions,
        events: Arc<EventHub>,
        callback: DispatchCallback,
    ) -> Result<()> {
        let runtime = tokio::runtime::Handle::try_current()
            .context("notifications must be sent from within a tokio runtime")?;

        let args = self.build_args(options);
        debug!(program = %self.program.display(), ?args, "Spawning notifier");

        let child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to launch {}", self.program.display()))?;

        runtime.spawn(async move {
            let output = match child.wait_with_output().await {
                Ok(output) => output,
                Err(e) => {
                    callback(Err(anyhow::Error::new(e).context("notifier process failed")));
                    return;
                }
            };

            let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
                warn!(id, status = %output.status, %stderr, "Notifier exited with error");
                let reason = if stderr.is_empty() {
                    format!("terminal-notifier exited with {}", output.status)
                } else {
                    stderr
                };
                callback(Err(anyhow::anyhow!(reason)));
                return;
            }

            let (response, event) = parse_output(&stdout);
            info!(id, response = ?response, "Notifier finished");
            callback(Ok(response));
            if let Some(event) = event {
                events.emit(id, event);
            }
        });

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActivationReport {
    activation_type: String,
    #[serde(default)]
    activation_value: Option<String>,
}

/// Split notifier stdout into the response string and the interaction event.
///
/// JSON reports yield their `activationType` as the response; anything else
/// is passed through verbatim with no event.
pub fn parse_output(stdout: &str) -> (Option<String>, Option<NotifierEvent>) {
    if stdout.is_empty() {
        return (None, None);
    }

    let report = match serde_json::from_str::<ActivationReport>(stdout) {
        Ok(report) => report,
        Err(_) => return (Some(stdout.to_string()), None),
    };

    let value = report.activation_value.filter(|v| !v.is_empty());
    let event = match report.activation_type.as_str() {
        "contentsClicked" => Some(NotifierEvent::Click),
        "timeout" => Some(NotifierEvent::Timeout),
        "replied" => Some(NotifierEvent::Replied(value)),
        "actionClicked" | "closed" => Some(NotifierEvent::Activate(value)),
        _ => None,
    };
    (Some(report.activation_type), event)
}
