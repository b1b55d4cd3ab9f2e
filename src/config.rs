//! Server configuration
//!
//! Read from `~/.config/mac-notify-mcp/config.json`. A missing file means
//! defaults; CLI flags override whatever the file says.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// How delivery failures reach the caller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Successful response whose text explains the failure and how to fix it
    #[default]
    Text,
    /// JSON-RPC InternalError (compatibility mode)
    Protocol,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// terminal-notifier binary; looked up on PATH when unset
    pub terminal_notifier_path: Option<String>,
    /// Bundle id to post as (`-sender`)
    pub sender: Option<String>,
    pub error_policy: ErrorPolicy,
}

impl Config {
    /// `~/.config/mac-notify-mcp/config.json`
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?;
        Ok(home.join(".config").join("mac-notify-mcp").join("config.json"))
    }

    /// Load from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        debug!(path = %path.display(), ?config, "Loaded config");
        Ok(config)
    }
}
