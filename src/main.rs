//! mac-notify-mcp CLI
//!
//! Runs the MCP server on stdio, or sends a single notification from the shell.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use mac_notify_mcp::mcp::registry::{tool_descriptors, SEND_NOTIFICATION};
use mac_notify_mcp::{Config, ErrorPolicy, McpServer};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "mac-notify-mcp")]
#[command(about = "MCP server for native macOS notifications")]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.config/mac-notify-mcp/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Path to the terminal-notifier binary
    #[arg(long, global = true)]
    notifier_path: Option<String>,
    /// How delivery failures are reported
    #[arg(long, global = true, value_enum)]
    error_policy: Option<ErrorPolicy>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the MCP server on stdin/stdout (default)
    Serve,
    /// Send one notification and print the result
    Send(SendArgs),
    /// Print the tool descriptors as JSON
    Tools,
}

#[derive(Args)]
struct SendArgs {
    /// Notification title
    title: String,
    /// Notification body
    message: Option<String>,
    #[arg(long)]
    subtitle: Option<String>,
    /// Sound name, "default" or "none"
    #[arg(long)]
    sound: Option<String>,
    #[arg(long)]
    icon: Option<String>,
    #[arg(long)]
    content_image: Option<String>,
    /// Wait for the user to interact with the notification
    #[arg(long)]
    wait: bool,
    /// Timeout in seconds
    #[arg(long)]
    timeout: Option<f64>,
    #[arg(long)]
    close_label: Option<String>,
    /// Action button label (at most two)
    #[arg(long = "action")]
    actions: Vec<String>,
    /// Allow replying to the notification
    #[arg(long)]
    reply: bool,
}

impl SendArgs {
    fn to_arguments(&self) -> serde_json::Value {
        let mut arguments = serde_json::json!({
            "title": self.title,
            "wait": self.wait,
            "reply": self.reply,
        });
        let fields = [
            ("message", self.message.clone().map(serde_json::Value::from)),
            ("subtitle", self.subtitle.clone().map(serde_json::Value::from)),
            ("sound", self.sound.clone().map(serde_json::Value::from)),
            ("icon", self.icon.clone().map(serde_json::Value::from)),
            ("contentImage", self.content_image.clone().map(serde_json::Value::from)),
            ("timeout", self.timeout.map(serde_json::Value::from)),
            ("closeLabel", self.close_label.clone().map(serde_json::Value::from)),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                arguments[key] = value;
            }
        }
        if !self.actions.is_empty() {
            arguments["actions"] = serde_json::json!(self.actions);
        }
        arguments
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the protocol, logs go to stderr
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("mac_notify_mcp=info"));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(path) = cli.notifier_path {
        config.terminal_notifier_path = Some(path);
    }
    if let Some(policy) = cli.error_policy {
        config.error_policy = policy;
    }

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let server = McpServer::new(&config);
            server.run().await?;
        }
        Commands::Send(args) => {
            let server = McpServer::new(&config);
            let result = server
                .tools()
                .call(SEND_NOTIFICATION, Some(args.to_arguments()))
                .await?;
            if let Some(text) = result["content"][0]["text"].as_str() {
                println!("{}", text);
            }
        }
        Commands::Tools => {
            println!("{}", serde_json::to_string_pretty(&tool_descriptors())?);
        }
    }

    Ok(())
}
