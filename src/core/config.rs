//! Configuration management for the MCP server.
//!
//! The command line is the single source: every flag is also bound to an
//! `N9E_*` environment variable, and `main` loads `.env` before parsing. The
//! parsed [`Cli`] is turned into a validated [`Config`] once at startup.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use super::error::{Error, Result};
use super::logging::{DEFAULT_LOG_LEVEL, LOG_LEVEL_ENV};
use super::transport::TransportConfig;
use crate::client::DEFAULT_BASE_URL;
use crate::domains::tools::DEFAULT_TOOLSETS;

/// Command line interface.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "n9e-mcp-server",
    version,
    about = "MCP server exposing the Nightingale monitoring API as tools"
)]
pub struct Cli {
    /// Nightingale API token
    #[arg(long, env = "N9E_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Nightingale API base URL
    #[arg(long, env = "N9E_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    pub base_url: String,

    /// Comma-separated toolsets to enable ("all" for every toolset)
    #[arg(long, env = "N9E_TOOLSETS", value_delimiter = ',', global = true)]
    pub toolsets: Vec<String>,

    /// Hide tools that modify data
    #[arg(long, env = "N9E_READ_ONLY", global = true)]
    pub read_only: bool,

    /// Append logs to this file instead of stderr
    #[arg(long, env = "N9E_LOG_FILE", global = true)]
    pub log_file: Option<PathBuf>,

    /// Per-invocation time limit in seconds
    #[arg(long, env = "N9E_TOOL_TIMEOUT", global = true)]
    pub tool_timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Serve MCP over stdin/stdout (default)
    Stdio,
    /// Print version information
    Version,
}

impl Cli {
    /// The subcommand to run, `stdio` when none was given.
    pub fn command(&self) -> Command {
        self.command.unwrap_or(Command::Stdio)
    }
}

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// API credentials.
    pub credentials: CredentialsConfig,

    /// Nightingale API and toolset selection.
    pub api: ApiConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Log file, appended to. `None` logs to stderr.
    pub file: Option<PathBuf>,
}

/// API credentials.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    #[serde(skip_serializing, default)]
    pub token: String,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,

    /// Toolsets to enable, as given by the operator.
    pub toolsets: Vec<String>,

    /// Expose read tools only.
    pub read_only: bool,

    /// Per-invocation time limit in seconds.
    pub tool_timeout_secs: Option<u64>,
}

impl ApiConfig {
    pub fn tool_timeout(&self) -> Option<Duration> {
        self.tool_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "n9e-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: DEFAULT_LOG_LEVEL.to_string(),
                file: None,
            },
            transport: TransportConfig::default(),
            credentials: CredentialsConfig::default(),
            api: ApiConfig {
                base_url: DEFAULT_BASE_URL.to_string(),
                toolsets: DEFAULT_TOOLSETS.iter().map(|s| s.to_string()).collect(),
                read_only: false,
                tool_timeout_secs: None,
            },
        }
    }
}

impl Config {
    /// Build and validate the configuration from the parsed command line.
    ///
    /// The log level comes from `N9E_MCP_LOG_LEVEL`.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut config = Self::default();

        config.credentials.token = cli
            .token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                Error::config(
                    "N9E_TOKEN is required (set --token flag or N9E_TOKEN environment variable)",
                )
            })?
            .to_string();

        let base_url = cli.base_url.trim();
        if !base_url.is_empty() {
            config.api.base_url = base_url.to_string();
        }

        let toolsets: Vec<String> = cli
            .toolsets
            .iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        if !toolsets.is_empty() {
            config.api.toolsets = toolsets;
        }

        config.api.read_only = cli.read_only;

        match cli.tool_timeout {
            Some(0) => return Err(Error::config("--tool-timeout must be at least 1 second")),
            timeout => config.api.tool_timeout_secs = timeout,
        }

        if let Ok(level) = std::env::var(LOG_LEVEL_ENV) {
            if !level.trim().is_empty() {
                config.logging.level = level.trim().to_string();
            }
        }
        config.logging.file = cli.log_file.clone();

        config.transport = match cli.command() {
            Command::Stdio | Command::Version => TransportConfig::stdio(),
        };

        Ok(config)
    }
}
