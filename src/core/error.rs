//! Error types and handling for the MCP server.
//!
//! A single crate-level error aggregating the per-layer errors, used for
//! startup and lifecycle failures. Tool failures never surface here: they are
//! reported to the caller as error-flagged tool results.

use thiserror::Error;

/// A specialized Result type for MCP server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the MCP server.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or missing startup configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Toolset selection failed.
    #[error("Toolset error: {0}")]
    Toolset(#[from] crate::domains::tools::ToolsetError),

    /// The API client could not be built.
    #[error("Client error: {0}")]
    Client(#[from] crate::client::ClientError),

    /// The transport failed to start or stopped abnormally.
    #[error("Transport error: {0}")]
    Transport(#[from] super::transport::TransportError),

    /// I/O errors, e.g. opening the log file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::ToolsetError;

    #[test]
    fn test_from_toolset_error() {
        let err: Error = ToolsetError::unknown("nope").into();
        assert_eq!(err.to_string(), "Toolset error: unknown toolset: nope");
    }

    #[test]
    fn test_config_error() {
        assert_eq!(
            Error::config("token missing").to_string(),
            "Configuration error: token missing"
        );
    }
}
