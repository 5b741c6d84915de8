//! Nightingale MCP Server Library
//!
//! Exposes the Nightingale (n9e) monitoring API to MCP clients as a set of
//! tools, grouped into toolsets an operator can enable or disable.
//!
//! # Architecture
//!
//! - **client**: HTTP client for the Nightingale API (retries, response
//!   envelope decoding, typed models, per-invocation context)
//! - **core**: Configuration, logging, error handling, the MCP server and its
//!   transport
//! - **domains**: Business logic organized by bounded contexts
//!   - **tools**: toolsets, validators and tool definitions
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use n9e_mcp_server::client::{N9eClient, default_get_client, default_user_agent};
//! use n9e_mcp_server::core::{Config, McpServer};
//! use n9e_mcp_server::domains::tools::default_toolset_group;
//!
//! fn build() -> anyhow::Result<McpServer> {
//!     let config = Config::default();
//!     let client = N9eClient::new("token", &config.api.base_url, &default_user_agent())?;
//!
//!     let mut group = default_toolset_group(default_get_client(), false);
//!     group.enable_toolsets(&["all"])?;
//!
//!     Ok(McpServer::new(&config, Arc::new(client), &group))
//! }
//! ```

pub mod client;
pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
