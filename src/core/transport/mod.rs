//! Transport layer for the MCP server.
//!
//! Only **STDIO** (feature `stdio`, on by default) is provided: the server is
//! launched as a child process by the MCP host and speaks over stdin/stdout.

mod config;
mod error;
mod service;

#[cfg(feature = "stdio")]
pub mod stdio;

pub use config::TransportConfig;
pub use error::{TransportError, TransportResult};
pub use service::TransportService;
