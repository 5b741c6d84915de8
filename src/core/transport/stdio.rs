//! STDIO transport implementation.
//!
//! Standard input/output transport for MCP - the default and recommended mode.

use rmcp::ServiceExt;
use tracing::{info, warn};

use super::{TransportError, TransportResult};
use crate::core::McpServer;

/// STDIO transport handler.
pub struct StdioTransport;

impl StdioTransport {
    /// Run the STDIO transport until the peer disconnects or Ctrl-C.
    pub async fn run(server: McpServer) -> TransportResult<()> {
        info!("Ready - communicating via stdin/stdout");

        let service = server
            .serve(rmcp::transport::stdio())
            .await
            .map_err(|e| TransportError::init(e.to_string()))?;

        let ct = service.cancellation_token();

        tokio::select! {
            quit = service.waiting() => {
                quit.map_err(|e| TransportError::service(e.to_string()))?;
                info!("STDIO transport finished");
            }
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    warn!("Failed to listen for interrupt: {}", e);
                }
                info!("Interrupted, shutting down");
                ct.cancel();
            }
        }

        Ok(())
    }
}
