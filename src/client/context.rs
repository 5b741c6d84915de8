//! Per-invocation context and client injection.
//!
//! Every tool call gets a [`CallContext`]: the cancellation token of the MCP
//! request, an optional deadline, and the request's extension map. The server
//! middleware inserts the shared [`N9eClient`] into that map before dispatch;
//! handlers look it up with [`client_from_context`] and must treat absence as
//! an error.

use std::sync::Arc;
use std::time::Duration;

use rmcp::RoleServer;
use rmcp::model::Extensions;
use rmcp::service::RequestContext;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::{ClientError, N9eClient};

/// Looks up the API client for an invocation.
///
/// Passed into every tool constructor so handlers never reach for a global.
pub type GetClientFn = Arc<dyn Fn(&CallContext) -> Option<Arc<N9eClient>> + Send + Sync>;

/// Default lookup: read the client from the context's extensions.
pub fn client_from_context(ctx: &CallContext) -> Option<Arc<N9eClient>> {
    ctx.extensions.get::<Arc<N9eClient>>().cloned()
}

/// The default [`GetClientFn`].
pub fn default_get_client() -> GetClientFn {
    Arc::new(client_from_context)
}

/// Invocation deadline, carried in the request's extension map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline(pub Instant);

/// Request-scoped state handed to tool handlers and the API client.
#[derive(Clone, Default)]
pub struct CallContext {
    ct: CancellationToken,
    deadline: Option<Instant>,
    extensions: Extensions,
}

impl std::fmt::Debug for CallContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallContext")
            .field("cancelled", &self.ct.is_cancelled())
            .field("deadline", &self.deadline)
            .finish_non_exhaustive()
    }
}

impl CallContext {
    /// Empty context: never canceled, no deadline, no client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Context for an MCP request, sharing its token and extensions.
    ///
    /// Picks up a [`Deadline`] if the server middleware set one.
    pub fn from_request(request: &RequestContext<RoleServer>) -> Self {
        Self {
            ct: request.ct.clone(),
            deadline: request.extensions.get::<Deadline>().map(|d| d.0),
            extensions: request.extensions.clone(),
        }
    }

    /// Attach a cancellation token.
    pub fn with_cancellation(mut self, ct: CancellationToken) -> Self {
        self.ct = ct;
        self
    }

    /// Expire the context `timeout` from now.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    /// Expire the context at `deadline`.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Insert the API client into the extension map.
    pub fn with_client(mut self, client: Arc<N9eClient>) -> Self {
        self.extensions.insert(client);
        self
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.ct
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    /// Why this context can no longer be used, if it can't.
    ///
    /// Cancellation takes precedence over the deadline.
    pub fn interruption(&self) -> Option<ClientError> {
        if self.ct.is_cancelled() {
            return Some(ClientError::Canceled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(ClientError::DeadlineExceeded),
            _ => None,
        }
    }

    /// Resolves once the context is canceled or its deadline passes.
    pub async fn interrupted(&self) -> ClientError {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    _ = self.ct.cancelled() => ClientError::Canceled,
                    _ = tokio::time::sleep_until(deadline) => ClientError::DeadlineExceeded,
                }
            }
            None => {
                self.ct.cancelled().await;
                ClientError::Canceled
            }
        }
    }

    /// Sleep for `delay`, waking early if the context is interrupted.
    pub async fn sleep(&self, delay: Duration) {
        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = self.interrupted() => {}
        }
    }
}
