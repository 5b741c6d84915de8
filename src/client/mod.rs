//! Nightingale API client.
//!
//! - [`http`]: connection pool, request execution, retry loop
//! - [`retry`]: backoff schedule and retry classification
//! - [`envelope`]: `{dat, err}` decoding and the typed verb helpers
//! - [`context`]: per-invocation context carrying cancellation, deadline and
//!   the injected client
//! - [`error`]: [`ClientError`] and the structured [`ApiError`]

use std::collections::BTreeMap;

pub mod context;
pub mod envelope;
pub mod error;
pub mod http;
pub mod retry;
pub mod types;

/// Query parameters, kept sorted so encoded URLs are stable.
pub type QueryParams = BTreeMap<String, String>;

pub use context::{CallContext, Deadline, GetClientFn, client_from_context, default_get_client};
pub use envelope::{Envelope, PageResp, delete, get, post, put};
pub use error::{ApiError, ClientError, ClientResult, RequestSummary};
pub use http::{DEFAULT_BASE_URL, N9eClient, RawResponse};
pub use retry::RetryPolicy;

/// User agent sent with every request.
pub fn default_user_agent() -> String {
    format!("n9e-mcp-server/{}", env!("CARGO_PKG_VERSION"))
}
