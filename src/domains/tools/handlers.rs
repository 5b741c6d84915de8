//! Tool handler adapter.
//!
//! Tool logic is written against a typed input struct. [`make_tool_handler`]
//! wraps it into the untyped [`ToolHandler`] shape the registry stores:
//! arguments are decoded here, and a payload that does not fit the input type
//! becomes an error-flagged result instead of a protocol fault.

use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use rmcp::ErrorData as McpError;
use rmcp::model::{CallToolResult, Content, JsonObject, Tool};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::client::CallContext;

/// The invocation as seen by a handler.
#[derive(Debug, Clone, Default)]
pub struct ToolRequest {
    pub name: String,
    pub arguments: Option<JsonObject>,
}

impl ToolRequest {
    pub fn new(name: impl Into<String>, arguments: Option<JsonObject>) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

/// Untyped handler stored with each tool.
///
/// `Err` is reserved for invocation-level faults; ordinary failures are
/// `Ok` results with the error flag set.
pub type ToolHandler = Arc<
    dyn Fn(CallContext, ToolRequest) -> BoxFuture<'static, Result<CallToolResult, McpError>>
        + Send
        + Sync,
>;

/// Destination for exposed tools.
///
/// Implemented by the rmcp router at runtime and by recorders in tests.
pub trait ToolSink {
    fn add_tool(&mut self, tool: Tool, handler: ToolHandler);
}

/// Wrap a typed handler into a [`ToolHandler`].
///
/// Absent arguments decode to `T::default()`.
pub fn make_tool_handler<T, F, Fut>(handler: F) -> ToolHandler
where
    T: DeserializeOwned + Default + Send + 'static,
    F: Fn(CallContext, ToolRequest, T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<CallToolResult, McpError>> + Send + 'static,
{
    let handler = Arc::new(handler);
    Arc::new(move |ctx: CallContext, request: ToolRequest| {
        let handler = handler.clone();
        async move {
            let input = match decode_input::<T>(request.arguments.as_ref()) {
                Ok(input) => input,
                Err(e) => {
                    return Ok(error_result(format!("failed to parse input: {}", e)));
                }
            };
            handler(ctx, request, input).await
        }
        .boxed()
    })
}

fn decode_input<T>(arguments: Option<&JsonObject>) -> Result<T, serde_json::Error>
where
    T: DeserializeOwned + Default,
{
    match arguments {
        Some(args) => serde_json::from_value(serde_json::Value::Object(args.clone())),
        None => Ok(T::default()),
    }
}

// ============================================================================
// Result helpers
// ============================================================================

/// Error-flagged text result.
pub fn error_result(message: impl Into<String>) -> CallToolResult {
    let message = message.into();
    warn!("{}", message);
    CallToolResult::error(vec![Content::text(message)])
}

/// Plain text result.
pub fn text_result(content: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(content.into())])
}

/// Pretty-printed JSON result.
pub fn json_result<T: Serialize + ?Sized>(value: &T) -> CallToolResult {
    match serde_json::to_string_pretty(value) {
        Ok(text) => text_result(text),
        Err(e) => error_result(format!("failed to marshal result: {}", e)),
    }
}
