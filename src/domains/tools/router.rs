//! Tool Router - exposes the enabled toolsets on an rmcp `ToolRouter`.
//!
//! Each registered tool becomes a dynamic route. The route builds a
//! [`CallContext`] from the MCP request (cancellation token, deadline and the
//! extension map the server middleware filled in) and hands it to the tool's
//! handler.

use futures::FutureExt;
use rmcp::handler::server::tool::{ToolCallContext, ToolRoute, ToolRouter};
use rmcp::model::Tool;

use crate::client::CallContext;

use super::handlers::{ToolHandler, ToolRequest, ToolSink};
use super::toolset::ToolsetGroup;

impl<S> ToolSink for ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    fn add_tool(&mut self, tool: Tool, handler: ToolHandler) {
        self.add_route(ToolRoute::new_dyn(tool, move |ctx: ToolCallContext<'_, S>| {
            let call_ctx = CallContext::from_request(&ctx.request_context);
            let request = ToolRequest::new(ctx.name.to_string(), ctx.arguments.clone());
            let handler = handler.clone();
            async move { handler(call_ctx, request).await }.boxed()
        }));
    }
}

/// Build the tool router from the enabled toolsets of `group`.
pub fn build_tool_router<S>(group: &ToolsetGroup) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    let mut router = ToolRouter::new();
    group.register_all(&mut router);
    router
}
