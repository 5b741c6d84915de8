//! MCP Server implementation and lifecycle management.
//!
//! The handler advertises the tools capability only. Every `tools/call` goes
//! through [`McpServer::inject`] first, which puts the shared API client and
//! the invocation deadline into the request's extension map, and is then
//! dispatched by the [`ToolRouter`] built from the enabled toolsets.

use std::sync::Arc;
use std::time::Duration;

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    handler::server::tool::{ToolCallContext, ToolRouter},
    model::*,
    service::RequestContext,
};
use tokio::time::Instant;
use tracing::{debug, info, instrument};

use super::config::Config;
use crate::client::{Deadline, N9eClient};
use crate::domains::tools::{ToolsetGroup, build_tool_router};

const INSTRUCTIONS: &str = "Tools for the Nightingale (n9e) monitoring platform: \
    alert events and rules, monitored targets, datasources, alert mutes, business groups, \
    notification rules, alert subscriptions, event pipelines, users and user groups.";

/// The main MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    name: String,
    version: String,

    /// Shared by every invocation.
    client: Arc<N9eClient>,

    /// Per-invocation time limit.
    tool_timeout: Option<Duration>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a server exposing the enabled toolsets of `group`.
    pub fn new(config: &Config, client: Arc<N9eClient>, group: &ToolsetGroup) -> Self {
        Self {
            name: config.server.name.clone(),
            version: config.server.version.clone(),
            client,
            tool_timeout: config.api.tool_timeout(),
            tool_router: build_tool_router::<Self>(group),
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Every exposed tool.
    pub fn tools(&self) -> Vec<Tool> {
        self.tool_router.list_all()
    }

    /// Per-invocation middleware: make the client and deadline visible to
    /// the handler.
    pub fn inject(&self, extensions: &mut Extensions) {
        extensions.insert(self.client.clone());
        if let Some(timeout) = self.tool_timeout {
            extensions.insert(Deadline(Instant::now() + timeout));
        }
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.name.clone(),
                version: self.version.clone(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[instrument(skip_all)]
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        debug!("Listing tools");
        Ok(ListToolsResult {
            tools: self.tools(),
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, context), fields(tool = %request.name))]
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        mut context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        info!("Calling tool");
        self.inject(&mut context.extensions);
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{CallContext, client_from_context, default_get_client};
    use crate::domains::tools::default_toolset_group;

    fn server(read_only: bool, toolsets: &[&str], timeout: Option<u64>) -> McpServer {
        let mut config = Config::default();
        config.api.tool_timeout_secs = timeout;

        let mut group = default_toolset_group(default_get_client(), read_only);
        group.enable_toolsets(toolsets).unwrap();

        let client = N9eClient::new("token", "http://127.0.0.1:1", "test-agent").unwrap();
        McpServer::new(&config, Arc::new(client), &group)
    }

    #[test]
    fn test_info_advertises_tools_only() {
        let info = server(false, &["alerts"], None).get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_none());
        assert!(info.capabilities.prompts.is_none());
        assert_eq!(info.server_info.name, "n9e-mcp-server");
        assert!(info.instructions.unwrap().contains("Nightingale"));
    }

    #[test]
    fn test_tools_follow_selection() {
        let tools = server(true, &["mutes", "datasource"], None).tools();
        let mut names: Vec<_> = tools.iter().map(|t| t.name.to_string()).collect();
        names.sort();
        assert_eq!(names, vec!["get_mute", "list_datasources", "list_mutes"]);
    }

    #[tokio::test]
    async fn test_inject_client_and_deadline() {
        let server = server(false, &["all"], Some(5));
        let mut extensions = Extensions::new();
        server.inject(&mut extensions);

        assert!(extensions.get::<Arc<N9eClient>>().is_some());
        let deadline = extensions.get::<Deadline>().unwrap().0;
        assert!(deadline > Instant::now());
        assert!(deadline <= Instant::now() + Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_inject_without_timeout() {
        let server = server(false, &["all"], None);
        let mut extensions = Extensions::new();
        server.inject(&mut extensions);

        assert!(extensions.get::<Deadline>().is_none());
        let ctx = CallContext::new().with_client(
            extensions.get::<Arc<N9eClient>>().cloned().unwrap(),
        );
        assert!(client_from_context(&ctx).is_some());
    }
}
