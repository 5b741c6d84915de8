//! Target (monitored host) tools.

use rmcp::model::{CallToolResult, Tool};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::common::{Query, fetch, invalid_input, read_tool};
use crate::client::types::Target;
use crate::client::{CallContext, GetClientFn, PageResp};
use crate::domains::tools::handlers::make_tool_handler;
use crate::domains::tools::toolset::{ServerTool, Toolset};
use crate::domains::tools::validate::validate_pagination;

pub const TOOLSET: &str = "targets";
const TOOLSET_DESCRIPTION: &str = "Target/Host management tools for viewing monitored objects";

pub fn toolset(get_client: &GetClientFn) -> Toolset {
    Toolset::new(TOOLSET, TOOLSET_DESCRIPTION)
        .add_read_tools([ListTargetsTool::server_tool(get_client.clone())])
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ListTargetsParams {
    /// Business group IDs comma-separated
    #[serde(rename = "gids")]
    pub group_ids: String,
    /// Search keyword (matches ident/tags)
    pub query: String,
    /// Page size (default 20)
    pub limit: i64,
    /// Page number (starts from 1)
    #[serde(rename = "p")]
    pub page: i64,
    /// Filter by downtime in seconds (targets not reporting for this duration)
    pub downtime: i64,
    /// Datasource IDs comma-separated
    pub datasource_ids: String,
}

/// Lists monitored targets.
pub struct ListTargetsTool;

impl ListTargetsTool {
    pub const NAME: &'static str = "list_targets";
    pub const TITLE: &'static str = "List Targets";
    pub const DESCRIPTION: &'static str = "List monitored targets/hosts with optional filters";

    #[instrument(skip_all)]
    pub async fn execute(
        get_client: &GetClientFn,
        ctx: &CallContext,
        params: ListTargetsParams,
    ) -> CallToolResult {
        if let Err(e) = validate_pagination(params.limit, params.page) {
            return invalid_input(e);
        }

        debug!(gids = %params.group_ids, query = %params.query, "Listing targets");

        let query = Query::new()
            .text("gids", &params.group_ids)
            .text("query", &params.query)
            .positive("limit", params.limit)
            .positive("p", params.page)
            .positive("downtime", params.downtime)
            .text("datasource_ids", &params.datasource_ids)
            .build();

        fetch::<PageResp<Target>>(get_client, ctx, "/api/n9e/targets", query).await
    }

    pub fn to_tool() -> Tool {
        read_tool::<ListTargetsParams>(Self::NAME, Self::TITLE, Self::DESCRIPTION)
    }

    pub fn server_tool(get_client: GetClientFn) -> ServerTool {
        ServerTool::new(
            Self::to_tool(),
            make_tool_handler(move |ctx, _req, params: ListTargetsParams| {
                let get_client = get_client.clone();
                async move { Ok(Self::execute(&get_client, &ctx, params).await) }
            }),
        )
    }
}
