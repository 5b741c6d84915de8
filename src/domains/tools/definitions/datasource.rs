//! Datasource tools.

use rmcp::model::{CallToolResult, Tool};

use super::common::{NoParams, fetch, read_tool};
use crate::client::types::Datasource;
use crate::client::{CallContext, GetClientFn};
use crate::domains::tools::handlers::make_tool_handler;
use crate::domains::tools::toolset::{ServerTool, Toolset};

pub const TOOLSET: &str = "datasource";
const TOOLSET_DESCRIPTION: &str = "Datasource management tools";

pub fn toolset(get_client: &GetClientFn) -> Toolset {
    Toolset::new(TOOLSET, TOOLSET_DESCRIPTION)
        .add_read_tools([ListDatasourcesTool::server_tool(get_client.clone())])
}

pub struct ListDatasourcesTool;

impl ListDatasourcesTool {
    pub const NAME: &'static str = "list_datasources";
    pub const TITLE: &'static str = "List Datasources";
    pub const DESCRIPTION: &'static str = "List all available datasources";

    pub async fn execute(get_client: &GetClientFn, ctx: &CallContext) -> CallToolResult {
        fetch::<Vec<Datasource>>(get_client, ctx, "/api/n9e/datasource/brief", None).await
    }

    pub fn to_tool() -> Tool {
        read_tool::<NoParams>(Self::NAME, Self::TITLE, Self::DESCRIPTION)
    }

    pub fn server_tool(get_client: GetClientFn) -> ServerTool {
        ServerTool::new(
            Self::to_tool(),
            make_tool_handler(move |ctx, _req, _params: NoParams| {
                let get_client = get_client.clone();
                async move { Ok(Self::execute(&get_client, &ctx).await) }
            }),
        )
    }
}
