//! Business group tools.

use rmcp::model::{CallToolResult, Tool};

use super::common::{NoParams, fetch, read_tool};
use crate::client::types::BusiGroup;
use crate::client::{CallContext, GetClientFn};
use crate::domains::tools::handlers::make_tool_handler;
use crate::domains::tools::toolset::{ServerTool, Toolset};

pub const TOOLSET: &str = "busi_groups";
const TOOLSET_DESCRIPTION: &str = "Business group management tools";

pub fn toolset(get_client: &GetClientFn) -> Toolset {
    Toolset::new(TOOLSET, TOOLSET_DESCRIPTION)
        .add_read_tools([ListBusiGroupsTool::server_tool(get_client.clone())])
}

/// Lists the business groups visible to the token's user.
pub struct ListBusiGroupsTool;

impl ListBusiGroupsTool {
    pub const NAME: &'static str = "list_busi_groups";
    pub const TITLE: &'static str = "List Business Groups";
    pub const DESCRIPTION: &'static str =
        "List all business groups that the current user has access to";

    pub async fn execute(get_client: &GetClientFn, ctx: &CallContext) -> CallToolResult {
        fetch::<Vec<BusiGroup>>(get_client, ctx, "/api/n9e/busi-groups", None).await
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::CallContext;
    use crate::domains::tools::definitions::common::NO_CLIENT;
    use crate::domains::tools::definitions::common::tests::{call, envelope_server, result_text};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_list_busi_groups() {
        let (ctx, seen) =
            envelope_server(r#"{"dat":[{"id":2,"name":"ops"},{"id":5,"name":"db"}],"err":""}"#)
                .await;
        let handler = ListBusiGroupsTool::server_tool(crate::client::default_get_client()).handler;

        let result = call(&handler, ctx, json!({})).await;

        assert_eq!(result.is_error, Some(false));
        let text = result_text(&result);
        assert!(text.contains("\"ops\""));
        assert!(text.contains("\"db\""));
        assert_eq!(seen.lock().unwrap()[0].0, "/api/n9e/busi-groups");
    }

    #[tokio::test]
    async fn test_custom_client_lookup() {
        // A lookup that never finds a client.
        let get_client: GetClientFn = Arc::new(|_: &CallContext| None);
        let (ctx, seen) = envelope_server(r#"{"dat":[],"err":""}"#).await;
        let handler = ListBusiGroupsTool::server_tool(get_client).handler;

        let result = call(&handler, ctx, json!({})).await;

        assert_eq!(result.is_error, Some(true));
        assert_eq!(result_text(&result), NO_CLIENT);
        assert!(seen.lock().unwrap().is_empty());
    }
}
