//! Alert subscription tools.

use rmcp::model::{CallToolResult, Tool};
use schemars::JsonSchema;
use serde::Deserialize;

use super::common::{Query, fetch, invalid_input, read_tool};
use crate::client::types::AlertSubscribe;
use crate::client::{CallContext, GetClientFn};
use crate::domains::tools::handlers::make_tool_handler;
use crate::domains::tools::toolset::{ServerTool, Toolset};
use crate::domains::tools::validate::require_id;

pub const TOOLSET: &str = "alert_subscribes";
const TOOLSET_DESCRIPTION: &str = "Alert subscription management tools for event handling";

pub fn toolset(get_client: &GetClientFn) -> Toolset {
    Toolset::new(TOOLSET, TOOLSET_DESCRIPTION).add_read_tools([
        ListAlertSubscribesTool::server_tool(get_client.clone()),
        ListAlertSubscribesByGidsTool::server_tool(get_client.clone()),
        GetAlertSubscribeTool::server_tool(get_client.clone()),
    ])
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ListAlertSubscribesParams {
    /// Business group ID (required)
    pub group_id: i64,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ListAlertSubscribesByGidsParams {
    /// Business group IDs comma-separated (empty for all accessible groups)
    pub gids: String,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(default)]
pub struct GetAlertSubscribeParams {
    /// Alert subscription ID (required)
    #[serde(rename = "sid")]
    pub subscribe_id: i64,
}

pub struct ListAlertSubscribesTool;

impl ListAlertSubscribesTool {
    pub const NAME: &'static str = "list_alert_subscribes";
    pub const TITLE: &'static str = "List Alert Subscriptions";
    pub const DESCRIPTION: &'static str = "List alert subscriptions for a business group";

    pub async fn execute(
        get_client: &GetClientFn,
        ctx: &CallContext,
        params: ListAlertSubscribesParams,
    ) -> CallToolResult {
        if let Err(e) = require_id("group_id", params.group_id) {
            return invalid_input(e);
        }
        let path = format!("/api/n9e/busi-group/{}/alert-subscribes", params.group_id);
        fetch::<Vec<AlertSubscribe>>(get_client, ctx, &path, None).await
    }

    pub fn to_tool() -> Tool {
        read_tool::<ListAlertSubscribesParams>(Self::NAME, Self::TITLE, Self::DESCRIPTION)
    }

    pub fn server_tool(get_client: GetClientFn) -> ServerTool {
        ServerTool::new(
            Self::to_tool(),
            make_tool_handler(move |ctx, _req, params: ListAlertSubscribesParams| {
                let get_client = get_client.clone();
                async move { Ok(Self::execute(&get_client, &ctx, params).await) }
            }),
        )
    }
}

/// Lists subscriptions across several business groups at once.
pub struct ListAlertSubscribesByGidsTool;

impl ListAlertSubscribesByGidsTool {
    pub const NAME: &'static str = "list_alert_subscribes_by_gids";
    pub const TITLE: &'static str = "List Alert Subscriptions By Group IDs";
    pub const DESCRIPTION: &'static str =
        "List alert subscriptions across multiple business groups";

    pub async fn execute(
        get_client: &GetClientFn,
        ctx: &CallContext,
        params: ListAlertSubscribesByGidsParams,
    ) -> CallToolResult {
        let query = Query::new().text("gids", &params.gids).build();
        fetch::<Vec<AlertSubscribe>>(get_client, ctx, "/api/n9e/busi-groups/alert-subscribes", query)
            .await
    }

    pub fn to_tool() -> Tool {
        read_tool::<ListAlertSubscribesByGidsParams>(Self::NAME, Self::TITLE, Self::DESCRIPTION)
    }

    pub fn server_tool(get_client: GetClientFn) -> ServerTool {
        ServerTool::new(
            Self::to_tool(),
            make_tool_handler(move |ctx, _req, params: ListAlertSubscribesByGidsParams| {
                let get_client = get_client.clone();
                async move { Ok(Self::execute(&get_client, &ctx, params).await) }
            }),
        )
    }
}

pub struct GetAlertSubscribeTool;

impl GetAlertSubscribeTool {
    pub const NAME: &'static str = "get_alert_subscribe";
    pub const TITLE: &'static str = "Get Alert Subscription";
    pub const DESCRIPTION: &'static str = "Get details of a specific alert subscription by ID";

    pub async fn execute(
        get_client: &GetClientFn,
        ctx: &CallContext,
        params: GetAlertSubscribeParams,
    ) -> CallToolResult {
        if let Err(e) = require_id("sid", params.subscribe_id) {
            return invalid_input(e);
        }
        let path = format!("/api/n9e/alert-subscribe/{}", params.subscribe_id);
        fetch::<AlertSubscribe>(get_client, ctx, &path, None).await
    }

    pub fn to_tool() -> Tool {
        read_tool::<GetAlertSubscribeParams>(Self::NAME, Self::TITLE, Self::DESCRIPTION)
    }

    pub fn server_tool(get_client: GetClientFn) -> ServerTool {
        ServerTool::new(
            Self::to_tool(),
            make_tool_handler(move |ctx, _req, params: GetAlertSubscribeParams| {
                let get_client = get_client.clone();
                async move { Ok(Self::execute(&get_client, &ctx, params).await) }
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::default_get_client;
    use crate::domains::tools::definitions::common::tests::{call, envelope_server, result_text};
    use serde_json::json;

    const SUBS: &str = r#"{"dat":[{"id":4,"name":"db team","group_id":2}],"err":""}"#;

    #[tokio::test]
    async fn test_list_by_gids() {
        let (ctx, seen) = envelope_server(SUBS).await;
        let handler = ListAlertSubscribesByGidsTool::server_tool(default_get_client()).handler;

        let result = call(&handler, ctx, json!({ "gids": "2,3" })).await;

        assert_eq!(result.is_error, Some(false));
        assert!(result_text(&result).contains("db team"));
        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].0, "/api/n9e/busi-groups/alert-subscribes");
        assert_eq!(seen[0].1.as_deref(), Some("gids=2%2C3"));
    }

    #[tokio::test]
    async fn test_list_by_gids_without_filter() {
        let (ctx, seen) = envelope_server(SUBS).await;
        let handler = ListAlertSubscribesByGidsTool::server_tool(default_get_client()).handler;

        call(&handler, ctx, json!({})).await;
        assert_eq!(seen.lock().unwrap()[0].1, None);
    }

    #[tokio::test]
    async fn test_list_requires_group() {
        let (ctx, seen) = envelope_server(SUBS).await;
        let handler = ListAlertSubscribesTool::server_tool(default_get_client()).handler;

        let result = call(&handler, ctx, json!({ "group_id": -3 })).await;

        assert_eq!(result.is_error, Some(true));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_subscribe_path() {
        let (ctx, seen) = envelope_server(r#"{"dat":{"id":4},"err":""}"#).await;
        let handler = GetAlertSubscribeTool::server_tool(default_get_client()).handler;

        call(&handler, ctx, json!({ "sid": 4 })).await;
        assert_eq!(seen.lock().unwrap()[0].0, "/api/n9e/alert-subscribe/4");
    }
}
