//! Notification rule tools.

use rmcp::model::{CallToolResult, Tool};
use schemars::JsonSchema;
use serde::Deserialize;

use super::common::{NoParams, fetch, invalid_input, read_tool};
use crate::client::types::NotifyRule;
use crate::client::{CallContext, GetClientFn};
use crate::domains::tools::handlers::make_tool_handler;
use crate::domains::tools::toolset::{ServerTool, Toolset};
use crate::domains::tools::validate::require_id;

pub const TOOLSET: &str = "notify_rules";
const TOOLSET_DESCRIPTION: &str = "Notification rule management tools";

pub fn toolset(get_client: &GetClientFn) -> Toolset {
    Toolset::new(TOOLSET, TOOLSET_DESCRIPTION).add_read_tools([
        ListNotifyRulesTool::server_tool(get_client.clone()),
        GetNotifyRuleTool::server_tool(get_client.clone()),
    ])
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(default)]
pub struct GetNotifyRuleParams {
    /// Notification rule ID (required)
    #[serde(rename = "id")]
    pub rule_id: i64,
}

pub struct ListNotifyRulesTool;

impl ListNotifyRulesTool {
    pub const NAME: &'static str = "list_notify_rules";
    pub const TITLE: &'static str = "List Notification Rules";
    pub const DESCRIPTION: &'static str =
        "List all notification rules that the current user has access to";

    pub async fn execute(get_client: &GetClientFn, ctx: &CallContext) -> CallToolResult {
        fetch::<Vec<NotifyRule>>(get_client, ctx, "/api/n9e/notify-rules", None).await
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

pub struct GetNotifyRuleTool;

impl GetNotifyRuleTool {
    pub const NAME: &'static str = "get_notify_rule";
    pub const TITLE: &'static str = "Get Notification Rule";
    pub const DESCRIPTION: &'static str = "Get details of a specific notification rule by ID";

    pub async fn execute(
        get_client: &GetClientFn,
        ctx: &CallContext,
        params: GetNotifyRuleParams,
    ) -> CallToolResult {
        if let Err(e) = require_id("id", params.rule_id) {
            return invalid_input(e);
        }
        let path = format!("/api/n9e/notify-rule/{}", params.rule_id);
        fetch::<NotifyRule>(get_client, ctx, &path, None).await
    }

    pub fn to_tool() -> Tool {
        read_tool::<GetNotifyRuleParams>(Self::NAME, Self::TITLE, Self::DESCRIPTION)
    }

    pub fn server_tool(get_client: GetClientFn) -> ServerTool {
        ServerTool::new(
            Self::to_tool(),
            make_tool_handler(move |ctx, _req, params: GetNotifyRuleParams| {
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

    #[tokio::test]
    async fn test_get_notify_rule() {
        let (ctx, seen) =
            envelope_server(r#"{"dat":{"id":12,"name":"oncall","enable":true},"err":""}"#).await;
        let handler = GetNotifyRuleTool::server_tool(default_get_client()).handler;

        let result = call(&handler, ctx, json!({ "id": 12 })).await;

        assert_eq!(result.is_error, Some(false));
        assert!(result_text(&result).contains("oncall"));
        assert_eq!(seen.lock().unwrap()[0].0, "/api/n9e/notify-rule/12");
    }

    #[tokio::test]
    async fn test_get_notify_rule_rejects_wrong_type() {
        let (ctx, seen) = envelope_server(r#"{"dat":{},"err":""}"#).await;
        let handler = GetNotifyRuleTool::server_tool(default_get_client()).handler;

        let result = call(&handler, ctx, json!({ "id": "twelve" })).await;

        assert_eq!(result.is_error, Some(true));
        assert!(result_text(&result).starts_with("failed to parse input:"));
        assert!(seen.lock().unwrap().is_empty());
    }
}
