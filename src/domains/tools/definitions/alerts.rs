//! Alert tools: active and historical events, alert rules.

use rmcp::model::{CallToolResult, Tool};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, instrument};

use super::common::{Query, fetch, invalid_input, read_tool};
use crate::client::types::{AlertCurEvent, AlertHisEvent, AlertRule};
use crate::client::{CallContext, GetClientFn, PageResp};
use crate::domains::tools::handlers::make_tool_handler;
use crate::domains::tools::toolset::{ServerTool, Toolset};
use crate::domains::tools::validate::{
    require_id, validate_cate, validate_is_recovered, validate_pagination, validate_rule_prods,
    validate_severity, validate_time_range,
};

pub const TOOLSET: &str = "alerts";
const TOOLSET_DESCRIPTION: &str = "Alert management tools for viewing and managing alerts";

/// Build the `alerts` toolset.
pub fn toolset(get_client: &GetClientFn) -> Toolset {
    Toolset::new(TOOLSET, TOOLSET_DESCRIPTION).add_read_tools([
        ListActiveAlertsTool::server_tool(get_client.clone()),
        GetActiveAlertTool::server_tool(get_client.clone()),
        ListHistoryAlertsTool::server_tool(get_client.clone()),
        GetHistoryAlertTool::server_tool(get_client.clone()),
        ListAlertRulesTool::server_tool(get_client.clone()),
        GetAlertRuleTool::server_tool(get_client.clone()),
    ])
}

// ============================================================================
// Tool Parameters
// ============================================================================

/// Filters for active alert events.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ListActiveAlertsParams {
    /// Lookback hours (mutually exclusive with stime/etime)
    pub hours: i64,
    /// Start time Unix timestamp
    pub stime: i64,
    /// End time Unix timestamp
    pub etime: i64,
    /// Severity levels comma-separated (1=critical, 2=warning, 3=info)
    pub severity: String,
    /// Search keyword (matches rule name/tags)
    pub query: String,
    /// Alert category (prometheus/host/elasticsearch, default $all)
    pub cate: String,
    /// Product types comma-separated (host/metric/loki/anomaly)
    pub rule_prods: String,
    /// Datasource IDs comma-separated
    pub datasource_ids: String,
    /// Alert rule ID
    #[serde(rename = "rid")]
    pub rule_id: i64,
    /// Event IDs comma-separated
    pub event_ids: String,
    /// Business group ID
    #[serde(rename = "bgid")]
    pub busi_group_id: i64,
    /// Only events of the current user's business groups
    pub my_groups: bool,
    /// Page size (default 20)
    pub limit: i64,
    /// Page number (starts from 1)
    #[serde(rename = "p")]
    pub page: i64,
}

/// Filters for historical alert events.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ListHistoryAlertsParams {
    /// Lookback hours
    pub hours: i64,
    /// Start time Unix timestamp
    pub stime: i64,
    /// End time Unix timestamp
    pub etime: i64,
    /// Severity level (-1=all, 1=critical, 2=warning, 3=info)
    pub severity: i64,
    /// Recovery status (-1=all, 0=not recovered, 1=recovered)
    pub is_recovered: i64,
    /// Search keyword
    pub query: String,
    /// Alert category
    pub cate: String,
    /// Product types comma-separated
    pub rule_prods: String,
    /// Datasource IDs comma-separated
    pub datasource_ids: String,
    /// Business group ID
    #[serde(rename = "bgid")]
    pub busi_group_id: i64,
    /// Page size (default 20)
    pub limit: i64,
    /// Page number (starts from 1)
    #[serde(rename = "p")]
    pub page: i64,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(default)]
pub struct GetAlertParams {
    /// Alert event ID (required)
    #[serde(rename = "eid")]
    pub event_id: i64,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ListAlertRulesParams {
    /// Business group ID (required)
    pub group_id: i64,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(default)]
pub struct GetAlertRuleParams {
    /// Alert rule ID (required)
    #[serde(rename = "arid")]
    pub rule_id: i64,
}

// ============================================================================
// Tool Definitions
// ============================================================================

/// Lists currently firing alerts.
pub struct ListActiveAlertsTool;

impl ListActiveAlertsTool {
    pub const NAME: &'static str = "list_active_alerts";
    pub const TITLE: &'static str = "List Active Alerts";
    pub const DESCRIPTION: &'static str =
        "List active alert events with optional filters. Use this to view currently firing alerts.";

    #[instrument(skip_all)]
    pub async fn execute(
        get_client: &GetClientFn,
        ctx: &CallContext,
        params: ListActiveAlertsParams,
    ) -> CallToolResult {
        let checks = validate_time_range(params.hours, params.stime, params.etime)
            .and_then(|_| validate_severity(&params.severity))
            .and_then(|_| validate_cate(&params.cate))
            .and_then(|_| validate_rule_prods(&params.rule_prods))
            .and_then(|_| validate_pagination(params.limit, params.page));
        if let Err(e) = checks {
            return invalid_input(e);
        }

        info!("Listing active alerts");

        let query = Query::new()
            .positive("hours", params.hours)
            .positive("stime", params.stime)
            .positive("etime", params.etime)
            .text("severity", &params.severity)
            .text("query", &params.query)
            .text("cate", &params.cate)
            .text("rule_prods", &params.rule_prods)
            .text("datasource_ids", &params.datasource_ids)
            .positive("rid", params.rule_id)
            .text("event_ids", &params.event_ids)
            .positive("bgid", params.busi_group_id)
            .flag("my_groups", params.my_groups)
            .positive("limit", params.limit)
            .positive("p", params.page)
            .build();

        fetch::<PageResp<AlertCurEvent>>(get_client, ctx, "/api/n9e/alert-cur-events/list", query)
            .await
    }

    pub fn to_tool() -> Tool {
        read_tool::<ListActiveAlertsParams>(Self::NAME, Self::TITLE, Self::DESCRIPTION)
    }

    pub fn server_tool(get_client: GetClientFn) -> ServerTool {
        ServerTool::new(
            Self::to_tool(),
            make_tool_handler(move |ctx, _req, params: ListActiveAlertsParams| {
                let get_client = get_client.clone();
                async move { Ok(Self::execute(&get_client, &ctx, params).await) }
            }),
        )
    }
}

/// Fetches one active alert event.
pub struct GetActiveAlertTool;

impl GetActiveAlertTool {
    pub const NAME: &'static str = "get_active_alert";
    pub const TITLE: &'static str = "Get Active Alert";
    pub const DESCRIPTION: &'static str = "Get details of a specific active alert event by ID";

    pub async fn execute(
        get_client: &GetClientFn,
        ctx: &CallContext,
        params: GetAlertParams,
    ) -> CallToolResult {
        if let Err(e) = require_id("eid", params.event_id) {
            return invalid_input(e);
        }
        let path = format!("/api/n9e/alert-cur-event/{}", params.event_id);
        fetch::<AlertCurEvent>(get_client, ctx, &path, None).await
    }

    pub fn to_tool() -> Tool {
        read_tool::<GetAlertParams>(Self::NAME, Self::TITLE, Self::DESCRIPTION)
    }

    pub fn server_tool(get_client: GetClientFn) -> ServerTool {
        ServerTool::new(
            Self::to_tool(),
            make_tool_handler(move |ctx, _req, params: GetAlertParams| {
                let get_client = get_client.clone();
                async move { Ok(Self::execute(&get_client, &ctx, params).await) }
            }),
        )
    }
}

/// Lists past alert events.
pub struct ListHistoryAlertsTool;

impl ListHistoryAlertsTool {
    pub const NAME: &'static str = "list_history_alerts";
    pub const TITLE: &'static str = "List History Alerts";
    pub const DESCRIPTION: &'static str = "List historical alert events with optional filters";

    #[instrument(skip_all)]
    pub async fn execute(
        get_client: &GetClientFn,
        ctx: &CallContext,
        params: ListHistoryAlertsParams,
    ) -> CallToolResult {
        let checks = validate_time_range(params.hours, params.stime, params.etime)
            .and_then(|_| validate_cate(&params.cate))
            .and_then(|_| validate_rule_prods(&params.rule_prods))
            .and_then(|_| validate_is_recovered(params.is_recovered))
            .and_then(|_| validate_pagination(params.limit, params.page));
        if let Err(e) = checks {
            return invalid_input(e);
        }

        info!("Listing history alerts");

        let query = Query::new()
            .positive("hours", params.hours)
            .positive("stime", params.stime)
            .positive("etime", params.etime)
            .non_zero("severity", params.severity)
            .non_zero("is_recovered", params.is_recovered)
            .text("query", &params.query)
            .text("cate", &params.cate)
            .text("rule_prods", &params.rule_prods)
            .text("datasource_ids", &params.datasource_ids)
            .positive("bgid", params.busi_group_id)
            .positive("limit", params.limit)
            .positive("p", params.page)
            .build();

        fetch::<PageResp<AlertHisEvent>>(get_client, ctx, "/api/n9e/alert-his-events/list", query)
            .await
    }

    pub fn to_tool() -> Tool {
        read_tool::<ListHistoryAlertsParams>(Self::NAME, Self::TITLE, Self::DESCRIPTION)
    }

    pub fn server_tool(get_client: GetClientFn) -> ServerTool {
        ServerTool::new(
            Self::to_tool(),
            make_tool_handler(move |ctx, _req, params: ListHistoryAlertsParams| {
                let get_client = get_client.clone();
                async move { Ok(Self::execute(&get_client, &ctx, params).await) }
            }),
        )
    }
}

/// Fetches one historical alert event.
pub struct GetHistoryAlertTool;

impl GetHistoryAlertTool {
    pub const NAME: &'static str = "get_history_alert";
    pub const TITLE: &'static str = "Get History Alert";
    pub const DESCRIPTION: &'static str = "Get details of a specific historical alert event by ID";

    pub async fn execute(
        get_client: &GetClientFn,
        ctx: &CallContext,
        params: GetAlertParams,
    ) -> CallToolResult {
        if let Err(e) = require_id("eid", params.event_id) {
            return invalid_input(e);
        }
        let path = format!("/api/n9e/alert-his-event/{}", params.event_id);
        fetch::<AlertHisEvent>(get_client, ctx, &path, None).await
    }

    pub fn to_tool() -> Tool {
        read_tool::<GetAlertParams>(Self::NAME, Self::TITLE, Self::DESCRIPTION)
    }

    pub fn server_tool(get_client: GetClientFn) -> ServerTool {
        ServerTool::new(
            Self::to_tool(),
            make_tool_handler(move |ctx, _req, params: GetAlertParams| {
                let get_client = get_client.clone();
                async move { Ok(Self::execute(&get_client, &ctx, params).await) }
            }),
        )
    }
}

/// Lists the alert rules of a business group.
pub struct ListAlertRulesTool;

impl ListAlertRulesTool {
    pub const NAME: &'static str = "list_alert_rules";
    pub const TITLE: &'static str = "List Alert Rules";
    pub const DESCRIPTION: &'static str = "List alert rules for a business group";

    pub async fn execute(
        get_client: &GetClientFn,
        ctx: &CallContext,
        params: ListAlertRulesParams,
    ) -> CallToolResult {
        if let Err(e) = require_id("group_id", params.group_id) {
            return invalid_input(e);
        }
        let path = format!("/api/n9e/busi-group/{}/alert-rules", params.group_id);
        fetch::<Vec<AlertRule>>(get_client, ctx, &path, None).await
    }

    pub fn to_tool() -> Tool {
        read_tool::<ListAlertRulesParams>(Self::NAME, Self::TITLE, Self::DESCRIPTION)
    }

    pub fn server_tool(get_client: GetClientFn) -> ServerTool {
        ServerTool::new(
            Self::to_tool(),
            make_tool_handler(move |ctx, _req, params: ListAlertRulesParams| {
                let get_client = get_client.clone();
                async move { Ok(Self::execute(&get_client, &ctx, params).await) }
            }),
        )
    }
}

/// Fetches one alert rule.
pub struct GetAlertRuleTool;

impl GetAlertRuleTool {
    pub const NAME: &'static str = "get_alert_rule";
    pub const TITLE: &'static str = "Get Alert Rule";
    pub const DESCRIPTION: &'static str = "Get details of a specific alert rule by ID";

    pub async fn execute(
        get_client: &GetClientFn,
        ctx: &CallContext,
        params: GetAlertRuleParams,
    ) -> CallToolResult {
        if let Err(e) = require_id("arid", params.rule_id) {
            return invalid_input(e);
        }
        let path = format!("/api/n9e/alert-rule/{}", params.rule_id);
        fetch::<AlertRule>(get_client, ctx, &path, None).await
    }

    pub fn to_tool() -> Tool {
        read_tool::<GetAlertRuleParams>(Self::NAME, Self::TITLE, Self::DESCRIPTION)
    }

    pub fn server_tool(get_client: GetClientFn) -> ServerTool {
        ServerTool::new(
            Self::to_tool(),
            make_tool_handler(move |ctx, _req, params: GetAlertRuleParams| {
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

    const PAGE: &str = r#"{"dat":{"list":[{"id":1,"rule_name":"cpu high","severity":1}],"total":1},"err":""}"#;

    #[tokio::test]
    async fn test_list_active_alerts_builds_query() {
        let (ctx, seen) = envelope_server(PAGE).await;
        let handler = ListActiveAlertsTool::server_tool(default_get_client()).handler;

        let result = call(
            &handler,
            ctx,
            json!({ "hours": 6, "severity": "1,2", "bgid": 3, "limit": 10, "p": 2 }),
        )
        .await;

        assert_eq!(result.is_error, Some(false));
        assert!(result_text(&result).contains("cpu high"));

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].0, "/api/n9e/alert-cur-events/list");
        assert_eq!(
            seen[0].1.as_deref(),
            Some("bgid=3&hours=6&limit=10&p=2&severity=1%2C2")
        );
    }

    #[tokio::test]
    async fn test_list_active_alerts_rejects_mixed_time_range() {
        let (ctx, seen) = envelope_server(PAGE).await;
        let handler = ListActiveAlertsTool::server_tool(default_get_client()).handler;

        let result = call(&handler, ctx, json!({ "hours": 1, "stime": 100, "etime": 50 })).await;

        assert_eq!(result.is_error, Some(true));
        assert!(result_text(&result).contains("mutually exclusive"));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_active_alerts_rejects_bad_severity() {
        let (ctx, seen) = envelope_server(PAGE).await;
        let handler = ListActiveAlertsTool::server_tool(default_get_client()).handler;

        let result = call(&handler, ctx, json!({ "severity": "1,9" })).await;

        assert_eq!(result.is_error, Some(true));
        assert_eq!(
            result_text(&result),
            "invalid input: invalid severity value: 9, must be 1, 2, or 3"
        );
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_history_alerts_checks_recovery() {
        let (ctx, seen) = envelope_server(PAGE).await;
        let handler = ListHistoryAlertsTool::server_tool(default_get_client()).handler;

        let result = call(&handler, ctx, json!({ "is_recovered": 5 })).await;
        assert_eq!(result.is_error, Some(true));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_history_alerts_passes_negative_filters() {
        let (ctx, seen) = envelope_server(PAGE).await;
        let handler = ListHistoryAlertsTool::server_tool(default_get_client()).handler;

        let result = call(&handler, ctx, json!({ "severity": -1, "is_recovered": -1 })).await;
        assert_eq!(result.is_error, Some(false));

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].1.as_deref(), Some("is_recovered=-1&severity=-1"));
    }

    #[tokio::test]
    async fn test_get_active_alert_requires_id() {
        let (ctx, seen) = envelope_server(PAGE).await;
        let handler = GetActiveAlertTool::server_tool(default_get_client()).handler;

        let result = call(&handler, ctx, json!({})).await;
        assert_eq!(result.is_error, Some(true));
        assert!(result_text(&result).contains("eid is required and must be positive"));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_alert_rule_path() {
        let (ctx, seen) = envelope_server(r#"{"dat":{"id":77,"name":"disk"},"err":""}"#).await;
        let handler = GetAlertRuleTool::server_tool(default_get_client()).handler;

        let result = call(&handler, ctx, json!({ "arid": 77 })).await;
        assert_eq!(result.is_error, Some(false));
        assert_eq!(seen.lock().unwrap()[0].0, "/api/n9e/alert-rule/77");
    }

    #[tokio::test]
    async fn test_business_error_becomes_error_result() {
        let (ctx, _) = envelope_server(r#"{"dat":null,"err":"busi-group not found"}"#).await;
        let handler = ListAlertRulesTool::server_tool(default_get_client()).handler;

        let result = call(&handler, ctx, json!({ "group_id": 9 })).await;
        assert_eq!(result.is_error, Some(true));
        assert!(result_text(&result).contains(r#"err="busi-group not found""#));
    }

    #[test]
    fn test_toolset_contents() {
        let ts = toolset(&default_get_client());
        assert_eq!(ts.read_tools.len(), 6);
        assert!(ts.write_tools.is_empty());
    }
}
