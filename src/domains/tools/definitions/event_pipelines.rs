//! Event pipeline (workflow) tools and their execution records.

use rmcp::model::{CallToolResult, Tool};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::instrument;

use super::common::{NoParams, Query, fetch, invalid_input, read_tool};
use crate::client::types::{EventPipeline, EventPipelineExecution};
use crate::client::{CallContext, GetClientFn, PageResp};
use crate::domains::tools::handlers::make_tool_handler;
use crate::domains::tools::toolset::{ServerTool, Toolset};
use crate::domains::tools::validate::{require_id, require_non_empty, validate_pagination};

pub const TOOLSET: &str = "event_pipelines";
const TOOLSET_DESCRIPTION: &str = "Event pipeline/workflow management tools for event processing";

pub fn toolset(get_client: &GetClientFn) -> Toolset {
    Toolset::new(TOOLSET, TOOLSET_DESCRIPTION).add_read_tools([
        ListEventPipelinesTool::server_tool(get_client.clone()),
        GetEventPipelineTool::server_tool(get_client.clone()),
        ListEventPipelineExecutionsTool::server_tool(get_client.clone()),
        ListAllEventPipelineExecutionsTool::server_tool(get_client.clone()),
        GetEventPipelineExecutionTool::server_tool(get_client.clone()),
    ])
}

// ============================================================================
// Tool Parameters
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(default)]
pub struct GetEventPipelineParams {
    /// Event pipeline ID (required)
    #[serde(rename = "id")]
    pub pipeline_id: i64,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ListEventPipelineExecutionsParams {
    /// Event pipeline ID (required)
    pub pipeline_id: i64,
    /// Trigger mode filter (event/api/cron)
    pub mode: String,
    /// Status filter (running/success/failed)
    pub status: String,
    /// Page size (default 20, max 1000)
    pub limit: i64,
    /// Page number (starts from 1)
    #[serde(rename = "p")]
    pub page: i64,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ListAllEventPipelineExecutionsParams {
    /// Filter by pipeline ID
    pub pipeline_id: i64,
    /// Filter by pipeline name
    pub pipeline_name: String,
    /// Trigger mode filter (event/api/cron)
    pub mode: String,
    /// Status filter (running/success/failed)
    pub status: String,
    /// Page size (default 20, max 1000)
    pub limit: i64,
    /// Page number (starts from 1)
    #[serde(rename = "p")]
    pub page: i64,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(default)]
pub struct GetEventPipelineExecutionParams {
    /// Execution ID (UUID, required)
    pub exec_id: String,
}

// ============================================================================
// Tool Definitions
// ============================================================================

pub struct ListEventPipelinesTool;

impl ListEventPipelinesTool {
    pub const NAME: &'static str = "list_event_pipelines";
    pub const TITLE: &'static str = "List Event Pipelines";
    pub const DESCRIPTION: &'static str =
        "List all event pipelines/workflows that the current user has access to";

    pub async fn execute(get_client: &GetClientFn, ctx: &CallContext) -> CallToolResult {
        fetch::<Vec<EventPipeline>>(get_client, ctx, "/api/n9e/event-pipelines", None).await
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

pub struct GetEventPipelineTool;

impl GetEventPipelineTool {
    pub const NAME: &'static str = "get_event_pipeline";
    pub const TITLE: &'static str = "Get Event Pipeline";
    pub const DESCRIPTION: &'static str = "Get details of a specific event pipeline/workflow by ID";

    pub async fn execute(
        get_client: &GetClientFn,
        ctx: &CallContext,
        params: GetEventPipelineParams,
    ) -> CallToolResult {
        if let Err(e) = require_id("id", params.pipeline_id) {
            return invalid_input(e);
        }
        let path = format!("/api/n9e/event-pipeline/{}", params.pipeline_id);
        fetch::<EventPipeline>(get_client, ctx, &path, None).await
    }

    pub fn to_tool() -> Tool {
        read_tool::<GetEventPipelineParams>(Self::NAME, Self::TITLE, Self::DESCRIPTION)
    }

    pub fn server_tool(get_client: GetClientFn) -> ServerTool {
        ServerTool::new(
            Self::to_tool(),
            make_tool_handler(move |ctx, _req, params: GetEventPipelineParams| {
                let get_client = get_client.clone();
                async move { Ok(Self::execute(&get_client, &ctx, params).await) }
            }),
        )
    }
}

/// Execution records of one pipeline.
pub struct ListEventPipelineExecutionsTool;

impl ListEventPipelineExecutionsTool {
    pub const NAME: &'static str = "list_event_pipeline_executions";
    pub const TITLE: &'static str = "List Pipeline Executions";
    pub const DESCRIPTION: &'static str = "List execution records for a specific event pipeline";

    #[instrument(skip_all, fields(pipeline_id = params.pipeline_id))]
    pub async fn execute(
        get_client: &GetClientFn,
        ctx: &CallContext,
        params: ListEventPipelineExecutionsParams,
    ) -> CallToolResult {
        let checks = require_id("pipeline_id", params.pipeline_id)
            .and_then(|_| validate_pagination(params.limit, params.page));
        if let Err(e) = checks {
            return invalid_input(e);
        }

        let query = Query::new()
            .text("mode", &params.mode)
            .text("status", &params.status)
            .positive("limit", params.limit)
            .positive("p", params.page)
            .build();
        let path = format!("/api/n9e/event-pipeline/{}/executions", params.pipeline_id);

        fetch::<PageResp<EventPipelineExecution>>(get_client, ctx, &path, query).await
    }

    pub fn to_tool() -> Tool {
        read_tool::<ListEventPipelineExecutionsParams>(Self::NAME, Self::TITLE, Self::DESCRIPTION)
    }

    pub fn server_tool(get_client: GetClientFn) -> ServerTool {
        ServerTool::new(
            Self::to_tool(),
            make_tool_handler(move |ctx, _req, params: ListEventPipelineExecutionsParams| {
                let get_client = get_client.clone();
                async move { Ok(Self::execute(&get_client, &ctx, params).await) }
            }),
        )
    }
}

/// Execution records across every pipeline.
pub struct ListAllEventPipelineExecutionsTool;

impl ListAllEventPipelineExecutionsTool {
    pub const NAME: &'static str = "list_all_event_pipeline_executions";
    pub const TITLE: &'static str = "List All Pipeline Executions";
    pub const DESCRIPTION: &'static str =
        "List all event pipeline execution records across all pipelines";

    pub async fn execute(
        get_client: &GetClientFn,
        ctx: &CallContext,
        params: ListAllEventPipelineExecutionsParams,
    ) -> CallToolResult {
        if let Err(e) = validate_pagination(params.limit, params.page) {
            return invalid_input(e);
        }

        let query = Query::new()
            .positive("pipeline_id", params.pipeline_id)
            .text("pipeline_name", &params.pipeline_name)
            .text("mode", &params.mode)
            .text("status", &params.status)
            .positive("limit", params.limit)
            .positive("p", params.page)
            .build();

        fetch::<PageResp<EventPipelineExecution>>(
            get_client,
            ctx,
            "/api/n9e/event-pipeline-executions",
            query,
        )
        .await
    }

    pub fn to_tool() -> Tool {
        read_tool::<ListAllEventPipelineExecutionsParams>(
            Self::NAME,
            Self::TITLE,
            Self::DESCRIPTION,
        )
    }

    pub fn server_tool(get_client: GetClientFn) -> ServerTool {
        ServerTool::new(
            Self::to_tool(),
            make_tool_handler(move |ctx, _req, params: ListAllEventPipelineExecutionsParams| {
                let get_client = get_client.clone();
                async move { Ok(Self::execute(&get_client, &ctx, params).await) }
            }),
        )
    }
}

pub struct GetEventPipelineExecutionTool;

impl GetEventPipelineExecutionTool {
    pub const NAME: &'static str = "get_event_pipeline_execution";
    pub const TITLE: &'static str = "Get Pipeline Execution";
    pub const DESCRIPTION: &'static str =
        "Get details of a specific pipeline execution by execution ID";

    pub async fn execute(
        get_client: &GetClientFn,
        ctx: &CallContext,
        params: GetEventPipelineExecutionParams,
    ) -> CallToolResult {
        if let Err(e) = require_non_empty("exec_id", &params.exec_id) {
            return invalid_input(e);
        }
        let path = format!(
            "/api/n9e/event-pipeline-execution/{}",
            params.exec_id.trim()
        );
        fetch::<EventPipelineExecution>(get_client, ctx, &path, None).await
    }

    pub fn to_tool() -> Tool {
        read_tool::<GetEventPipelineExecutionParams>(Self::NAME, Self::TITLE, Self::DESCRIPTION)
    }

    pub fn server_tool(get_client: GetClientFn) -> ServerTool {
        ServerTool::new(
            Self::to_tool(),
            make_tool_handler(move |ctx, _req, params: GetEventPipelineExecutionParams| {
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

    const EXECUTIONS: &str = r#"{"dat":{"list":[{"id":"a1b2","pipeline_id":5,"status":"success"}],"total":1},"err":""}"#;

    #[tokio::test]
    async fn test_list_executions_for_pipeline() {
        let (ctx, seen) = envelope_server(EXECUTIONS).await;
        let handler = ListEventPipelineExecutionsTool::server_tool(default_get_client()).handler;

        let result = call(
            &handler,
            ctx,
            json!({ "pipeline_id": 5, "status": "success", "limit": 50 }),
        )
        .await;

        assert_eq!(result.is_error, Some(false));
        assert!(result_text(&result).contains("a1b2"));
        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].0, "/api/n9e/event-pipeline/5/executions");
        assert_eq!(seen[0].1.as_deref(), Some("limit=50&status=success"));
    }

    #[tokio::test]
    async fn test_list_executions_requires_pipeline() {
        let (ctx, seen) = envelope_server(EXECUTIONS).await;
        let handler = ListEventPipelineExecutionsTool::server_tool(default_get_client()).handler;

        let result = call(&handler, ctx, json!({ "status": "failed" })).await;

        assert_eq!(
            result_text(&result),
            "invalid input: pipeline_id is required and must be positive"
        );
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_all_executions() {
        let (ctx, seen) = envelope_server(EXECUTIONS).await;
        let handler = ListAllEventPipelineExecutionsTool::server_tool(default_get_client()).handler;

        let result = call(&handler, ctx, json!({ "pipeline_name": "enrich", "p": 2 })).await;

        assert_eq!(result.is_error, Some(false));
        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].0, "/api/n9e/event-pipeline-executions");
        assert_eq!(seen[0].1.as_deref(), Some("p=2&pipeline_name=enrich"));
    }

    #[tokio::test]
    async fn test_get_execution() {
        let (ctx, seen) = envelope_server(r#"{"dat":{"id":"a1b2"},"err":""}"#).await;
        let handler = GetEventPipelineExecutionTool::server_tool(default_get_client()).handler;

        let result = call(&handler, ctx.clone(), json!({ "exec_id": "a1b2" })).await;
        assert_eq!(result.is_error, Some(false));

        let result = call(&handler, ctx, json!({ "exec_id": "  " })).await;
        assert_eq!(result_text(&result), "invalid input: exec_id is required");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "/api/n9e/event-pipeline-execution/a1b2");
    }

    #[tokio::test]
    async fn test_get_execution_escapes_id() {
        let (ctx, seen) = envelope_server(r#"{"dat":{"id":"x"},"err":""}"#).await;
        let handler = GetEventPipelineExecutionTool::server_tool(default_get_client()).handler;

        call(&handler, ctx.clone(), json!({ "exec_id": "abc?x=1" })).await;
        call(&handler, ctx, json!({ "exec_id": "abc#frag" })).await;

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                ("/api/n9e/event-pipeline-execution/abc%3Fx=1".to_string(), None),
                ("/api/n9e/event-pipeline-execution/abc%23frag".to_string(), None),
            ]
        );
    }
}
