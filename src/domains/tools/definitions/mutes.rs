//! Alert mute (silence) tools.
//!
//! The only toolset with write tools. `create_mute` and `update_mute` are
//! hidden when the server runs read-only.

use rmcp::model::{CallToolResult, Tool};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{info, instrument};

use super::common::{fetch, invalid_input, read_tool, require_client, write_tool};
use crate::client::types::{AlertMute, PeriodicMute, TagFilter};
use crate::client::{self, CallContext, GetClientFn};
use crate::domains::tools::error::ValidationError;
use crate::domains::tools::handlers::{error_result, json_result, make_tool_handler};
use crate::domains::tools::toolset::{ServerTool, Toolset};
use crate::domains::tools::validate::{require_id, require_non_empty, validate_mute_window};

pub const TOOLSET: &str = "mutes";
const TOOLSET_DESCRIPTION: &str = "Alert mute/silence management tools";

pub fn toolset(get_client: &GetClientFn) -> Toolset {
    Toolset::new(TOOLSET, TOOLSET_DESCRIPTION)
        .add_read_tools([
            ListMutesTool::server_tool(get_client.clone()),
            GetMuteTool::server_tool(get_client.clone()),
        ])
        .add_write_tools([
            CreateMuteTool::server_tool(get_client.clone()),
            UpdateMuteTool::server_tool(get_client.clone()),
        ])
}

// ============================================================================
// Tool Parameters
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ListMutesParams {
    /// Business group ID (required)
    pub group_id: i64,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(default)]
pub struct GetMuteParams {
    /// Business group ID (required)
    pub group_id: i64,
    /// Alert mute ID (required)
    pub mute_id: i64,
}

/// Mute rule fields, sent as the request body on create and update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MuteFields {
    /// Note/title for the mute rule
    pub note: String,
    /// Category (e.g., prometheus, host, elasticsearch)
    pub cate: String,
    /// Product type (e.g., metric, host, loki)
    pub prod: String,
    /// Datasource IDs to match (empty means all)
    pub datasource_ids: Vec<i64>,
    /// Cluster name filter
    pub cluster: String,
    /// Tag filters. Each filter has key, func (==, !=, in, not in, =~, !~), and value
    pub tags: Vec<TagFilter>,
    /// Reason/description for the mute (required)
    pub cause: String,
    /// Start time Unix timestamp (required when mute_time_type=0)
    pub btime: i64,
    /// End time Unix timestamp (required when mute_time_type=0)
    pub etime: i64,
    /// Severity levels to match (1=critical, 2=warning, 3=info). Empty means all.
    pub severities: Vec<i64>,
    /// Disabled status (0=enabled, 1=disabled)
    pub disabled: i64,
    /// Mute time type (0=time range, 1=periodic)
    pub mute_time_type: i64,
    /// Periodic mute rules (when mute_time_type=1)
    pub periodic_mutes: Vec<PeriodicMute>,
}

impl MuteFields {
    fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("cause", &self.cause)?;
        validate_mute_window(self.mute_time_type, self.btime, self.etime)
    }
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CreateMuteParams {
    /// Business group ID (required)
    pub group_id: i64,
    #[serde(flatten)]
    pub mute: MuteFields,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(default)]
pub struct UpdateMuteParams {
    /// Business group ID (required)
    pub group_id: i64,
    /// Alert mute ID to update (required)
    pub mute_id: i64,
    #[serde(flatten)]
    pub mute: MuteFields,
}

// ============================================================================
// Tool Definitions
// ============================================================================

pub struct ListMutesTool;

impl ListMutesTool {
    pub const NAME: &'static str = "list_mutes";
    pub const TITLE: &'static str = "List Alert Mutes";
    pub const DESCRIPTION: &'static str = "List alert mutes/silences for a business group";

    pub async fn execute(
        get_client: &GetClientFn,
        ctx: &CallContext,
        params: ListMutesParams,
    ) -> CallToolResult {
        if let Err(e) = require_id("group_id", params.group_id) {
            return invalid_input(e);
        }
        let path = format!("/api/n9e/busi-group/{}/alert-mutes", params.group_id);
        fetch::<Vec<AlertMute>>(get_client, ctx, &path, None).await
    }

    pub fn to_tool() -> Tool {
        read_tool::<ListMutesParams>(Self::NAME, Self::TITLE, Self::DESCRIPTION)
    }

    pub fn server_tool(get_client: GetClientFn) -> ServerTool {
        ServerTool::new(
            Self::to_tool(),
            make_tool_handler(move |ctx, _req, params: ListMutesParams| {
                let get_client = get_client.clone();
                async move { Ok(Self::execute(&get_client, &ctx, params).await) }
            }),
        )
    }
}

pub struct GetMuteTool;

impl GetMuteTool {
    pub const NAME: &'static str = "get_mute";
    pub const TITLE: &'static str = "Get Alert Mute";
    pub const DESCRIPTION: &'static str = "Get details of a specific alert mute by ID";

    pub async fn execute(
        get_client: &GetClientFn,
        ctx: &CallContext,
        params: GetMuteParams,
    ) -> CallToolResult {
        let checks =
            require_id("group_id", params.group_id).and_then(|_| require_id("mute_id", params.mute_id));
        if let Err(e) = checks {
            return invalid_input(e);
        }
        let path = format!(
            "/api/n9e/busi-group/{}/alert-mute/{}",
            params.group_id, params.mute_id
        );
        fetch::<AlertMute>(get_client, ctx, &path, None).await
    }

    pub fn to_tool() -> Tool {
        read_tool::<GetMuteParams>(Self::NAME, Self::TITLE, Self::DESCRIPTION)
    }

    pub fn server_tool(get_client: GetClientFn) -> ServerTool {
        ServerTool::new(
            Self::to_tool(),
            make_tool_handler(move |ctx, _req, params: GetMuteParams| {
                let get_client = get_client.clone();
                async move { Ok(Self::execute(&get_client, &ctx, params).await) }
            }),
        )
    }
}

/// Creates a mute rule and reports the new id.
pub struct CreateMuteTool;

impl CreateMuteTool {
    pub const NAME: &'static str = "create_mute";
    pub const TITLE: &'static str = "Create Alert Mute";
    pub const DESCRIPTION: &'static str = "Create a new alert mute/silence rule. Use mute_time_type=0 for time range mode (btime/etime), or mute_time_type=1 for periodic mode (periodic_mutes).";

    #[instrument(skip_all, fields(group_id = params.group_id))]
    pub async fn execute(
        get_client: &GetClientFn,
        ctx: &CallContext,
        params: CreateMuteParams,
    ) -> CallToolResult {
        let checks = require_id("group_id", params.group_id).and_then(|_| params.mute.validate());
        if let Err(e) = checks {
            return invalid_input(e);
        }

        let client = match require_client(get_client, ctx) {
            Ok(client) => client,
            Err(result) => return result,
        };

        let path = format!("/api/n9e/busi-group/{}/alert-mutes", params.group_id);
        match client::post::<i64, _>(&client, ctx, &path, &params.mute).await {
            Ok(id) => {
                info!(id, "Alert mute created");
                json_result(&json!({
                    "id": id,
                    "message": "Alert mute created successfully",
                }))
            }
            Err(e) => error_result(e.to_string()),
        }
    }

    pub fn to_tool() -> Tool {
        write_tool::<CreateMuteParams>(Self::NAME, Self::TITLE, Self::DESCRIPTION)
    }

    pub fn server_tool(get_client: GetClientFn) -> ServerTool {
        ServerTool::new(
            Self::to_tool(),
            make_tool_handler(move |ctx, _req, params: CreateMuteParams| {
                let get_client = get_client.clone();
                async move { Ok(Self::execute(&get_client, &ctx, params).await) }
            }),
        )
    }
}

pub struct UpdateMuteTool;

impl UpdateMuteTool {
    pub const NAME: &'static str = "update_mute";
    pub const TITLE: &'static str = "Update Alert Mute";
    pub const DESCRIPTION: &'static str = "Update an existing alert mute/silence rule";

    #[instrument(skip_all, fields(group_id = params.group_id, mute_id = params.mute_id))]
    pub async fn execute(
        get_client: &GetClientFn,
        ctx: &CallContext,
        params: UpdateMuteParams,
    ) -> CallToolResult {
        let checks = require_id("group_id", params.group_id)
            .and_then(|_| require_id("mute_id", params.mute_id))
            .and_then(|_| params.mute.validate());
        if let Err(e) = checks {
            return invalid_input(e);
        }

        let client = match require_client(get_client, ctx) {
            Ok(client) => client,
            Err(result) => return result,
        };

        let path = format!(
            "/api/n9e/busi-group/{}/alert-mute/{}",
            params.group_id, params.mute_id
        );
        match client::put::<Value, _>(&client, ctx, &path, &params.mute).await {
            Ok(_) => {
                info!("Alert mute updated");
                json_result(&json!({
                    "id": params.mute_id,
                    "message": "Alert mute updated successfully",
                }))
            }
            Err(e) => error_result(e.to_string()),
        }
    }

    pub fn to_tool() -> Tool {
        write_tool::<UpdateMuteParams>(Self::NAME, Self::TITLE, Self::DESCRIPTION)
    }

    pub fn server_tool(get_client: GetClientFn) -> ServerTool {
        ServerTool::new(
            Self::to_tool(),
            make_tool_handler(move |ctx, _req, params: UpdateMuteParams| {
                let get_client = get_client.clone();
                async move { Ok(Self::execute(&get_client, &ctx, params).await) }
            }),
        )
    }
}
