//! User and user group tools.

use rmcp::model::{CallToolResult, Tool};
use schemars::JsonSchema;
use serde::Deserialize;

use super::common::{Query, fetch, invalid_input, read_tool};
use crate::client::types::{User, UserGroup, UserGroupDetail};
use crate::client::{CallContext, GetClientFn, PageResp};
use crate::domains::tools::handlers::make_tool_handler;
use crate::domains::tools::toolset::{ServerTool, Toolset};
use crate::domains::tools::validate::{require_id, validate_pagination};

pub const TOOLSET: &str = "users";
const TOOLSET_DESCRIPTION: &str = "User and user group management tools";

pub fn toolset(get_client: &GetClientFn) -> Toolset {
    Toolset::new(TOOLSET, TOOLSET_DESCRIPTION).add_read_tools([
        ListUsersTool::server_tool(get_client.clone()),
        GetUserTool::server_tool(get_client.clone()),
        ListUserGroupsTool::server_tool(get_client.clone()),
        GetUserGroupTool::server_tool(get_client.clone()),
    ])
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ListUsersParams {
    /// Search keyword (matches username/nickname/email/phone)
    pub query: String,
    /// Page size (default 20)
    pub limit: i64,
    /// Page number (starts from 1)
    #[serde(rename = "p")]
    pub page: i64,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(default)]
pub struct GetUserParams {
    /// User ID (required)
    #[serde(rename = "id")]
    pub user_id: i64,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ListUserGroupsParams {
    /// Search keyword for group name
    pub query: String,
    /// Maximum number of groups to return (default 1500)
    pub limit: i64,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(default)]
pub struct GetUserGroupParams {
    /// User group ID (required)
    #[serde(rename = "id")]
    pub group_id: i64,
}

pub struct ListUsersTool;

impl ListUsersTool {
    pub const NAME: &'static str = "list_users";
    pub const TITLE: &'static str = "List Users";
    pub const DESCRIPTION: &'static str = "List users with optional filters";

    pub async fn execute(
        get_client: &GetClientFn,
        ctx: &CallContext,
        params: ListUsersParams,
    ) -> CallToolResult {
        if let Err(e) = validate_pagination(params.limit, params.page) {
            return invalid_input(e);
        }
        let query = Query::new()
            .text("query", &params.query)
            .positive("limit", params.limit)
            .positive("p", params.page)
            .build();
        fetch::<PageResp<User>>(get_client, ctx, "/api/n9e/users", query).await
    }

    pub fn to_tool() -> Tool {
        read_tool::<ListUsersParams>(Self::NAME, Self::TITLE, Self::DESCRIPTION)
    }

    pub fn server_tool(get_client: GetClientFn) -> ServerTool {
        ServerTool::new(
            Self::to_tool(),
            make_tool_handler(move |ctx, _req, params: ListUsersParams| {
                let get_client = get_client.clone();
                async move { Ok(Self::execute(&get_client, &ctx, params).await) }
            }),
        )
    }
}

pub struct GetUserTool;

impl GetUserTool {
    pub const NAME: &'static str = "get_user";
    pub const TITLE: &'static str = "Get User";
    pub const DESCRIPTION: &'static str = "Get details of a specific user by ID";

    pub async fn execute(
        get_client: &GetClientFn,
        ctx: &CallContext,
        params: GetUserParams,
    ) -> CallToolResult {
        if let Err(e) = require_id("id", params.user_id) {
            return invalid_input(e);
        }
        let path = format!("/api/n9e/user/{}/profile", params.user_id);
        fetch::<User>(get_client, ctx, &path, None).await
    }

    pub fn to_tool() -> Tool {
        read_tool::<GetUserParams>(Self::NAME, Self::TITLE, Self::DESCRIPTION)
    }

    pub fn server_tool(get_client: GetClientFn) -> ServerTool {
        ServerTool::new(
            Self::to_tool(),
            make_tool_handler(move |ctx, _req, params: GetUserParams| {
                let get_client = get_client.clone();
                async move { Ok(Self::execute(&get_client, &ctx, params).await) }
            }),
        )
    }
}

pub struct ListUserGroupsTool;

impl ListUserGroupsTool {
    pub const NAME: &'static str = "list_user_groups";
    pub const TITLE: &'static str = "List User Groups";
    pub const DESCRIPTION: &'static str =
        "List user groups/teams that the current user has access to";

    pub async fn execute(
        get_client: &GetClientFn,
        ctx: &CallContext,
        params: ListUserGroupsParams,
    ) -> CallToolResult {
        if let Err(e) = validate_pagination(params.limit, 0) {
            return invalid_input(e);
        }
        let query = Query::new()
            .text("query", &params.query)
            .positive("limit", params.limit)
            .build();
        fetch::<Vec<UserGroup>>(get_client, ctx, "/api/n9e/user-groups", query).await
    }

    pub fn to_tool() -> Tool {
        read_tool::<ListUserGroupsParams>(Self::NAME, Self::TITLE, Self::DESCRIPTION)
    }

    pub fn server_tool(get_client: GetClientFn) -> ServerTool {
        ServerTool::new(
            Self::to_tool(),
            make_tool_handler(move |ctx, _req, params: ListUserGroupsParams| {
                let get_client = get_client.clone();
                async move { Ok(Self::execute(&get_client, &ctx, params).await) }
            }),
        )
    }
}

/// Fetches a user group with its members.
pub struct GetUserGroupTool;

impl GetUserGroupTool {
    pub const NAME: &'static str = "get_user_group";
    pub const TITLE: &'static str = "Get User Group";
    pub const DESCRIPTION: &'static str =
        "Get details of a specific user group including its members";

    pub async fn execute(
        get_client: &GetClientFn,
        ctx: &CallContext,
        params: GetUserGroupParams,
    ) -> CallToolResult {
        if let Err(e) = require_id("id", params.group_id) {
            return invalid_input(e);
        }
        let path = format!("/api/n9e/user-group/{}", params.group_id);
        fetch::<UserGroupDetail>(get_client, ctx, &path, None).await
    }

    pub fn to_tool() -> Tool {
        read_tool::<GetUserGroupParams>(Self::NAME, Self::TITLE, Self::DESCRIPTION)
    }

    pub fn server_tool(get_client: GetClientFn) -> ServerTool {
        ServerTool::new(
            Self::to_tool(),
            make_tool_handler(move |ctx, _req, params: GetUserGroupParams| {
                let get_client = get_client.clone();
                async move { Ok(Self::execute(&get_client, &ctx, params).await) }
            }),
        )
    }
}
