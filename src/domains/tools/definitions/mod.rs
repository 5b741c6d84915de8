//! Tool definitions, one file per toolset.
//!
//! Each file exposes a `toolset(get_client)` constructor plus one unit struct
//! per tool carrying its name, metadata and `execute` logic.

pub mod alert_subscribes;
pub mod alerts;
pub mod busi_groups;
pub mod common;
pub mod datasource;
pub mod event_pipelines;
pub mod mutes;
pub mod notify_rules;
pub mod targets;
pub mod users;

pub use alert_subscribes::{
    GetAlertSubscribeTool, ListAlertSubscribesByGidsTool, ListAlertSubscribesTool,
};
pub use alerts::{
    GetActiveAlertTool, GetAlertRuleTool, GetHistoryAlertTool, ListActiveAlertsTool,
    ListAlertRulesTool, ListHistoryAlertsTool,
};
pub use busi_groups::ListBusiGroupsTool;
pub use datasource::ListDatasourcesTool;
pub use event_pipelines::{
    GetEventPipelineExecutionTool, GetEventPipelineTool, ListAllEventPipelineExecutionsTool,
    ListEventPipelineExecutionsTool, ListEventPipelinesTool,
};
pub use mutes::{CreateMuteTool, GetMuteTool, ListMutesTool, UpdateMuteTool};
pub use notify_rules::{GetNotifyRuleTool, ListNotifyRulesTool};
pub use targets::ListTargetsTool;
pub use users::{GetUserGroupTool, GetUserTool, ListUserGroupsTool, ListUsersTool};
