//! Nightingale API data model.
//!
//! Field names follow the platform's JSON. Every struct tolerates missing
//! fields, and collection fields also accept `null`. Loosely typed fields the
//! platform changes between versions are kept as raw JSON.

use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Deserialize `null` as the type's default.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdName {
    pub id: i64,
    pub name: String,
}

// ============================================================================
// Alerts
// ============================================================================

/// A currently firing alert event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertCurEvent {
    pub id: i64,
    pub hash: String,
    pub cate: String,
    pub cluster: String,
    pub datasource_id: i64,

    pub rule_id: i64,
    pub rule_name: String,
    pub rule_note: String,
    pub rule_prod: String,
    pub rule_algo: String,
    pub severity: i64,

    pub prom_ql: String,
    pub prom_for_duration: i64,
    pub prom_eval_interval: i64,

    #[serde(deserialize_with = "nullable")]
    pub callbacks: Vec<String>,
    pub runbook_url: String,
    pub notify_recovered: i64,
    #[serde(deserialize_with = "nullable")]
    pub notify_channels: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub notify_groups: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub notify_groups_obj: Vec<IdName>,

    pub target_ident: String,
    pub target_note: String,

    pub trigger_time: i64,
    pub trigger_value: String,
    pub trigger_values: String,
    pub first_trigger_time: i64,

    #[serde(deserialize_with = "nullable")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub tags_map: HashMap<String, String>,
    #[serde(deserialize_with = "nullable")]
    pub original_tags: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub annotations: HashMap<String, String>,

    pub group_id: i64,
    pub group_name: String,

    pub status: i64,
    pub claimant: String,
    pub notify_cur_number: i64,

    #[serde(skip_serializing_if = "Value::is_null")]
    pub extra_config: Value,
    #[serde(deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub extra_info: Vec<String>,
    #[serde(deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub extra_info_map: Vec<serde_json::Map<String, Value>>,
}

/// A historical alert event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertHisEvent {
    #[serde(flatten)]
    pub event: AlertCurEvent,
    pub is_recovered: i64,
    pub recover_time: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertRule {
    pub id: i64,
    pub group_id: i64,
    pub cate: String,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub datasource_ids: Value,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub datasource_queries: Value,
    pub cluster: String,
    pub name: String,
    pub note: String,
    pub prod: String,
    pub algorithm: String,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub algo_params: Value,
    pub delay: i64,
    pub severity: i64,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub severities: Value,
    pub disabled: i64,
    pub prom_for_duration: i64,
    pub prom_ql: String,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub rule_config: Value,
    pub prom_eval_interval: i64,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub enable_stime: Value,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub enable_stimes: Value,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub enable_etime: Value,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub enable_etimes: Value,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub enable_days_of_week: Value,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub enable_days_of_weeks: Value,
    pub enable_in_bg: i64,
    pub notify_recovered: i64,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub notify_channels: Value,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub notify_groups: Value,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub notify_groups_obj: Value,
    pub notify_repeat_step: i64,
    pub notify_max_number: i64,
    pub notify_version: i64,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub notify_rule_ids: Value,
    pub recover_duration: i64,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub callbacks: Value,
    pub runbook_url: String,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub append_tags: Value,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub annotations: Value,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub extra_config: Value,
    pub create_at: i64,
    pub create_by: String,
    pub update_at: i64,
    pub update_by: String,
}

// ============================================================================
// Notification
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyRule {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub enable: bool,
    #[serde(deserialize_with = "nullable")]
    pub user_group_ids: Vec<i64>,
    #[serde(deserialize_with = "nullable")]
    pub pipeline_configs: Vec<PipelineConfig>,
    #[serde(deserialize_with = "nullable")]
    pub notify_configs: Vec<NotifyConfig>,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub extra_config: Value,
    pub create_at: i64,
    pub create_by: String,
    pub update_at: i64,
    pub update_by: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub pipeline_id: i64,
    pub enable: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    pub channel_id: i64,
    pub template_id: i64,
    #[serde(deserialize_with = "nullable")]
    pub params: serde_json::Map<String, Value>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(deserialize_with = "nullable")]
    pub severities: Vec<i64>,
    #[serde(deserialize_with = "nullable")]
    pub time_ranges: Vec<TimeRange>,
    #[serde(deserialize_with = "nullable")]
    pub label_keys: Vec<TagFilter>,
    #[serde(deserialize_with = "nullable")]
    pub attributes: Vec<TagFilter>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeRange {
    pub start_time: String,
    pub end_time: String,
    #[serde(deserialize_with = "nullable")]
    pub weekdays: Vec<i64>,
}

/// Label matcher used by mutes, notify rules and pipelines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TagFilter {
    /// Tag key
    pub key: String,
    /// Operator: ==, !=, in, not in, =~, !~
    pub func: String,
    /// Tag value (for 'in'/'not in', space-separated values)
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertSubscribe {
    pub id: i64,
    pub name: String,
    pub disabled: i64,
    pub group_id: i64,
    pub prod: String,
    pub cate: String,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub datasource_ids: Value,
    pub cluster: String,
    pub rule_id: i64,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub rule_ids: Value,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub rule_name: String,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub rule_names: Value,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub severities: Value,
    pub for_duration: i64,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub tags: Value,
    pub redefine_severity: i64,
    pub new_severity: i64,
    pub redefine_channels: i64,
    pub new_channels: String,
    pub user_group_ids: String,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub user_groups: Value,
    pub redefine_webhooks: i64,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub webhooks: Value,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub extra_config: Value,
    pub note: String,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub busi_groups: Value,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub notify_rule_ids: Value,
    pub notify_version: i64,
    pub create_at: i64,
    pub create_by: String,
    pub update_at: i64,
    pub update_by: String,
}

// ============================================================================
// Targets and datasources
// ============================================================================

/// A monitored host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Target {
    pub id: i64,
    pub group_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_obj: Option<BusiGroup>,
    pub ident: String,
    pub note: String,
    #[serde(deserialize_with = "nullable")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub tags_map: HashMap<String, String>,
    pub host_ip: String,
    pub agent_version: String,
    pub target_up: i64,
    pub engine_name: String,
    pub unix_time: i64,
    pub update_at: i64,
    pub offset: i64,
    pub os: String,
    pub arch: String,
    pub remote_addr: String,
    pub cpu_num: i64,
    pub mem_size: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Datasource {
    pub id: i64,
    pub name: String,
    pub identifier: String,
    pub description: String,
    pub plugin_id: i64,
    pub plugin_type: String,
    pub plugin_type_name: String,
    pub category: String,
    pub cluster_name: String,
    #[serde(deserialize_with = "nullable")]
    pub settings: serde_json::Map<String, Value>,
    pub status: String,
    pub http: DatasourceHttp,
    pub auth: DatasourceAuth,
    pub is_default: bool,
    pub created_at: i64,
    pub created_by: String,
    pub updated_at: i64,
    pub updated_by: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasourceHttp {
    pub timeout: i64,
    pub dial_timeout: i64,
    pub max_idle_conns_per_host: i64,
    pub url: String,
    #[serde(deserialize_with = "nullable")]
    pub urls: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub headers: HashMap<String, String>,
    pub tls: DatasourceTls,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasourceTls {
    pub skip_tls_verify: bool,
    pub server_name: String,
    pub min_version: String,
    pub max_version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasourceAuth {
    pub basic_auth: bool,
    pub basic_auth_user: String,
    pub basic_auth_password: String,
}

// ============================================================================
// Mutes and groups
// ============================================================================

/// An alert mute (silence) rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertMute {
    pub id: i64,
    pub group_id: i64,
    pub note: String,
    pub cate: String,
    pub prod: String,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub datasource_ids: Value,
    pub cluster: String,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub tags: Value,
    pub cause: String,
    pub btime: i64,
    pub etime: i64,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub severities: Value,
    pub disabled: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub activated: i64,
    pub mute_time_type: i64,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub periodic_mutes: Value,
    pub create_at: i64,
    pub create_by: String,
    pub update_at: i64,
    pub update_by: String,
}

/// One window of a periodic mute.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PeriodicMute {
    /// Start time in HH:MM format
    pub enable_stime: String,
    /// End time in HH:MM format
    pub enable_etime: String,
    /// Days of week (0-6, space-separated, 0=Sunday)
    pub enable_days_of_week: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusiGroup {
    pub id: i64,
    pub name: String,
    pub label_enable: i64,
    pub label_value: String,
    pub create_at: i64,
    pub create_by: String,
    pub update_at: i64,
    pub update_by: String,
}

// ============================================================================
// Event pipelines
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventPipeline {
    pub id: i64,
    pub name: String,
    pub typ: String,
    pub use_case: String,
    pub trigger_mode: String,
    pub disabled: bool,
    #[serde(deserialize_with = "nullable")]
    pub team_ids: Vec<i64>,
    #[serde(deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub team_names: Vec<String>,
    pub description: String,
    pub filter_enable: bool,
    #[serde(deserialize_with = "nullable")]
    pub label_filters: Vec<TagFilter>,
    #[serde(rename = "attribute_filters", deserialize_with = "nullable")]
    pub attr_filters: Vec<TagFilter>,
    #[serde(rename = "processors", deserialize_with = "nullable")]
    pub processor_configs: Vec<ProcessorConfig>,
    #[serde(deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<WorkflowNode>,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub connections: Value,
    #[serde(deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<InputVariable>,
    pub create_at: i64,
    pub create_by: String,
    pub update_at: i64,
    pub update_by: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    pub typ: String,
    pub config: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub config: Value,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub position: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputVariable {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub default: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventPipelineExecution {
    pub id: String,
    pub pipeline_id: i64,
    pub pipeline_name: String,
    pub event_id: i64,
    pub mode: String,
    pub status: String,
    pub node_results: String,
    pub error_message: String,
    pub error_node: String,
    pub created_at: i64,
    pub finished_at: i64,
    pub duration_ms: i64,
    pub trigger_by: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub inputs_snapshot: String,
}

// ============================================================================
// Users
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub nickname: String,
    pub phone: String,
    pub email: String,
    pub portrait: String,
    #[serde(deserialize_with = "nullable")]
    pub roles: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub contacts: serde_json::Map<String, Value>,
    pub maintainer: i64,
    pub create_at: i64,
    pub create_by: String,
    pub update_at: i64,
    pub update_by: String,
    pub belong: String,
    pub admin: bool,
    pub last_active_time: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserGroup {
    pub id: i64,
    pub name: String,
    pub note: String,
    pub create_at: i64,
    pub create_by: String,
    pub update_at: i64,
    pub update_by: String,
    #[serde(deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<User>,
    #[serde(deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub busi_groups: Vec<BusiGroup>,
}

/// A user group together with its members.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserGroupDetail {
    pub user_group: UserGroup,
    #[serde(deserialize_with = "nullable")]
    pub users: Vec<User>,
}

fn is_zero(v: &i64) -> bool {
    *v == 0
}
