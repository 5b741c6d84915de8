//! Common utilities shared across Nightingale tools.
//!
//! Tool metadata builders, query parameter assembly, and the fetch helper that
//! every read tool ends with.

use std::sync::Arc;

use rmcp::handler::server::tool::cached_schema_for_type;
use rmcp::model::{CallToolResult, Tool, ToolAnnotations};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::client::{self, CallContext, GetClientFn, N9eClient, QueryParams};
use crate::domains::tools::error::ValidationError;
use crate::domains::tools::handlers::{error_result, json_result};

/// Reported when the server did not inject a client into the invocation.
pub const NO_CLIENT: &str = "failed to get n9e client from context";

/// Input for tools without parameters.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct NoParams {}

fn tool<P: JsonSchema + 'static>(
    name: &'static str,
    title: &'static str,
    description: &'static str,
    annotations: ToolAnnotations,
) -> Tool {
    Tool {
        name: name.into(),
        description: Some(description.into()),
        input_schema: cached_schema_for_type::<P>(),
        annotations: Some(annotations),
        output_schema: None,
        icons: None,
        meta: None,
        title: Some(title.into()),
    }
}

/// Metadata for a tool that never mutates remote state.
pub fn read_tool<P: JsonSchema + 'static>(
    name: &'static str,
    title: &'static str,
    description: &'static str,
) -> Tool {
    tool::<P>(
        name,
        title,
        description,
        ToolAnnotations {
            title: Some(title.into()),
            read_only_hint: Some(true),
            destructive_hint: None,
            idempotent_hint: None,
            open_world_hint: None,
        },
    )
}

/// Metadata for a tool that creates or updates remote state.
pub fn write_tool<P: JsonSchema + 'static>(
    name: &'static str,
    title: &'static str,
    description: &'static str,
) -> Tool {
    tool::<P>(
        name,
        title,
        description,
        ToolAnnotations {
            title: Some(title.into()),
            read_only_hint: Some(false),
            destructive_hint: Some(false),
            idempotent_hint: None,
            open_world_hint: None,
        },
    )
}

/// Error result for a parameter that failed validation.
pub fn invalid_input(err: ValidationError) -> CallToolResult {
    error_result(format!("invalid input: {}", err))
}

/// Look up the injected client, or produce the error result to return.
pub fn require_client(
    get_client: &GetClientFn,
    ctx: &CallContext,
) -> Result<Arc<N9eClient>, CallToolResult> {
    get_client(ctx).ok_or_else(|| error_result(NO_CLIENT))
}

/// GET `path` and render the payload, or the failure, as a tool result.
pub async fn fetch<T>(
    get_client: &GetClientFn,
    ctx: &CallContext,
    path: &str,
    params: Option<QueryParams>,
) -> CallToolResult
where
    T: DeserializeOwned + Default + Serialize,
{
    let client = match require_client(get_client, ctx) {
        Ok(client) => client,
        Err(result) => return result,
    };

    match client::get::<T>(&client, ctx, path, params.as_ref()).await {
        Ok(value) => json_result(&value),
        Err(e) => error_result(e.to_string()),
    }
}

// ============================================================================
// Query parameters
// ============================================================================

/// Collects query parameters, skipping unset values.
#[derive(Debug, Default)]
pub struct Query(QueryParams);

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `value` if it is positive.
    pub fn positive(mut self, key: &str, value: i64) -> Self {
        if value > 0 {
            self.0.insert(key.to_string(), value.to_string());
        }
        self
    }

    /// Add `value` if it is non-zero.
    pub fn non_zero(mut self, key: &str, value: i64) -> Self {
        if value != 0 {
            self.0.insert(key.to_string(), value.to_string());
        }
        self
    }

    /// Add `value` if it is non-empty.
    pub fn text(mut self, key: &str, value: &str) -> Self {
        if !value.is_empty() {
            self.0.insert(key.to_string(), value.to_string());
        }
        self
    }

    /// Add `true` if the flag is set.
    pub fn flag(mut self, key: &str, value: bool) -> Self {
        if value {
            self.0.insert(key.to_string(), "true".to_string());
        }
        self
    }

    /// The collected parameters, or `None` if nothing was set.
    pub fn build(self) -> Option<QueryParams> {
        if self.0.is_empty() { None } else { Some(self.0) }
    }
}
