//! Toolset and validation error types.

use thiserror::Error;

/// Errors raised while configuring the toolset group.
///
/// All of them are startup failures: no tool is exposed once one occurs.
#[derive(Debug, Error)]
pub enum ToolsetError {
    /// A requested toolset name is not registered.
    #[error("unknown toolset: {0}")]
    UnknownToolset(String),

    /// Two registered tools share a name.
    #[error("duplicate tool name: {0}")]
    DuplicateTool(String),
}

impl ToolsetError {
    /// Create a new "unknown toolset" error.
    pub fn unknown(name: impl Into<String>) -> Self {
        Self::UnknownToolset(name.into())
    }
}

/// A caller-supplied parameter failed validation.
///
/// Reported to the caller as an error-flagged result before any request is
/// sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("hours and stime/etime are mutually exclusive, use one or the other")]
    ExclusiveTimeRange,

    #[error("stime ({stime}) must be less than etime ({etime})")]
    InvertedTimeRange { stime: i64, etime: i64 },

    #[error("{field} must be >= 0, got {value}")]
    Negative { field: &'static str, value: i64 },

    #[error("invalid severity value: {0}, must be 1, 2, or 3")]
    Severity(String),

    #[error("invalid cate: {0}, valid values: prometheus, host, elasticsearch, loki, $all")]
    Cate(String),

    #[error("invalid rule_prod: {0}, valid values: host, metric, loki, anomaly")]
    RuleProd(String),

    #[error("invalid is_recovered: {0}, valid values: -1 (all), 0 (not recovered), 1 (recovered)")]
    IsRecovered(i64),

    /// A required identifier is missing or not positive.
    #[error("{0} is required and must be positive")]
    MissingId(&'static str),

    #[error("btime and etime are required for time range mode")]
    MuteWindowRequired,

    #[error("btime must be less than etime")]
    MuteWindowInverted,

    /// A required string field is empty.
    #[error("{0} is required")]
    Required(&'static str),
}
