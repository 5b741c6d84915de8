//! Error types for the Nightingale API client.
//!
//! Two families live here: [`ClientError`] covers everything that can go
//! wrong between building a request and decoding its envelope, and
//! [`ApiError`] is the structured business error the platform reports inside
//! an otherwise successful HTTP response.

use std::fmt;

use thiserror::Error;

use super::QueryParams;

/// Outbound bodies longer than this (as JSON) are truncated in error output.
const BODY_SUMMARY_LIMIT: usize = 200;

/// Raw response bodies are previewed up to this many characters.
const PREVIEW_LIMIT: usize = 200;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors produced by [`N9eClient`](super::N9eClient).
#[derive(Debug, Error)]
pub enum ClientError {
    /// The invocation was canceled before or during the request.
    #[error("request canceled")]
    Canceled,

    /// The invocation deadline passed before or during the request.
    #[error("request timeout: deadline exceeded")]
    DeadlineExceeded,

    /// The client could not be constructed.
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),

    /// The request body could not be serialized.
    #[error("failed to marshal request body: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The request path could not be resolved against the base URL.
    #[error("invalid request path {path}: {reason}")]
    InvalidPath { path: String, reason: String },

    /// Network-level failure (connect, timeout, broken connection).
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The response body could not be read.
    #[error("failed to read response: {0}")]
    ReadBody(#[source] reqwest::Error),

    /// HTTP 429 on the final attempt.
    #[error("rate limited (429), retries exhausted")]
    RateLimited { request_id: Option<String> },

    /// HTTP 5xx.
    #[error("server error: {status} {body}")]
    Server {
        status: u16,
        body: String,
        request_id: Option<String>,
    },

    /// HTTP 4xx other than 429. Never retried.
    #[error("client error: {status} {body}")]
    Client {
        status: u16,
        body: String,
        request_id: Option<String>,
    },

    /// Any other non-2xx status.
    #[error("unexpected status: {status}")]
    UnexpectedStatus {
        status: u16,
        request_id: Option<String>,
    },

    /// The retry budget ran out; wraps the last observed failure.
    #[error("max retries exceeded after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<ClientError>,
    },

    /// The response body was not a valid envelope.
    #[error(
        "failed to unmarshal response (check N9E_BASE_URL and N9E_TOKEN): {source}, response preview: {preview}"
    )]
    Decode {
        #[source]
        source: serde_json::Error,
        preview: String,
    },

    /// The envelope carried a business error.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl ClientError {
    /// HTTP status associated with this error, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RateLimited { .. } => Some(429),
            Self::Server { status, .. }
            | Self::Client { status, .. }
            | Self::UnexpectedStatus { status, .. } => Some(*status),
            Self::RetriesExhausted { last, .. } => last.status(),
            Self::Api(api) => Some(api.status_code),
            _ => None,
        }
    }

    /// Correlation id returned by the platform, if any.
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Self::RateLimited { request_id }
            | Self::Server { request_id, .. }
            | Self::Client { request_id, .. }
            | Self::UnexpectedStatus { request_id, .. } => request_id.as_deref(),
            Self::RetriesExhausted { last, .. } => last.request_id(),
            Self::Api(api) => api.request_id.as_deref(),
            _ => None,
        }
    }

    /// Whether this is a business error reported inside the envelope.
    pub fn is_api_error(&self) -> bool {
        self.api_error().is_some()
    }

    /// Borrow the structured business error, if this is one.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(api) => Some(api),
            _ => None,
        }
    }

    /// Build a decode error with a bounded preview of the raw body.
    pub(crate) fn decode(source: serde_json::Error, raw: &[u8]) -> Self {
        Self::Decode {
            source,
            preview: preview(raw),
        }
    }
}

/// What was sent with the failing request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestSummary {
    /// Nothing besides the path.
    None,
    /// Query parameters of a GET.
    Params(QueryParams),
    /// JSON body of a POST/PUT/DELETE.
    Body(serde_json::Value),
}

/// Business error reported by the platform through the envelope `err` field.
///
/// Carries the full request context so the failure can be matched against
/// server logs. The credential is never part of it.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub method: String,
    pub path: String,
    pub request: RequestSummary,
    pub status_code: u16,
    pub err_msg: String,
    pub request_id: Option<String>,
}

impl std::error::Error for ApiError {}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "n9e api error: {} {} status={} err={:?}",
            self.method, self.path, self.status_code, self.err_msg
        )?;

        match &self.request {
            RequestSummary::None => {}
            RequestSummary::Params(params) if params.is_empty() => {}
            RequestSummary::Params(params) => {
                let encoded = serde_urlencoded::to_string(params).unwrap_or_default();
                write!(f, " params={}", encoded)?;
            }
            RequestSummary::Body(body) => {
                write!(f, " body={}", summarize_body(body))?;
            }
        }

        if let Some(request_id) = &self.request_id {
            write!(f, " request_id={}", request_id)?;
        }

        Ok(())
    }
}

/// JSON form of an outbound body, cut at [`BODY_SUMMARY_LIMIT`] bytes.
pub fn summarize_body(body: &serde_json::Value) -> String {
    let json = body.to_string();
    if json.len() <= BODY_SUMMARY_LIMIT {
        return json;
    }
    format!("{}...(truncated)", floor_char_boundary(&json, BODY_SUMMARY_LIMIT))
}

/// First [`PREVIEW_LIMIT`] characters of a raw body, lossily decoded.
pub fn preview(raw: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw);
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(PREVIEW_LIMIT).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

fn floor_char_boundary(s: &str, max: usize) -> &str {
    let mut end = max.min(s.len());
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn api_error(request: RequestSummary) -> ApiError {
        ApiError {
            method: "GET".to_string(),
            path: "/api/n9e/busi-groups".to_string(),
            request,
            status_code: 200,
            err_msg: "busi-group not found".to_string(),
            request_id: Some("req-42".to_string()),
        }
    }

    #[test]
    fn test_api_error_display_with_params() {
        let mut params = QueryParams::new();
        params.insert("limit".to_string(), "20".to_string());
        params.insert("query".to_string(), "cpu high".to_string());

        let text = api_error(RequestSummary::Params(params)).to_string();
        assert!(text.starts_with("n9e api error: GET /api/n9e/busi-groups status=200"));
        assert!(text.contains(r#"err="busi-group not found""#));
        assert!(text.contains("params=limit=20&query=cpu+high"));
        assert!(text.ends_with("request_id=req-42"));
    }

    #[test]
    fn test_api_error_body_truncated() {
        let body = json!({ "cause": "x".repeat(500) });
        let text = api_error(RequestSummary::Body(body)).to_string();
        assert!(text.contains("...(truncated)"));
        assert!(!text.contains(&"x".repeat(300)));
    }

    #[test]
    fn test_short_body_not_truncated() {
        let body = json!({ "note": "maintenance" });
        assert_eq!(summarize_body(&body), r#"{"note":"maintenance"}"#);
    }

    #[test]
    fn test_summarize_respects_char_boundaries() {
        let body = json!({ "note": "é".repeat(300) });
        let summary = summarize_body(&body);
        assert!(summary.ends_with("...(truncated)"));
    }

    #[test]
    fn test_preview_bounded() {
        let raw = "<html>".repeat(100);
        let p = preview(raw.as_bytes());
        assert_eq!(p.chars().count(), PREVIEW_LIMIT + 3);
        assert!(p.ends_with("..."));

        assert_eq!(preview(b"short"), "short");
    }

    #[test]
    fn test_status_and_request_id_through_exhaustion() {
        let err = ClientError::RetriesExhausted {
            attempts: 4,
            last: Box::new(ClientError::Server {
                status: 503,
                body: "unavailable".to_string(),
                request_id: Some("abc".to_string()),
            }),
        };
        assert_eq!(err.status(), Some(503));
        assert_eq!(err.request_id(), Some("abc"));
        assert!(err.to_string().contains("server error: 503 unavailable"));
    }
}
