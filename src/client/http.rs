//! HTTP access to the Nightingale API.
//!
//! [`N9eClient`] owns the connection pool and runs each request through the
//! retry loop: timeouts, temporary DNS failures and 5xx responses back off
//! exponentially, 429 honors `Retry-After`, other 4xx and refused connections
//! fail immediately. Cancellation and the invocation deadline are checked
//! before every attempt and interrupt both in-flight requests and backoff
//! sleeps.

use std::sync::RwLock;
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, USER_AGENT};
use reqwest::{Method, StatusCode, Url};
use tracing::{debug, instrument, warn};

use super::context::CallContext;
use super::error::{ClientError, ClientResult, preview};
use super::retry::{RetryPolicy, is_retryable};
use super::QueryParams;

/// Per-attempt timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Response bodies are cut off past this size.
pub const MAX_RESPONSE_SIZE: usize = 10 * 1024 * 1024;

/// Used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:17000";

/// Header carrying the API token.
pub const TOKEN_HEADER: &str = "X-User-Token";

/// Header carrying the platform's correlation id.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

const MAX_IDLE_PER_HOST: usize = 10;
const IDLE_TIMEOUT: Duration = Duration::from_secs(90);

/// A successful (2xx) response.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub body: Bytes,
    pub status: StatusCode,
    pub request_id: Option<String>,
}

/// Nightingale API client.
///
/// Created once at startup and shared through an `Arc`. Only the user agent
/// can change after construction.
pub struct N9eClient {
    http: reqwest::Client,
    base_url: Url,
    token: String,
    user_agent: RwLock<String>,
    retry: RetryPolicy,
}

impl std::fmt::Debug for N9eClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("N9eClient")
            .field("base_url", &self.base_url.as_str())
            .field("token", &"[REDACTED]")
            .field("user_agent", &self.user_agent())
            .field("retry", &self.retry)
            .finish()
    }
}

impl N9eClient {
    /// Create a client with the default retry policy.
    ///
    /// An empty `base_url` falls back to [`DEFAULT_BASE_URL`].
    pub fn new(token: &str, base_url: &str, user_agent: &str) -> ClientResult<Self> {
        Self::with_retry_policy(token, base_url, user_agent, RetryPolicy::default())
    }

    /// Create a client with a custom retry policy.
    pub fn with_retry_policy(
        token: &str,
        base_url: &str,
        user_agent: &str,
        retry: RetryPolicy,
    ) -> ClientResult<Self> {
        if token.is_empty() {
            return Err(ClientError::InvalidConfig("token is required".to_string()));
        }

        let base_url = if base_url.is_empty() {
            DEFAULT_BASE_URL
        } else {
            base_url
        };
        let base_url = Url::parse(base_url)
            .map_err(|e| ClientError::InvalidConfig(format!("invalid base URL: {}", e)))?;

        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .pool_max_idle_per_host(MAX_IDLE_PER_HOST)
            .pool_idle_timeout(IDLE_TIMEOUT)
            .build()
            .map_err(|e| ClientError::InvalidConfig(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            token: token.to_string(),
            user_agent: RwLock::new(user_agent.to_string()),
            retry,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    pub fn user_agent(&self) -> String {
        self.user_agent
            .read()
            .map(|ua| ua.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    pub fn set_user_agent(&self, user_agent: impl Into<String>) {
        let user_agent = user_agent.into();
        match self.user_agent.write() {
            Ok(mut ua) => *ua = user_agent,
            Err(poisoned) => *poisoned.into_inner() = user_agent,
        }
    }

    /// Run a request through the retry loop.
    ///
    /// Returns the body of the first 2xx response. Every failure path is a
    /// [`ClientError`]; exhausted retries wrap the last failure in
    /// [`ClientError::RetriesExhausted`].
    #[instrument(skip_all, fields(method = %method, path = %path))]
    pub async fn request(
        &self,
        ctx: &CallContext,
        method: Method,
        path: &str,
        params: Option<&QueryParams>,
        body: Option<&serde_json::Value>,
    ) -> ClientResult<RawResponse> {
        let url = self.resolve(path, params)?;
        let payload = body
            .map(serde_json::to_vec)
            .transpose()
            .map_err(ClientError::Serialize)?;

        let mut attempt: u32 = 0;
        loop {
            if let Some(err) = ctx.interruption() {
                return Err(err);
            }

            debug!(attempt, "sending request");
            let response = match self.send_once(ctx, &method, &url, payload.as_deref()).await {
                Ok(response) => response,
                Err(ClientError::Transport(err)) if is_retryable(&err) => {
                    let err = ClientError::Transport(err);
                    if !self.retry.can_retry(attempt) {
                        return Err(self.exhausted(attempt, err));
                    }
                    let delay = self.retry.backoff(attempt);
                    warn!(attempt, ?delay, error = %err, "transport error, retrying");
                    ctx.sleep(delay).await;
                    attempt += 1;
                    continue;
                }
                Err(err) => return Err(err),
            };

            let status = response.status();
            let headers = response.headers().clone();
            let request_id = request_id(&headers);
            let bytes = read_capped(ctx, response).await?;

            if status.is_success() {
                return Ok(RawResponse {
                    body: bytes,
                    status,
                    request_id,
                });
            }

            if status == StatusCode::TOO_MANY_REQUESTS {
                let err = ClientError::RateLimited { request_id };
                if !self.retry.can_retry(attempt) {
                    return Err(self.exhausted(attempt, err));
                }
                let delay = self.retry.rate_limit_delay(attempt, &headers);
                warn!(attempt, ?delay, "rate limited, retrying");
                ctx.sleep(delay).await;
                attempt += 1;
                continue;
            }

            if status.is_server_error() {
                let err = ClientError::Server {
                    status: status.as_u16(),
                    body: preview(&bytes),
                    request_id,
                };
                if !self.retry.can_retry(attempt) {
                    return Err(self.exhausted(attempt, err));
                }
                let delay = self.retry.backoff(attempt);
                warn!(attempt, ?delay, status = status.as_u16(), "server error, retrying");
                ctx.sleep(delay).await;
                attempt += 1;
                continue;
            }

            if status.is_client_error() {
                return Err(ClientError::Client {
                    status: status.as_u16(),
                    body: preview(&bytes),
                    request_id,
                });
            }

            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                request_id,
            });
        }
    }

    fn exhausted(&self, attempt: u32, last: ClientError) -> ClientError {
        warn!(attempts = attempt + 1, error = %last, "retries exhausted");
        ClientError::RetriesExhausted {
            attempts: attempt + 1,
            last: Box::new(last),
        }
    }

    /// Replace the base URL's path with `path`.
    ///
    /// `path` is a path only: `?` and `#` in it are percent-encoded rather
    /// than starting a query or fragment.
    fn resolve(&self, path: &str, params: Option<&QueryParams>) -> ClientResult<Url> {
        if !path.starts_with('/') {
            return Err(ClientError::InvalidPath {
                path: path.to_string(),
                reason: "path must be absolute".to_string(),
            });
        }
        let mut url = self.base_url.clone();
        url.set_fragment(None);
        url.set_path(path);

        match params {
            Some(params) if !params.is_empty() => {
                let query =
                    serde_urlencoded::to_string(params).map_err(|e| ClientError::InvalidPath {
                        path: path.to_string(),
                        reason: format!("failed to encode query: {}", e),
                    })?;
                url.set_query(Some(&query));
            }
            _ => url.set_query(None),
        }

        Ok(url)
    }

    async fn send_once(
        &self,
        ctx: &CallContext,
        method: &Method,
        url: &Url,
        payload: Option<&[u8]>,
    ) -> ClientResult<reqwest::Response> {
        let mut request = self
            .http
            .request(method.clone(), url.clone())
            .header(TOKEN_HEADER, &self.token)
            .header(ACCEPT, "application/json");

        let user_agent = self.user_agent();
        if !user_agent.is_empty() {
            request = request.header(USER_AGENT, user_agent);
        }

        if let Some(payload) = payload {
            request = request
                .header(CONTENT_TYPE, "application/json")
                .body(payload.to_vec());
        }

        tokio::select! {
            result = request.send() => result.map_err(ClientError::Transport),
            err = ctx.interrupted() => Err(err),
        }
    }
}

fn request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Read at most [`MAX_RESPONSE_SIZE`] bytes of the body.
async fn read_capped(ctx: &CallContext, mut response: reqwest::Response) -> ClientResult<Bytes> {
    let mut buf = BytesMut::new();
    loop {
        let chunk = tokio::select! {
            chunk = response.chunk() => chunk.map_err(ClientError::ReadBody)?,
            err = ctx.interrupted() => return Err(err),
        };
        let Some(chunk) = chunk else { break };

        let remaining = MAX_RESPONSE_SIZE - buf.len();
        if chunk.len() >= remaining {
            buf.extend_from_slice(&chunk[..remaining]);
            break;
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf.freeze())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use axum::Router;
    use axum::extract::State;
    use axum::http::{HeaderMap as AxumHeaders, StatusCode as AxumStatus};
    use axum::routing::any;
    use std::sync::Arc;
    use std::sync::Mutex;
    use std::time::Instant;
    use tokio_util::sync::CancellationToken;

    /// Serve `router` on an ephemeral local port and return its base URL.
    pub(crate) async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    pub(crate) fn fast_client(base_url: &str) -> N9eClient {
        N9eClient::with_retry_policy(
            "secret-token",
            base_url,
            "n9e-mcp-server/test",
            RetryPolicy {
                max_retries: 3,
                base_delay: Duration::from_millis(20),
            },
        )
        .unwrap()
    }

    type Hits = Arc<Mutex<Vec<Instant>>>;

    fn status_router(status: AxumStatus, hits: Hits) -> Router {
        Router::new()
            .route(
                "/{*path}",
                any(move |State(hits): State<Hits>| async move {
                    hits.lock().unwrap().push(Instant::now());
                    (status, "boom")
                }),
            )
            .with_state(hits)
    }

    #[tokio::test]
    async fn test_503_exhausts_four_attempts() {
        let hits: Hits = Arc::default();
        let url = serve(status_router(AxumStatus::SERVICE_UNAVAILABLE, hits.clone())).await;
        let client = fast_client(&url);

        let err = client
            .request(&CallContext::new(), Method::GET, "/api/n9e/targets", None, None)
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::RetriesExhausted { attempts: 4, .. }));
        assert_eq!(err.status(), Some(503));

        let hits = hits.lock().unwrap();
        assert_eq!(hits.len(), 4);
        for (attempt, pair) in hits.windows(2).enumerate() {
            let gap = pair[1] - pair[0];
            let floor = Duration::from_millis(20) * (1 << attempt);
            assert!(gap >= floor, "attempt {} gap {:?} < {:?}", attempt, gap, floor);
        }
    }

    #[tokio::test]
    async fn test_400_is_not_retried() {
        let hits: Hits = Arc::default();
        let url = serve(status_router(AxumStatus::BAD_REQUEST, hits.clone())).await;
        let client = fast_client(&url);

        let err = client
            .request(&CallContext::new(), Method::GET, "/api/n9e/targets", None, None)
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Client { status: 400, .. }));
        assert!(err.to_string().contains("client error: 400 boom"));
        assert_eq!(hits.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_429_honors_retry_after() {
        let hits: Hits = Arc::default();
        let router = Router::new()
            .route(
                "/{*path}",
                any(|State(hits): State<Hits>| async move {
                    let mut hits = hits.lock().unwrap();
                    hits.push(Instant::now());
                    if hits.len() == 1 {
                        (AxumStatus::TOO_MANY_REQUESTS, [("retry-after", "2")], "slow down")
                    } else {
                        (AxumStatus::OK, [("x-request-id", "req-7")], r#"{"dat":[],"err":""}"#)
                    }
                }),
            )
            .with_state(hits.clone());
        let url = serve(router).await;
        let client = fast_client(&url);

        let response = client
            .request(&CallContext::new(), Method::GET, "/api/n9e/busi-groups", None, None)
            .await
            .unwrap();

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.request_id.as_deref(), Some("req-7"));

        let hits = hits.lock().unwrap();
        assert_eq!(hits.len(), 2);
        assert!(hits[1] - hits[0] >= Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_429_exhausted() {
        let hits: Hits = Arc::default();
        let url = serve(status_router(AxumStatus::TOO_MANY_REQUESTS, hits.clone())).await;
        let client = fast_client(&url);

        let err = client
            .request(&CallContext::new(), Method::GET, "/api/n9e/users", None, None)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("rate limited (429), retries exhausted"));
        assert_eq!(hits.lock().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_headers_query_and_body_forwarded() {
        type Seen = Arc<Mutex<Option<(AxumHeaders, Option<String>, String)>>>;
        let seen: Seen = Arc::default();
        let router = Router::new()
            .route(
                "/{*path}",
                any(
                    |State(seen): State<Seen>,
                     axum::extract::RawQuery(query): axum::extract::RawQuery,
                     headers: AxumHeaders,
                     body: String| async move {
                        *seen.lock().unwrap() = Some((headers, query, body));
                        r#"{"dat":1,"err":""}"#
                    },
                ),
            )
            .with_state(seen.clone());
        let url = serve(router).await;
        let client = fast_client(&url);

        let mut params = QueryParams::new();
        params.insert("query".to_string(), "web 01".to_string());
        params.insert("limit".to_string(), "5".to_string());
        let body = serde_json::json!({ "cause": "deploy" });

        client
            .request(
                &CallContext::new(),
                Method::POST,
                "/api/n9e/busi-group/1/alert-mutes",
                Some(&params),
                Some(&body),
            )
            .await
            .unwrap();

        let (headers, query, received) = seen.lock().unwrap().take().unwrap();
        assert_eq!(headers["x-user-token"], "secret-token");
        assert_eq!(headers["accept"], "application/json");
        assert_eq!(headers["content-type"], "application/json");
        assert_eq!(headers["user-agent"], "n9e-mcp-server/test");
        assert_eq!(query.as_deref(), Some("limit=5&query=web+01"));
        assert_eq!(received, r#"{"cause":"deploy"}"#);
    }

    #[tokio::test]
    async fn test_canceled_context_sends_nothing() {
        let hits: Hits = Arc::default();
        let url = serve(status_router(AxumStatus::OK, hits.clone())).await;
        let client = fast_client(&url);

        let ct = CancellationToken::new();
        ct.cancel();
        let ctx = CallContext::new().with_cancellation(ct);

        let err = client
            .request(&ctx, Method::GET, "/api/n9e/users", None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Canceled));
        assert!(hits.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_refused_connection_is_not_retried() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = N9eClient::with_retry_policy(
            "secret-token",
            &format!("http://{}", addr),
            "n9e-mcp-server/test",
            RetryPolicy {
                max_retries: 3,
                base_delay: Duration::from_secs(5),
            },
        )
        .unwrap();

        let started = Instant::now();
        let err = client
            .request(&CallContext::new(), Method::GET, "/api/n9e/users", None, None)
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Transport(_)), "got {:?}", err);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_deadline_cuts_backoff_short() {
        let hits: Hits = Arc::default();
        let url = serve(status_router(AxumStatus::BAD_GATEWAY, hits.clone())).await;
        let client = N9eClient::new("secret-token", &url, "test").unwrap();

        let ctx = CallContext::new().with_timeout(Duration::from_millis(200));
        let started = Instant::now();
        let err = client
            .request(&ctx, Method::GET, "/api/n9e/users", None, None)
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::DeadlineExceeded));
        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(hits.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_body_is_capped() {
        let router = Router::new().route(
            "/{*path}",
            any(|| async { vec![b'x'; MAX_RESPONSE_SIZE + 4096] }),
        );
        let url = serve(router).await;
        let client = fast_client(&url);

        let raw = client
            .request(&CallContext::new(), Method::GET, "/big", None, None)
            .await
            .unwrap();
        assert_eq!(raw.body.len(), MAX_RESPONSE_SIZE);
    }

    #[test]
    fn test_new_rejects_empty_token() {
        let err = N9eClient::new("", "http://localhost:17000", "ua").unwrap_err();
        assert!(err.to_string().contains("token is required"));
    }

    #[test]
    fn test_new_defaults_base_url() {
        let client = N9eClient::new("t", "", "ua").unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:17000/");
    }

    #[test]
    fn test_new_rejects_bad_base_url() {
        assert!(N9eClient::new("t", "not a url", "ua").is_err());
    }

    #[test]
    fn test_set_user_agent() {
        let client = N9eClient::new("t", "", "first").unwrap();
        client.set_user_agent("second");
        assert_eq!(client.user_agent(), "second");
    }

    #[test]
    fn test_debug_redacts_token() {
        let client = N9eClient::new("super-secret", "", "ua").unwrap();
        let debug = format!("{:?}", client);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_resolve_replaces_path_and_sets_query() {
        let client = N9eClient::new("t", "http://n9e.example.com:17000/ui/", "ua").unwrap();
        let mut params = QueryParams::new();
        params.insert("p".to_string(), "2".to_string());
        let url = client.resolve("/api/n9e/targets", Some(&params)).unwrap();
        assert_eq!(url.as_str(), "http://n9e.example.com:17000/api/n9e/targets?p=2");
    }

    #[test]
    fn test_resolve_escapes_query_and_fragment_markers() {
        let client = N9eClient::new("t", "http://n9e.example.com:17000", "ua").unwrap();

        let url = client.resolve("/api/n9e/event-pipeline-execution/abc?x=1", None).unwrap();
        assert_eq!(url.path(), "/api/n9e/event-pipeline-execution/abc%3Fx=1");
        assert_eq!(url.query(), None);

        let url = client.resolve("/api/n9e/event-pipeline-execution/abc#frag", None).unwrap();
        assert_eq!(url.path(), "/api/n9e/event-pipeline-execution/abc%23frag");
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_resolve_rejects_relative_path() {
        let client = N9eClient::new("t", "", "ua").unwrap();
        assert!(matches!(
            client.resolve("api/n9e/targets", None),
            Err(ClientError::InvalidPath { .. })
        ));
    }
}
