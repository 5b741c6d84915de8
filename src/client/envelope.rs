//! Response envelope decoding.
//!
//! Every Nightingale endpoint answers with `{"dat": <payload>, "err": "..."}`.
//! A non-empty `err` is a business failure whatever the HTTP status was. The
//! four verb helpers share [`decode_envelope`] and differ only in what they
//! send.

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::context::CallContext;
use super::error::{ApiError, ClientError, ClientResult, RequestSummary};
use super::http::{N9eClient, RawResponse};
use super::QueryParams;

/// The platform's uniform response wrapper.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    #[serde(rename = "dat", default)]
    pub data: Option<T>,
    #[serde(rename = "err", default)]
    pub error: String,
}

/// Payload shape of paginated endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResp<T> {
    #[serde(default = "Vec::new")]
    pub list: Vec<T>,
    #[serde(default)]
    pub total: i64,
}

impl<T> Default for PageResp<T> {
    fn default() -> Self {
        Self {
            list: Vec::new(),
            total: 0,
        }
    }
}

/// Unwrap an envelope into `T`.
///
/// A `null` or missing `dat` yields `T::default()`.
pub fn decode_envelope<T>(
    method: &Method,
    path: &str,
    request: RequestSummary,
    response: &RawResponse,
) -> ClientResult<T>
where
    T: DeserializeOwned + Default,
{
    let envelope: Envelope<T> = serde_json::from_slice(&response.body)
        .map_err(|e| ClientError::decode(e, &response.body))?;

    if !envelope.error.is_empty() {
        return Err(ApiError {
            method: method.to_string(),
            path: path.to_string(),
            request,
            status_code: response.status.as_u16(),
            err_msg: envelope.error,
            request_id: response.request_id.clone(),
        }
        .into());
    }

    Ok(envelope.data.unwrap_or_default())
}

async fn call<T>(
    client: &N9eClient,
    ctx: &CallContext,
    method: Method,
    path: &str,
    params: Option<&QueryParams>,
    body: Option<serde_json::Value>,
) -> ClientResult<T>
where
    T: DeserializeOwned + Default,
{
    let response = client
        .request(ctx, method.clone(), path, params, body.as_ref())
        .await?;

    let request = match (params, body) {
        (_, Some(body)) => RequestSummary::Body(body),
        (Some(params), None) => RequestSummary::Params(params.clone()),
        (None, None) => RequestSummary::None,
    };

    decode_envelope(&method, path, request, &response)
}

fn to_body<B: Serialize + ?Sized>(body: &B) -> ClientResult<serde_json::Value> {
    serde_json::to_value(body).map_err(ClientError::Serialize)
}

/// GET `path` and decode the payload.
pub async fn get<T>(
    client: &N9eClient,
    ctx: &CallContext,
    path: &str,
    params: Option<&QueryParams>,
) -> ClientResult<T>
where
    T: DeserializeOwned + Default,
{
    call(client, ctx, Method::GET, path, params, None).await
}

/// POST `body` as JSON to `path` and decode the payload.
pub async fn post<T, B>(client: &N9eClient, ctx: &CallContext, path: &str, body: &B) -> ClientResult<T>
where
    T: DeserializeOwned + Default,
    B: Serialize + ?Sized,
{
    call(client, ctx, Method::POST, path, None, Some(to_body(body)?)).await
}

/// PUT `body` as JSON to `path` and decode the payload.
pub async fn put<T, B>(client: &N9eClient, ctx: &CallContext, path: &str, body: &B) -> ClientResult<T>
where
    T: DeserializeOwned + Default,
    B: Serialize + ?Sized,
{
    call(client, ctx, Method::PUT, path, None, Some(to_body(body)?)).await
}

/// DELETE `path`, optionally with a JSON body, and decode the payload.
pub async fn delete<T>(
    client: &N9eClient,
    ctx: &CallContext,
    path: &str,
    body: Option<&serde_json::Value>,
) -> ClientResult<T>
where
    T: DeserializeOwned + Default,
{
    call(client, ctx, Method::DELETE, path, None, body.cloned()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::http::tests::{fast_client, serve};
    use axum::Router;
    use axum::http::StatusCode as AxumStatus;
    use axum::routing::{get as get_route, post as post_route};
    use bytes::Bytes;
    use reqwest::StatusCode;

    fn raw(body: &str) -> RawResponse {
        RawResponse {
            body: Bytes::from(body.to_string()),
            status: StatusCode::OK,
            request_id: Some("rid-1".to_string()),
        }
    }

    #[test]
    fn test_decode_payload() {
        let page: PageResp<String> = decode_envelope(
            &Method::GET,
            "/api/n9e/targets",
            RequestSummary::None,
            &raw(r#"{"dat":{"list":["a","b"],"total":2},"err":""}"#),
        )
        .unwrap();
        assert_eq!(page.list, vec!["a", "b"]);
        assert_eq!(page.total, 2);
    }

    #[test]
    fn test_null_data_is_default() {
        let ids: Vec<i64> = decode_envelope(
            &Method::GET,
            "/x",
            RequestSummary::None,
            &raw(r#"{"dat":null,"err":""}"#),
        )
        .unwrap();
        assert!(ids.is_empty());
    }

    #[test]
    fn test_envelope_error_wins() {
        let err = decode_envelope::<Vec<i64>>(
            &Method::GET,
            "/api/n9e/busi-group/9",
            RequestSummary::None,
            &raw(r#"{"dat":[1,2],"err":"forbidden"}"#),
        )
        .unwrap_err();
        let api = err.api_error().unwrap();
        assert_eq!(api.err_msg, "forbidden");
        assert_eq!(api.request_id.as_deref(), Some("rid-1"));
    }

    #[test]
    fn test_malformed_body_previewed() {
        let err = decode_envelope::<Vec<i64>>(
            &Method::GET,
            "/x",
            RequestSummary::None,
            &raw("<html>login required</html>"),
        )
        .unwrap_err();
        let text = err.to_string();
        assert!(text.contains("check N9E_BASE_URL and N9E_TOKEN"));
        assert!(text.contains("<html>login required</html>"));
    }

    #[tokio::test]
    async fn test_business_error_on_http_200() {
        let router = Router::new().route(
            "/api/n9e/busi-groups",
            get_route(|| async {
                (
                    AxumStatus::OK,
                    [("x-request-id", "req-9")],
                    r#"{"dat": null, "err": "busi-group not found"}"#,
                )
            }),
        );
        let url = serve(router).await;
        let client = fast_client(&url);

        let mut params = QueryParams::new();
        params.insert("query".to_string(), "ops".to_string());

        let err = get::<Vec<serde_json::Value>>(
            &client,
            &CallContext::new(),
            "/api/n9e/busi-groups",
            Some(&params),
        )
        .await
        .unwrap_err();

        let api = err.api_error().unwrap();
        assert_eq!(api.err_msg, "busi-group not found");
        assert_eq!(api.status_code, 200);
        assert_eq!(api.method, "GET");
        assert_eq!(api.request, RequestSummary::Params(params));
        assert!(err.to_string().contains("request_id=req-9"));
    }

    #[tokio::test]
    async fn test_post_carries_body_summary() {
        let router = Router::new().route(
            "/api/n9e/busi-group/3/alert-mutes",
            post_route(|| async { r#"{"dat":0,"err":"invalid tags"}"# }),
        );
        let url = serve(router).await;
        let client = fast_client(&url);

        let body = serde_json::json!({ "cause": "upgrade" });
        let err = post::<i64, _>(
            &client,
            &CallContext::new(),
            "/api/n9e/busi-group/3/alert-mutes",
            &body,
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains(r#"body={"cause":"upgrade"}"#));
    }

    #[tokio::test]
    async fn test_post_returns_id() {
        let router = Router::new().route(
            "/api/n9e/busi-group/3/alert-mutes",
            post_route(|| async { r#"{"dat":42,"err":""}"# }),
        );
        let url = serve(router).await;
        let client = fast_client(&url);

        let id: i64 = post(
            &client,
            &CallContext::new(),
            "/api/n9e/busi-group/3/alert-mutes",
            &serde_json::json!({}),
        )
        .await
        .unwrap();
        assert_eq!(id, 42);
    }

    #[tokio::test]
    async fn test_put_and_delete() {
        let router = Router::new().route(
            "/api/n9e/busi-group/3/alert-mute/7",
            axum::routing::put(|| async { r#"{"dat":"ok","err":""}"# })
                .delete(|| async { r#"{"dat":null,"err":"mute in use"}"# }),
        );
        let url = serve(router).await;
        let client = fast_client(&url);
        let ctx = CallContext::new();
        let path = "/api/n9e/busi-group/3/alert-mute/7";

        let ok: serde_json::Value = put(&client, &ctx, path, &serde_json::json!({ "note": "x" }))
            .await
            .unwrap();
        assert_eq!(ok, "ok");

        let body = serde_json::json!({ "ids": [7] });
        let err = delete::<serde_json::Value>(&client, &ctx, path, Some(&body))
            .await
            .unwrap_err();
        let api = err.api_error().unwrap();
        assert_eq!(api.method, "DELETE");
        assert_eq!(api.err_msg, "mute in use");
        assert_eq!(api.request, RequestSummary::Body(body));
    }
}
