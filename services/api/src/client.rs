//! Agent runtime invocation client.
//!
//! Talks to the hosted agent-runtime data plane:
//! `POST {endpoint}/runtimes/{arn}/invocations?qualifier=...` with the runtime
//! session carried in a header. The body is handed back unread.

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt, TryStreamExt};
use std::pin::Pin;
use tracing::debug;

pub const SESSION_ID_HEADER: &str = "X-Amzn-Bedrock-AgentCore-Runtime-Session-Id";
pub const DEFAULT_QUALIFIER: &str = "DEFAULT";

/// A streamed response body.
pub type BodyStream = Pin<Box<dyn Stream<Item = std::io::Result<Bytes>> + Send>>;

/// One invocation of a deployed agent runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationRequest {
    pub runtime_arn: String,
    pub session_id: String,
    pub payload: serde_json::Value,
    pub qualifier: String,
}

/// The raw runtime response. The body has not been read yet.
pub struct InvocationResponse {
    pub session_id: String,
    pub content_type: Option<String>,
    body: BodyStream,
}

impl InvocationResponse {
    pub fn new(session_id: String, content_type: Option<String>, body: BodyStream) -> Self {
        Self {
            session_id,
            content_type,
            body,
        }
    }

    /// A response whose body is already in memory.
    pub fn from_bytes(session_id: String, body: impl Into<Bytes>) -> Self {
        let body = body.into();
        Self::new(
            session_id,
            Some("application/json".to_string()),
            Box::pin(futures::stream::once(async move { Ok(body) })),
        )
    }

    /// Reads the streamed body to the end.
    pub async fn read_body(self) -> std::io::Result<Vec<u8>> {
        let mut body = self.body;
        let mut buf = Vec::new();
        while let Some(chunk) = body.next().await {
            buf.extend_from_slice(&chunk?);
        }
        Ok(buf)
    }
}

impl std::fmt::Debug for InvocationResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvocationResponse")
            .field("session_id", &self.session_id)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

/// The remote agent-runtime invocation API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AgentRuntimeClient: Send + Sync {
    async fn invoke(&self, request: InvocationRequest) -> Result<InvocationResponse>;
}

/// An `AgentRuntimeClient` over HTTP.
pub struct HttpAgentRuntimeClient {
    client: reqwest::Client,
    endpoint: String,
    bearer_token: Option<String>,
}

impl HttpAgentRuntimeClient {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>, bearer_token: Option<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            bearer_token,
        }
    }

    fn invocation_url(&self, runtime_arn: &str) -> String {
        format!(
            "{}/runtimes/{}/invocations",
            self.endpoint,
            urlencoding::encode(runtime_arn)
        )
    }
}

#[async_trait]
impl AgentRuntimeClient for HttpAgentRuntimeClient {
    async fn invoke(&self, request: InvocationRequest) -> Result<InvocationResponse> {
        let url = self.invocation_url(&request.runtime_arn);
        debug!(%url, session_id = %request.session_id, "Sending runtime invocation");

        let mut builder = self
            .client
            .post(&url)
            .query(&[("qualifier", request.qualifier.as_str())])
            .header(SESSION_ID_HEADER, &request.session_id)
            .json(&request.payload);
        if let Some(token) = &self.bearer_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .context("Agent runtime request failed")?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            bail!("Agent runtime returned {}: {}", status, detail);
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes_stream().map_err(std::io::Error::other);

        Ok(InvocationResponse::new(
            request.session_id,
            content_type,
            Box::pin(body),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        extract::{Path, Query},
        http::{HeaderMap, StatusCode},
        routing::post,
    };
    use std::collections::HashMap;

    async fn invocations(
        Path(arn): Path<String>,
        Query(query): Query<HashMap<String, String>>,
        headers: HeaderMap,
        Json(payload): Json<serde_json::Value>,
    ) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
        if headers.get("authorization").map(|v| v.as_bytes()) != Some(&b"Bearer jwt"[..]) {
            return Err((StatusCode::FORBIDDEN, "missing token".to_string()));
        }
        let session = headers
            .get(SESSION_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        Ok(Json(serde_json::json!({
            "arn": arn,
            "qualifier": query.get("qualifier"),
            "session": session,
            "prompt": payload["prompt"],
        })))
    }

    async fn spawn_runtime() -> String {
        let app = Router::new().route("/runtimes/{arn}/invocations", post(invocations));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn request() -> InvocationRequest {
        InvocationRequest {
            runtime_arn: "arn:aws:bedrock-agentcore:eu-central-1:000000000000:runtime/tutor".into(),
            session_id: "session_abc123".into(),
            payload: serde_json::json!({"prompt": "Hello"}),
            qualifier: DEFAULT_QUALIFIER.into(),
        }
    }

    #[test]
    fn test_invocation_url_encodes_arn() {
        let client = HttpAgentRuntimeClient::new(reqwest::Client::new(), "https://example.com/", None);
        assert_eq!(
            client.invocation_url("arn:aws:x:runtime/tutor"),
            "https://example.com/runtimes/arn%3Aaws%3Ax%3Aruntime%2Ftutor/invocations"
        );
    }

    #[tokio::test]
    async fn test_invoke_sends_session_and_payload() {
        let endpoint = spawn_runtime().await;
        let client = HttpAgentRuntimeClient::new(reqwest::Client::new(), endpoint, Some("jwt".into()));

        let response = client.invoke(request()).await.unwrap();
        assert_eq!(response.session_id, "session_abc123");
        assert_eq!(response.content_type.as_deref(), Some("application/json"));

        let body: serde_json::Value = serde_json::from_slice(&response.read_body().await.unwrap()).unwrap();
        assert_eq!(body["arn"], "arn:aws:bedrock-agentcore:eu-central-1:000000000000:runtime/tutor");
        assert_eq!(body["qualifier"], "DEFAULT");
        assert_eq!(body["session"], "session_abc123");
        assert_eq!(body["prompt"], "Hello");
    }

    #[tokio::test]
    async fn test_invoke_fails_on_error_status() {
        let endpoint = spawn_runtime().await;
        let client = HttpAgentRuntimeClient::new(reqwest::Client::new(), endpoint, None);

        let err = client.invoke(request()).await.unwrap_err();
        assert!(err.to_string().contains("403"));
    }

    #[tokio::test]
    async fn test_invoke_fails_when_unreachable() {
        let client = HttpAgentRuntimeClient::new(reqwest::Client::new(), "http://127.0.0.1:9", None);
        assert!(client.invoke(request()).await.is_err());
    }

    #[tokio::test]
    async fn test_from_bytes_reads_back() {
        let response = InvocationResponse::from_bytes("s".into(), "{\"content\":[]}");
        assert_eq!(response.read_body().await.unwrap(), b"{\"content\":[]}");
    }
}
