// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tool-call transport.
//!
//! [`ToolTransport`] is the seam between query logic and HTTP. The production
//! implementation, [`HttpTransport`], posts JSON to the Genie Space endpoint
//! with a bearer token fetched fresh for every request.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use secrecy::ExposeSecret;
use switchyard_core::{SwitchyardError, TokenSource};
use switchyard_security::SecretRegistry;
use tracing::debug;

use crate::error::GenieError;
use crate::protocol::{ToolCallEnvelope, ToolCallRequest, ToolReply};

/// Longest slice of an error body quoted back in a transport error.
const MAX_ERROR_BODY: usize = 200;

/// Sends one tool call and reads its reply.
///
/// `Err` means the exchange failed outright (network, non-2xx status other
/// than 429, undecodable body, missing credentials).
#[async_trait]
pub trait ToolTransport: Send + Sync {
    async fn call_tool(&self, request: &ToolCallRequest) -> Result<ToolReply, GenieError>;
}

/// reqwest-backed transport for a single Genie Space endpoint.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    tokens: Arc<dyn TokenSource>,
    secrets: SecretRegistry,
}

impl HttpTransport {
    /// Builds a transport posting to `endpoint`.
    ///
    /// `timeout` bounds each individual HTTP request. Error text is passed
    /// through `secrets` before it leaves this type.
    pub fn new(
        endpoint: impl Into<String>,
        tokens: Arc<dyn TokenSource>,
        timeout: Duration,
        secrets: SecretRegistry,
    ) -> Result<Self, SwitchyardError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SwitchyardError::Transport {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            tokens,
            secrets,
        })
    }

    fn headers(&self) -> Result<HeaderMap, GenieError> {
        let token = self
            .tokens
            .token()
            .map_err(|e| GenieError::Transport(format!("failed to obtain bearer token: {e}")))?;
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|_| GenieError::Transport("bearer token is not a valid header value".into()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    fn failure(&self, detail: String) -> GenieError {
        GenieError::Transport(self.secrets.redact(&detail))
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ToolTransport for HttpTransport {
    async fn call_tool(&self, request: &ToolCallRequest) -> Result<ToolReply, GenieError> {
        let headers = self.headers()?;
        let response = self
            .client
            .post(&self.endpoint)
            .headers(headers)
            .json(request)
            .send()
            .await
            .map_err(|e| self.failure(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        debug!(status = %status, tool = request.tool_name(), "tool call response received");

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Ok(ToolReply::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body: String = body.chars().take(MAX_ERROR_BODY).collect();
            return Err(self.failure(format!("HTTP {status}: {body}")));
        }

        let envelope: ToolCallEnvelope = response
            .json()
            .await
            .map_err(|e| self.failure(format!("failed to decode response: {e}")))?;
        Ok(ToolReply::from(envelope))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use switchyard_core::StaticToken;
    use switchyard_test_utils::{genie_text, MockTokenSource};
    use wiremock::matchers::{body_partial_json, header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn transport(server: &MockServer, tokens: Arc<dyn TokenSource>) -> HttpTransport {
        HttpTransport::new(
            server.uri(),
            tokens,
            Duration::from_secs(5),
            SecretRegistry::new(),
        )
        .unwrap()
    }

    fn request() -> ToolCallRequest {
        ToolCallRequest::query("query_space_s1", "how many clients", None)
    }

    #[tokio::test]
    async fn posts_tool_call_with_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("authorization", "Bearer dapi-test"))
            .and(header("content-type", "application/json"))
            .and(body_partial_json(json!({
                "method": "tools/call",
                "params": {"name": "query_space_s1", "arguments": {"query": "how many clients"}}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(genie_text("42")))
            .expect(1)
            .mount(&server)
            .await;

        let reply = transport(&server, Arc::new(StaticToken::new("dapi-test")))
            .call_tool(&request())
            .await
            .unwrap();
        assert_eq!(reply, ToolReply::Content(Some("42".into())));
    }

    #[tokio::test]
    async fn token_is_fetched_for_every_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(genie_text("ok")))
            .mount(&server)
            .await;

        let tokens = Arc::new(MockTokenSource::new("dapi-rotating"));
        let t = transport(&server, tokens.clone());
        t.call_tool(&request()).await.unwrap();
        t.call_tool(&request()).await.unwrap();
        assert_eq!(tokens.calls(), 2);
    }

    #[tokio::test]
    async fn rate_limit_is_a_reply_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let reply = transport(&server, Arc::new(StaticToken::new("t")))
            .call_tool(&request())
            .await
            .unwrap();
        assert_eq!(reply, ToolReply::RateLimited);
    }

    #[tokio::test]
    async fn server_error_becomes_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
            .mount(&server)
            .await;

        let err = transport(&server, Arc::new(StaticToken::new("t")))
            .call_tool(&request())
            .await
            .unwrap_err();
        match err {
            GenieError::Transport(detail) => {
                assert!(detail.contains("503"), "{detail}");
                assert!(detail.contains("upstream unavailable"), "{detail}");
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn undecodable_body_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = transport(&server, Arc::new(StaticToken::new("t")))
            .call_tool(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, GenieError::Transport(_)));
    }

    #[tokio::test]
    async fn error_text_is_redacted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad token sekrit-value"))
            .mount(&server)
            .await;

        let secrets = SecretRegistry::new();
        secrets.register("sekrit-value");
        let t = HttpTransport::new(
            server.uri(),
            Arc::new(StaticToken::new("sekrit-value")),
            Duration::from_secs(5),
            secrets,
        )
        .unwrap();
        let err = t.call_tool(&request()).await.unwrap_err();
        assert!(!err.to_string().contains("sekrit-value"), "{err}");
    }

    #[tokio::test]
    async fn missing_token_fails_before_sending() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = transport(&server, Arc::new(MockTokenSource::failing()))
            .call_tool(&request())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("bearer token"), "{err}");
    }
}
