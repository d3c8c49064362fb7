// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted Genie Space endpoint.
//!
//! Query and poll calls are told apart by tool name. Replies queued with the
//! `then_*` methods are served in order, each exactly once, so tests can
//! script a full deferred exchange (query, pending polls, completion).

use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Successful tool reply whose first content item is `text`.
pub fn genie_text(text: &str) -> Value {
    json!({"result": {"content": [{"type": "text", "text": text}]}})
}

/// Successful tool reply carrying a JSON status payload.
pub fn genie_status(
    status: &str,
    conversation_id: Option<&str>,
    message_id: Option<&str>,
    response: Option<Value>,
) -> Value {
    let mut payload = json!({"status": status});
    if let Some(id) = conversation_id {
        payload["conversation_id"] = json!(id);
    }
    if let Some(id) = message_id {
        payload["message_id"] = json!(id);
    }
    if let Some(response) = response {
        payload["response"] = response;
    }
    genie_text(&payload.to_string())
}

/// Tool reply with a top-level error object.
pub fn genie_error(message: &str) -> Value {
    json!({"error": {"message": message}})
}

/// A wiremock server that answers one Genie Space's tool calls.
pub struct GenieMock {
    server: MockServer,
    space_id: String,
}

impl GenieMock {
    pub async fn start(space_id: &str) -> Self {
        Self {
            server: MockServer::start().await,
            space_id: space_id.to_string(),
        }
    }

    /// Endpoint URL to hand to the transport.
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn space_id(&self) -> &str {
        &self.space_id
    }

    pub fn query_tool(&self) -> String {
        format!("query_space_{}", self.space_id)
    }

    pub fn poll_tool(&self) -> String {
        format!("poll_response_{}", self.space_id)
    }

    /// Queue one reply to the next query call.
    pub async fn then_query(&self, response: ResponseTemplate) -> &Self {
        self.mount_once(&self.query_tool(), response).await;
        self
    }

    /// Queue one reply to the next poll call.
    pub async fn then_poll(&self, response: ResponseTemplate) -> &Self {
        self.mount_once(&self.poll_tool(), response).await;
        self
    }

    /// Queue a 200 reply with `body` to the next query call.
    pub async fn then_query_json(&self, body: Value) -> &Self {
        self.then_query(ResponseTemplate::new(200).set_body_json(body)).await
    }

    /// Queue a 200 reply with `body` to the next poll call.
    pub async fn then_poll_json(&self, body: Value) -> &Self {
        self.then_poll(ResponseTemplate::new(200).set_body_json(body)).await
    }

    /// Answer every poll call with `body` from now on.
    pub async fn always_poll_json(&self, body: Value) {
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"params": {"name": self.poll_tool()}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Bodies of every request received so far, parsed as JSON.
    pub async fn received_bodies(&self) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter_map(|r| serde_json::from_slice(&r.body).ok())
            .collect()
    }

    /// Number of received calls to `tool`.
    pub async fn calls_to(&self, tool: &str) -> usize {
        self.received_bodies()
            .await
            .iter()
            .filter(|b| b["params"]["name"] == tool)
            .count()
    }

    async fn mount_once(&self, tool: &str, response: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"params": {"name": tool}})))
            .respond_with(response)
            .up_to_n_times(1)
            .mount(&self.server)
            .await;
    }
}
