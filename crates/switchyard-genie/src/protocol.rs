// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the Genie Space MCP endpoint.
//!
//! Requests are `{"method": "tools/call", "params": {"name", "arguments"}}`.
//! Responses carry either a top-level `error` object or a `result` whose
//! first content item holds the tool's text output. That text is often a
//! JSON status payload describing a (possibly still running) query.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use switchyard_core::{ConversationId, MessageId};

const TOOLS_CALL: &str = "tools/call";

/// Statuses after which the answer is ready.
const COMPLETED_STATUSES: &[&str] = &["completed", "complete"];
/// Statuses after which the query has definitively failed.
const FAILED_STATUSES: &[&str] = &["error", "failed"];

/// Tool names exposed by one Genie Space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolNames {
    pub query: String,
    pub poll: String,
}

impl ToolNames {
    pub fn for_space(space_id: &str) -> Self {
        Self {
            query: format!("query_space_{space_id}"),
            poll: format!("poll_response_{space_id}"),
        }
    }
}

/// A `tools/call` request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolCallRequest {
    method: &'static str,
    params: ToolCallParams,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct ToolCallParams {
    name: String,
    arguments: Map<String, Value>,
}

impl ToolCallRequest {
    /// Ask a question, continuing `conversation` when given.
    pub fn query(tool: &str, text: &str, conversation: Option<&ConversationId>) -> Self {
        let mut arguments = Map::new();
        arguments.insert("query".into(), Value::String(text.to_string()));
        if let Some(id) = conversation {
            arguments.insert("conversation_id".into(), Value::String(id.as_str().to_string()));
        }
        Self::new(tool, arguments)
    }

    /// Check on a previously issued question.
    pub fn poll(tool: &str, conversation: &ConversationId, message: &MessageId) -> Self {
        let mut arguments = Map::new();
        arguments.insert(
            "conversation_id".into(),
            Value::String(conversation.as_str().to_string()),
        );
        arguments.insert("message_id".into(), Value::String(message.as_str().to_string()));
        Self::new(tool, arguments)
    }

    fn new(tool: &str, arguments: Map<String, Value>) -> Self {
        Self {
            method: TOOLS_CALL,
            params: ToolCallParams {
                name: tool.to_string(),
                arguments,
            },
        }
    }

    pub fn tool_name(&self) -> &str {
        &self.params.name
    }

    pub fn argument(&self, key: &str) -> Option<&str> {
        self.params.arguments.get(key).and_then(Value::as_str)
    }
}

/// JSON body of a successful (2xx) tool call response.
#[derive(Debug, Default, Deserialize)]
pub struct ToolCallEnvelope {
    #[serde(default)]
    pub result: Option<ToolResult>,
    #[serde(default)]
    pub error: Option<RpcError>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ToolResult {
    #[serde(default)]
    pub content: Vec<ContentItem>,
}

#[derive(Debug, Deserialize)]
pub struct ContentItem {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RpcError {
    #[serde(default)]
    pub message: Option<String>,
}

/// Transport-level reading of one tool call, before any status handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolReply {
    /// HTTP 429.
    RateLimited,
    /// Top-level `error` object; the message when one was supplied.
    ServiceError(Option<String>),
    /// Text of the first content item, `None` when there was no content.
    Content(Option<String>),
}

impl From<ToolCallEnvelope> for ToolReply {
    fn from(envelope: ToolCallEnvelope) -> Self {
        if let Some(error) = envelope.error {
            return ToolReply::ServiceError(error.message);
        }
        let text = envelope
            .result
            .and_then(|r| r.content.into_iter().next())
            .map(|item| item.text.unwrap_or_default());
        ToolReply::Content(text)
    }
}

/// Status payload carried in a tool's text output.
///
/// Fields are read leniently: wrong types are treated as absent.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusPayload {
    pub conversation_id: Option<ConversationId>,
    pub message_id: Option<MessageId>,
    /// Lowercased status, empty when absent.
    pub status: String,
    pub response: Option<Value>,
    pub error: Option<Value>,
}

impl StatusPayload {
    /// Parse tool text as a status payload. Only JSON objects qualify.
    pub fn parse(text: &str) -> Option<Self> {
        let Value::Object(mut map) = serde_json::from_str::<Value>(text).ok()? else {
            return None;
        };
        let string_field = |map: &Map<String, Value>, key: &str| {
            map.get(key).and_then(Value::as_str).map(str::to_string)
        };
        Some(Self {
            conversation_id: string_field(&map, "conversation_id").map(ConversationId::from),
            message_id: string_field(&map, "message_id").map(MessageId::from),
            status: string_field(&map, "status").unwrap_or_default().to_lowercase(),
            response: map.remove("response").filter(|v| !v.is_null()),
            error: map.remove("error").filter(|v| !v.is_null()),
        })
    }

    pub fn is_completed(&self) -> bool {
        COMPLETED_STATUSES.contains(&self.status.as_str())
    }

    pub fn is_failed(&self) -> bool {
        FAILED_STATUSES.contains(&self.status.as_str())
    }

    /// The `error` field as display text.
    pub fn error_text(&self) -> Option<String> {
        self.error.as_ref().map(|e| match e {
            Value::String(s) => s.clone(),
            Value::Object(map) => map
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| e.to_string()),
            other => other.to_string(),
        })
    }
}
