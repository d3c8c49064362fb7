// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Genie Space query client.
//!
//! [`GenieClient::query`] sends one question and resolves it to a
//! [`GenieReply`]: immediately when the service answers inline, or through
//! the [`PollLoop`] when the answer is deferred. Conversation ids returned by
//! the service are recorded in the [`ConversationTracker`] under the caller's
//! session.

use std::sync::Arc;

use switchyard_config::model::GenieConfig;
use switchyard_core::{ConversationId, SessionId, SwitchyardError, TokenSource};
use switchyard_security::SecretRegistry;
use tracing::{error, info, warn};

use crate::error::GenieError;
use crate::normalize::{normalize, normalize_text};
use crate::poll::{PollLoop, PollSettings};
use crate::protocol::{StatusPayload, ToolCallRequest, ToolNames, ToolReply};
use crate::tracker::ConversationTracker;
use crate::transport::{HttpTransport, ToolTransport};

/// Text returned when a tool call succeeds but carries no content.
pub const NO_RESPONSE: &str = "No response from Genie Space.";

/// Characters of the query text included in log lines.
const LOG_PREVIEW_CHARS: usize = 50;

/// Outcome of one Genie query. Exactly one of `text` / `error` is meaningful.
#[derive(Debug, Clone, PartialEq)]
pub struct GenieReply {
    /// Rendered answer; empty on error.
    pub text: String,
    /// Conversation to continue next time, when known.
    pub conversation_id: Option<ConversationId>,
    pub error: Option<GenieError>,
}

impl GenieReply {
    fn answer(text: impl Into<String>, conversation_id: Option<ConversationId>) -> Self {
        Self {
            text: text.into(),
            conversation_id,
            error: None,
        }
    }

    fn failed(error: GenieError, conversation_id: Option<ConversationId>) -> Self {
        Self {
            text: String::new(),
            conversation_id,
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// User-facing error message, if the query failed.
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }
}

/// Client for one Genie Space.
pub struct GenieClient {
    transport: Arc<dyn ToolTransport>,
    tools: ToolNames,
    poll: PollSettings,
    tracker: ConversationTracker,
}

impl GenieClient {
    pub fn new(transport: Arc<dyn ToolTransport>, space_id: &str, poll: PollSettings) -> Self {
        Self {
            transport,
            tools: ToolNames::for_space(space_id),
            poll,
            tracker: ConversationTracker::new(),
        }
    }

    /// Builds an HTTP-backed client from the `[genie]` config section.
    ///
    /// Fails when `host` or `space_id` is missing.
    pub fn from_config(
        config: &GenieConfig,
        tokens: Arc<dyn TokenSource>,
        secrets: SecretRegistry,
    ) -> Result<Self, SwitchyardError> {
        let space_id = config
            .space_id
            .as_deref()
            .ok_or_else(|| SwitchyardError::Config("genie.space_id is not set".into()))?;
        let endpoint = config
            .endpoint_url()
            .ok_or_else(|| SwitchyardError::Config("genie.host is not set".into()))?;
        let transport =
            HttpTransport::new(endpoint, tokens, config.request_timeout(), secrets)?;
        Ok(Self::new(
            Arc::new(transport),
            space_id,
            PollSettings::from(config),
        ))
    }

    pub fn conversation_id(&self, session: &SessionId) -> Option<ConversationId> {
        self.tracker.get(session)
    }

    pub fn clear_conversation(&self, session: &SessionId) -> Option<ConversationId> {
        info!(session = %session, "clearing Genie conversation");
        self.tracker.clear(session)
    }

    /// Query using the session's tracked conversation.
    ///
    /// Holds the session lock for the whole exchange, so concurrent queries
    /// in one session run one at a time and each sees its predecessor's
    /// conversation id.
    pub async fn query_session(&self, text: &str, session: &SessionId) -> GenieReply {
        let guard = self.tracker.lock_session(session).await;
        let conversation = self.tracker.get(session);
        let reply = self.query(text, session, conversation.as_ref()).await;
        drop(guard);
        self.tracker.release_lock(session);
        reply
    }

    /// Send `text`, continuing `conversation` when given.
    ///
    /// Never fails: every outcome is folded into the returned reply.
    pub async fn query(
        &self,
        text: &str,
        session: &SessionId,
        conversation: Option<&ConversationId>,
    ) -> GenieReply {
        let preview: String = text.chars().take(LOG_PREVIEW_CHARS).collect();
        info!(
            session = %session,
            continuing = conversation.is_some(),
            query = %preview,
            "querying Genie Space"
        );

        let request = ToolCallRequest::query(&self.tools.query, text, conversation);
        let reply = match self.transport.call_tool(&request).await {
            Ok(reply) => reply,
            Err(e) => {
                error!(session = %session, error = %e, "Genie query failed");
                return GenieReply::failed(e, conversation.cloned());
            }
        };

        match reply {
            ToolReply::RateLimited => {
                warn!(session = %session, "Genie Space rate limited the query");
                GenieReply::failed(GenieError::RateLimited, None)
            }
            ToolReply::ServiceError(message) => {
                let message = message.unwrap_or_else(|| "Unknown error from Genie".to_string());
                error!(session = %session, error = %message, "Genie returned an error");
                GenieReply::failed(GenieError::Service(message), None)
            }
            ToolReply::Content(None) => GenieReply::answer(NO_RESPONSE, conversation.cloned()),
            ToolReply::Content(Some(raw)) => self.resolve(raw, session, conversation).await,
        }
    }

    /// Interpret tool text: inline answer, completed status, or deferred.
    async fn resolve(
        &self,
        raw: String,
        session: &SessionId,
        conversation: Option<&ConversationId>,
    ) -> GenieReply {
        let Some(payload) = StatusPayload::parse(&raw) else {
            return GenieReply::answer(normalize_text(&raw), conversation.cloned());
        };

        let issued = payload.conversation_id.clone();
        if let Some(id) = &issued {
            self.tracker.set(session, id.clone());
        }

        if payload.is_completed() {
            let text = match &payload.response {
                Some(response) => normalize(response),
                None => normalize_text(&raw),
            };
            return GenieReply::answer(text, issued);
        }

        let Some(poll_conversation) = issued.clone().or_else(|| conversation.cloned()) else {
            return GenieReply::failed(
                GenieError::MalformedResponse("deferred answer without a conversation_id".into()),
                None,
            );
        };
        let Some(message) = payload.message_id else {
            return GenieReply::failed(
                GenieError::MalformedResponse("deferred answer without a message_id".into()),
                issued,
            );
        };

        let outcome = PollLoop::new(self.transport.as_ref(), &self.tools.poll, self.poll)
            .run(&poll_conversation, &message)
            .await;
        info!(
            session = %session,
            state = %outcome.state,
            attempts = outcome.attempts,
            "Genie poll finished"
        );
        match outcome.error {
            Some(error) => GenieReply::failed(error, issued),
            None => GenieReply::answer(outcome.text, issued),
        }
    }
}

impl std::fmt::Debug for GenieClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenieClient")
            .field("tools", &self.tools)
            .field("poll", &self.poll)
            .field("sessions", &self.tracker.len())
            .finish_non_exhaustive()
    }
}
