// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Completion polling for deferred Genie answers.
//!
//! A deferred query returns a conversation id and message id; the answer is
//! fetched by calling the space's poll tool until a terminal status arrives.
//!
//! ```text
//! Polling --completed--> Completed
//!    |  \--failed/error--> Failed
//!    |  \--"expired"/"not found" error--> Expired
//!    \--attempts or deadline exhausted--> TimedOut
//! ```
//!
//! Rate-limited polls back off for `interval * rate_limit_backoff` and do not
//! consume an attempt. The wall-clock `deadline` bounds the whole loop,
//! rate-limited waits included.

use std::time::Duration;

use switchyard_config::model::GenieConfig;
use switchyard_core::{ConversationId, MessageId};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::error::GenieError;
use crate::normalize::{normalize, normalize_text};
use crate::protocol::{StatusPayload, ToolCallRequest, ToolReply};
use crate::transport::ToolTransport;

/// Fallback when a poll error carries no message.
const UNKNOWN_ERROR: &str = "Unknown error";
/// Fallback when a failed status carries no error text.
const QUERY_FAILED: &str = "Query failed";
/// Stand-in for deadlines too far out to represent as an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollSettings {
    /// Non-rate-limited poll attempts before giving up.
    pub max_attempts: u32,
    /// Sleep between attempts.
    pub interval: Duration,
    /// Multiplier on `interval` after a 429.
    pub rate_limit_backoff: f64,
    /// Upper bound on total time spent polling.
    pub deadline: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            max_attempts: 60,
            interval: Duration::from_secs(2),
            rate_limit_backoff: 2.0,
            deadline: Duration::from_secs(180),
        }
    }
}

impl PollSettings {
    /// Wait after a rate-limited poll. Unrepresentable products (infinite or
    /// NaN backoff) fall back to the full deadline.
    pub fn backoff_wait(&self) -> Duration {
        Duration::try_from_secs_f64(self.interval.as_secs_f64() * self.rate_limit_backoff)
            .unwrap_or(self.deadline)
    }
}

impl From<&GenieConfig> for PollSettings {
    fn from(config: &GenieConfig) -> Self {
        Self {
            max_attempts: config.poll_max_attempts,
            interval: config.poll_interval(),
            rate_limit_backoff: config.rate_limit_backoff,
            deadline: config.poll_deadline(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Polling,
    Completed,
    Failed,
    Expired,
    TimedOut,
}

impl std::fmt::Display for PollState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PollState::Polling => "polling",
            PollState::Completed => "completed",
            PollState::Failed => "failed",
            PollState::Expired => "expired",
            PollState::TimedOut => "timed_out",
        };
        f.write_str(name)
    }
}

/// Terminal result of a poll loop.
#[derive(Debug, Clone, PartialEq)]
pub struct PollOutcome {
    pub state: PollState,
    /// Rendered answer; empty unless `state` is `Completed`.
    pub text: String,
    pub error: Option<GenieError>,
    /// Attempts consumed (rate-limited polls excluded).
    pub attempts: u32,
    /// Poll calls that came back rate limited.
    pub rate_limited: u32,
}

impl PollOutcome {
    fn finished(state: PollState, attempts: u32, rate_limited: u32) -> Self {
        Self {
            state,
            text: String::new(),
            error: None,
            attempts,
            rate_limited,
        }
    }

    fn fail(mut self, error: GenieError) -> Self {
        self.error = Some(error);
        self
    }
}

/// Polls one message to a terminal state.
pub struct PollLoop<'a, T: ToolTransport + ?Sized> {
    transport: &'a T,
    tool: &'a str,
    settings: PollSettings,
}

impl<'a, T: ToolTransport + ?Sized> PollLoop<'a, T> {
    pub fn new(transport: &'a T, tool: &'a str, settings: PollSettings) -> Self {
        Self {
            transport,
            tool,
            settings,
        }
    }

    pub async fn run(&self, conversation: &ConversationId, message: &MessageId) -> PollOutcome {
        let deadline = after(self.settings.deadline);
        let request = ToolCallRequest::poll(self.tool, conversation, message);
        let mut attempts = 0u32;
        let mut rate_limited = 0u32;

        info!(
            conversation = %conversation,
            message = %message,
            max_attempts = self.settings.max_attempts,
            "polling for Genie response"
        );

        while attempts < self.settings.max_attempts {
            if Instant::now() >= deadline {
                break;
            }

            let reply =
                match tokio::time::timeout_at(deadline, self.transport.call_tool(&request)).await {
                    Ok(reply) => reply,
                    Err(_) => break,
                };

            match reply {
                Ok(ToolReply::RateLimited) => {
                    rate_limited += 1;
                    let wait = self.settings.backoff_wait();
                    warn!(attempt = attempts + 1, wait = ?wait, "poll rate limited, backing off");
                    sleep_until_or(deadline, wait).await;
                    continue;
                }
                Ok(ToolReply::ServiceError(message)) => {
                    let message = message.unwrap_or_else(|| UNKNOWN_ERROR.to_string());
                    attempts += 1;
                    return if is_expiry(&message) {
                        info!(attempt = attempts, "conversation expired while polling");
                        PollOutcome::finished(PollState::Expired, attempts, rate_limited)
                            .fail(GenieError::Expired)
                    } else {
                        warn!(attempt = attempts, error = %message, "poll returned an error");
                        PollOutcome::finished(PollState::Failed, attempts, rate_limited)
                            .fail(GenieError::Service(message))
                    };
                }
                Ok(ToolReply::Content(Some(text))) => {
                    attempts += 1;
                    match StatusPayload::parse(&text) {
                        Some(payload) if payload.is_completed() => {
                            info!(attempt = attempts, "Genie response completed");
                            let rendered = match &payload.response {
                                Some(response) => normalize(response),
                                None => normalize_text(&text),
                            };
                            let mut outcome =
                                PollOutcome::finished(PollState::Completed, attempts, rate_limited);
                            outcome.text = rendered;
                            return outcome;
                        }
                        Some(payload) if payload.is_failed() => {
                            let error =
                                payload.error_text().unwrap_or_else(|| QUERY_FAILED.to_string());
                            warn!(attempt = attempts, error = %error, "Genie query failed");
                            return PollOutcome::finished(PollState::Failed, attempts, rate_limited)
                                .fail(GenieError::Service(error));
                        }
                        Some(payload) => {
                            debug!(attempt = attempts, status = %payload.status, "still running");
                        }
                        None => {
                            debug!(attempt = attempts, "poll content is not a status payload");
                        }
                    }
                }
                Ok(ToolReply::Content(None)) => {
                    attempts += 1;
                    debug!(attempt = attempts, "poll returned no content");
                }
                Err(e) => {
                    attempts += 1;
                    warn!(attempt = attempts, error = %e, "poll attempt failed");
                }
            }

            if attempts < self.settings.max_attempts {
                sleep_until_or(deadline, self.settings.interval).await;
            }
        }

        warn!(attempts, rate_limited, "polling gave up without a terminal status");
        PollOutcome::finished(PollState::TimedOut, attempts, rate_limited).fail(GenieError::TimedOut)
    }
}

/// `now + wait`, saturating to a far-future instant instead of overflowing.
fn after(wait: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(wait)
        .or_else(|| now.checked_add(FAR_FUTURE))
        .unwrap_or(now)
}

/// Sleep for `wait`, but never past `deadline`.
async fn sleep_until_or(deadline: Instant, wait: Duration) {
    tokio::time::sleep_until(deadline.min(after(wait))).await;
}

fn is_expiry(message: &str) -> bool {
    let lowered = message.to_lowercase();
    lowered.contains("expired") || lowered.contains("not found")
}
