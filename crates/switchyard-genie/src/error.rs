// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outcomes of a Genie query that did not produce an answer.
//!
//! The `Display` text of each variant is what the chat user sees.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenieError {
    /// HTTP 429 on the initial tool call.
    #[error(
        "The service is currently experiencing high demand. Please try again in a few moments."
    )]
    RateLimited,

    /// The service reported a failure; the message is the service's own.
    #[error("{0}")]
    Service(String),

    /// The remote conversation is gone (expired or unknown).
    #[error("The conversation has expired. Please try your query again.")]
    Expired,

    /// The poll budget ran out before a terminal status arrived.
    #[error("Query timed out. Please try again.")]
    TimedOut,

    /// The service answered with a shape that cannot be acted on.
    #[error("Unexpected response from Genie Space: {0}")]
    MalformedResponse(String),

    /// Network, HTTP status, credential, or body decoding failure.
    #[error("Error querying Genie Space: {0}")]
    Transport(String),
}

impl GenieError {
    /// Whether the same query may succeed if simply resent later.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GenieError::RateLimited | GenieError::TimedOut | GenieError::Transport(_)
        )
    }
}
