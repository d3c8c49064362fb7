// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for Switchyard infrastructure.
//!
//! Protocol-level outcomes of a Genie query (rate limiting, expiry, poll
//! timeouts) are not errors in this sense; they live in `switchyard-genie`
//! and travel back to the caller as values.

use thiserror::Error;

/// The error type for construction, configuration, and credential failures.
#[derive(Debug, Error)]
pub enum SwitchyardError {
    /// Configuration errors (missing host, invalid header values, bad settings).
    #[error("configuration error: {0}")]
    Config(String),

    /// The token collaborator could not produce a bearer credential.
    #[error("authentication error: {message}")]
    Auth {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// HTTP client construction or request failure.
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
