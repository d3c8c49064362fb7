// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Genie Space client for Switchyard.
//!
//! Issues `tools/call` requests against a Genie Space MCP endpoint, keeps the
//! per-session conversation id so follow-up questions stay in context, polls
//! deferred answers to completion, and renders whatever comes back (text,
//! JSON objects, record lists) as markdown.
//!
//! Every outcome, including rate limiting and transport failures, comes back
//! as a [`GenieReply`] value; nothing in this crate returns `Err` to the chat
//! layer or panics on a bad response.

pub mod client;
pub mod error;
pub mod normalize;
pub mod poll;
pub mod protocol;
pub mod tracker;
pub mod transport;

pub use client::{GenieClient, GenieReply, NO_RESPONSE};
pub use error::GenieError;
pub use normalize::{normalize, normalize_text, render_table, TableError, NO_DATA};
pub use poll::{PollLoop, PollOutcome, PollSettings, PollState};
pub use protocol::{StatusPayload, ToolCallRequest, ToolNames, ToolReply};
pub use tracker::ConversationTracker;
pub use transport::{HttpTransport, ToolTransport};
