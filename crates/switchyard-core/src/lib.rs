// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Switchyard.
//!
//! Holds the shared error type, the session/conversation identifiers passed
//! between the router and the Genie client, and the collaborator traits the
//! core needs from the outside world (currently just bearer-token issuance).

pub mod error;
pub mod traits;
pub mod types;

pub use error::SwitchyardError;
pub use traits::{StaticToken, TokenSource};
pub use types::{ConversationId, MessageId, RouteTarget, SessionId};
