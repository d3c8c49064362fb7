// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secret redaction for Switchyard.
//!
//! Bearer credentials flow through every Genie request; transport errors and
//! log lines must never echo them back.

pub mod redact;

pub use redact::{redact, RedactingWriter, SecretRegistry};
