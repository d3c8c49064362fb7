// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits the core depends on.

pub mod token;

pub use token::{StaticToken, TokenSource};
