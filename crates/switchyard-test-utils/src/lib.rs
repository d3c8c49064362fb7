// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Switchyard integration tests.
//!
//! Provides mock credentials and a scripted Genie Space endpoint for fast,
//! deterministic tests without a real Databricks workspace.
//!
//! # Components
//!
//! - [`MockTokenSource`] - Token source that counts how often it is asked
//! - [`GenieMock`] - wiremock server speaking the Genie tool-call protocol

pub mod genie_mock;
pub mod mock_token;

pub use genie_mock::{genie_error, genie_status, genie_text, GenieMock};
pub use mock_token::MockTokenSource;
