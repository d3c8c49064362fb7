// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Counting token source.

use std::sync::atomic::{AtomicUsize, Ordering};

use secrecy::SecretString;
use switchyard_core::{SwitchyardError, TokenSource};

/// Hands out a fixed token (or fails) and records each request.
#[derive(Debug)]
pub struct MockTokenSource {
    token: Option<String>,
    calls: AtomicUsize,
}

impl MockTokenSource {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// A source whose every request fails with an auth error.
    pub fn failing() -> Self {
        Self {
            token: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of tokens requested so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TokenSource for MockTokenSource {
    fn token(&self) -> Result<SecretString, SwitchyardError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.token {
            Some(token) => Ok(SecretString::from(token.clone())),
            None => Err(SwitchyardError::Auth {
                message: "mock token source refused".into(),
                source: None,
            }),
        }
    }
}
