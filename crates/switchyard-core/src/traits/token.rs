// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bearer-token issuance.
//!
//! Token minting itself (OAuth client credentials, PAT rotation, ...) happens
//! outside Switchyard. The Genie client asks its [`TokenSource`] for a fresh
//! credential before every outbound request and never caches the result.

use secrecy::{ExposeSecret, SecretString};

use crate::error::SwitchyardError;

/// Environment variable consulted when no token is configured.
pub const TOKEN_ENV_VAR: &str = "DATABRICKS_TOKEN";

/// Produces a bearer credential for the data-query service.
pub trait TokenSource: Send + Sync {
    /// Returns a currently valid bearer token.
    fn token(&self) -> Result<SecretString, SwitchyardError>;
}

/// A fixed token, typically a personal access token from config or env.
pub struct StaticToken {
    token: SecretString,
}

impl StaticToken {
    /// Wraps an explicit token value.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: SecretString::from(token.into()),
        }
    }

    /// Resolves the token: explicit config value first, then the
    /// `DATABRICKS_TOKEN` environment variable.
    pub fn resolve(configured: Option<&str>) -> Result<Self, SwitchyardError> {
        if let Some(token) = configured.filter(|t| !t.trim().is_empty()) {
            return Ok(Self::new(token));
        }
        match std::env::var(TOKEN_ENV_VAR) {
            Ok(token) if !token.trim().is_empty() => Ok(Self::new(token)),
            _ => Err(SwitchyardError::Config(format!(
                "no Genie token configured: set genie.token or {TOKEN_ENV_VAR}"
            ))),
        }
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticToken").finish_non_exhaustive()
    }
}

impl TokenSource for StaticToken {
    fn token(&self) -> Result<SecretString, SwitchyardError> {
        Ok(SecretString::from(self.token.expose_secret().to_owned()))
    }
}
