// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Switchyard.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use switchyard_core::RouteTarget;

/// Top-level Switchyard configuration.
///
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SwitchyardConfig {
    /// Process identity and logging.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Query routing settings.
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Genie Space connection and polling settings.
    #[serde(default)]
    pub genie: GenieConfig,
}

/// Process identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name used in logs and the shell prompt.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "switchyard".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Query routing configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RoutingConfig {
    /// Enable classification. When false, every query goes to the general model.
    #[serde(default = "default_routing_enabled")]
    pub enabled: bool,

    /// Send every query to one target, bypassing classification.
    #[serde(default)]
    pub force_target: Option<RouteTarget>,

    /// Minimum confidence for a data-intent classification to reach Genie.
    #[serde(default = "default_min_data_confidence")]
    pub min_data_confidence: f32,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            enabled: default_routing_enabled(),
            force_target: None,
            min_data_confidence: default_min_data_confidence(),
        }
    }
}

fn default_routing_enabled() -> bool {
    true
}

fn default_min_data_confidence() -> f32 {
    0.5
}

/// Genie Space connection and polling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GenieConfig {
    /// Workspace host without scheme, e.g. `adb-123.azuredatabricks.net`.
    #[serde(default)]
    pub host: Option<String>,

    /// Genie Space identifier. Tool names are derived from it.
    #[serde(default)]
    pub space_id: Option<String>,

    /// Bearer token. `None` falls back to the `DATABRICKS_TOKEN` env var.
    #[serde(default)]
    pub token: Option<String>,

    /// Per-request HTTP timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Maximum number of status polls for a deferred query.
    #[serde(default = "default_poll_max_attempts")]
    pub poll_max_attempts: u32,

    /// Delay between status polls in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Multiplier applied to the poll interval after a 429 response.
    #[serde(default = "default_rate_limit_backoff")]
    pub rate_limit_backoff: f64,

    /// Wall-clock ceiling for the whole poll loop in seconds.
    #[serde(default = "default_poll_deadline_secs")]
    pub poll_deadline_secs: u64,
}

impl Default for GenieConfig {
    fn default() -> Self {
        Self {
            host: None,
            space_id: None,
            token: None,
            request_timeout_secs: default_request_timeout_secs(),
            poll_max_attempts: default_poll_max_attempts(),
            poll_interval_ms: default_poll_interval_ms(),
            rate_limit_backoff: default_rate_limit_backoff(),
            poll_deadline_secs: default_poll_deadline_secs(),
        }
    }
}

impl GenieConfig {
    /// Per-request HTTP timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Delay between status polls.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Overall poll-loop deadline.
    pub fn poll_deadline(&self) -> Duration {
        Duration::from_secs(self.poll_deadline_secs)
    }

    /// MCP endpoint for the configured space, if host and space are both set.
    pub fn endpoint_url(&self) -> Option<String> {
        match (self.host.as_deref(), self.space_id.as_deref()) {
            (Some(host), Some(space)) => Some(format!(
                "https://{}/api/2.0/mcp/genie/{space}",
                host.trim_end_matches('/')
            )),
            _ => None,
        }
    }
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_poll_max_attempts() -> u32 {
    60
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_rate_limit_backoff() -> f64 {
    2.0
}

fn default_poll_deadline_secs() -> u64 {
    180
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_url_requires_host_and_space() {
        let mut genie = GenieConfig::default();
        assert!(genie.endpoint_url().is_none());

        genie.host = Some("adb-1.azuredatabricks.net/".into());
        assert!(genie.endpoint_url().is_none());

        genie.space_id = Some("01ef".into());
        assert_eq!(
            genie.endpoint_url().as_deref(),
            Some("https://adb-1.azuredatabricks.net/api/2.0/mcp/genie/01ef")
        );
    }

    #[test]
    fn poll_defaults_match_two_minute_budget() {
        let genie = GenieConfig::default();
        assert_eq!(genie.poll_max_attempts, 60);
        assert_eq!(genie.poll_interval(), Duration::from_secs(2));
        assert_eq!(genie.poll_deadline(), Duration::from_secs(180));
    }
}
