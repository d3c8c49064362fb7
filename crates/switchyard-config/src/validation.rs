// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks semantic constraints serde attributes cannot express: value ranges,
//! non-zero durations, and host formatting.

use crate::diagnostic::ConfigError;
use crate::model::SwitchyardConfig;

/// Largest accepted `genie.rate_limit_backoff` multiplier.
pub const MAX_RATE_LIMIT_BACKOFF: f64 = 60.0;
/// Largest accepted `genie.poll_interval_ms` (one hour).
pub const MAX_POLL_INTERVAL_MS: u64 = 3_600_000;
/// Largest accepted `genie.poll_deadline_secs` (one day).
pub const MAX_POLL_DEADLINE_SECS: u64 = 86_400;
/// Largest accepted `genie.request_timeout_secs` (one hour).
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 3_600;

/// Validate a deserialized configuration.
///
/// Collects every failure rather than stopping at the first one.
pub fn validate_config(config: &SwitchyardConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let min_conf = config.routing.min_data_confidence;
    if !(0.0..=1.0).contains(&min_conf) {
        fail(format!(
            "routing.min_data_confidence must be within 0.0..=1.0, got {min_conf}"
        ));
    }

    let genie = &config.genie;

    if genie.poll_max_attempts < 1 {
        fail("genie.poll_max_attempts must be at least 1".to_string());
    }

    if !(1..=MAX_POLL_INTERVAL_MS).contains(&genie.poll_interval_ms) {
        fail(format!(
            "genie.poll_interval_ms must be within 1..={MAX_POLL_INTERVAL_MS}, got {}",
            genie.poll_interval_ms
        ));
    }

    let backoff = genie.rate_limit_backoff;
    if !(1.0..=MAX_RATE_LIMIT_BACKOFF).contains(&backoff) {
        fail(format!(
            "genie.rate_limit_backoff must be within 1.0..={MAX_RATE_LIMIT_BACKOFF}, got {backoff}"
        ));
    }

    if !(1..=MAX_REQUEST_TIMEOUT_SECS).contains(&genie.request_timeout_secs) {
        fail(format!(
            "genie.request_timeout_secs must be within 1..={MAX_REQUEST_TIMEOUT_SECS}, got {}",
            genie.request_timeout_secs
        ));
    }

    if !(1..=MAX_POLL_DEADLINE_SECS).contains(&genie.poll_deadline_secs) {
        fail(format!(
            "genie.poll_deadline_secs must be within 1..={MAX_POLL_DEADLINE_SECS}, got {}",
            genie.poll_deadline_secs
        ));
    }

    if let Some(host) = genie.host.as_deref() {
        if host.contains("://") {
            fail(format!(
                "genie.host `{host}` must be a bare host name without a URL scheme"
            ));
        } else if host.trim().is_empty() {
            fail("genie.host must not be empty".to_string());
        }
    }

    if let Some(space) = genie.space_id.as_deref()
        && space.trim().is_empty()
    {
        fail("genie.space_id must not be empty".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
