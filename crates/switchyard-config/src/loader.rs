// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./switchyard.toml` > `~/.config/switchyard/switchyard.toml`
//! > `/etc/switchyard/switchyard.toml`, with `SWITCHYARD_*` environment overrides
//! and the Databricks deployment variables (`DATABRICKS_HOST`, `DATABRICKS_TOKEN`,
//! `GENIE_SPACE_ID`) on top.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use tracing::debug;

use crate::model::SwitchyardConfig;

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "switchyard.toml";

/// System-wide config file.
pub const SYSTEM_CONFIG_FILE: &str = "/etc/switchyard/switchyard.toml";

/// Path of the per-user config file, if a config dir exists on this platform.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("switchyard").join(LOCAL_CONFIG_FILE))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/switchyard/switchyard.toml`
/// 3. `~/.config/switchyard/switchyard.toml`
/// 4. `./switchyard.toml`
/// 5. `SWITCHYARD_*` environment variables
/// 6. `DATABRICKS_HOST`, `DATABRICKS_TOKEN`, `GENIE_SPACE_ID`
pub fn load_config() -> Result<SwitchyardConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<SwitchyardConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SwitchyardConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<SwitchyardConfig, figment::Error> {
    debug!(path = %path.display(), "loading configuration file");
    Figment::new()
        .merge(Serialized::defaults(SwitchyardConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .merge(deployment_env_provider())
        .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(SwitchyardConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_FILE))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
        .merge(deployment_env_provider())
}

/// `SWITCHYARD_*` variables mapped to `section.key`.
///
/// Uses `Env::map()` rather than `Env::split("_")` because keys contain
/// underscores: `SWITCHYARD_GENIE_POLL_MAX_ATTEMPTS` must become
/// `genie.poll_max_attempts`, not `genie.poll.max.attempts`.
fn env_provider() -> Env {
    Env::prefixed("SWITCHYARD_").map(|key| {
        let mapped = key
            .as_str()
            .replacen("agent_", "agent.", 1)
            .replacen("routing_", "routing.", 1)
            .replacen("genie_", "genie.", 1);
        mapped.into()
    })
}

/// The unprefixed variables a Databricks App deployment provides.
fn deployment_env_provider() -> Env {
    Env::raw().filter_map(|key| match key.as_str().to_ascii_uppercase().as_str() {
        "DATABRICKS_HOST" => Some("genie.host".into()),
        "DATABRICKS_TOKEN" => Some("genie.token".into()),
        "GENIE_SPACE_ID" => Some("genie.space_id".into()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_prefix_maps_sections() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("SWITCHYARD_GENIE_POLL_MAX_ATTEMPTS", "12");
            jail.set_env("SWITCHYARD_ROUTING_MIN_DATA_CONFIDENCE", "0.7");
            let config: SwitchyardConfig = Figment::new()
                .merge(Serialized::defaults(SwitchyardConfig::default()))
                .merge(env_provider())
                .extract()?;
            assert_eq!(config.genie.poll_max_attempts, 12);
            assert!((config.routing.min_data_confidence - 0.7).abs() < f32::EPSILON);
            Ok(())
        });
    }

    #[test]
    fn deployment_variables_fill_genie_section() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("DATABRICKS_HOST", "adb-123.azuredatabricks.net");
            jail.set_env("GENIE_SPACE_ID", "space-42");
            jail.set_env("DATABRICKS_TOKEN", "dapi-test");
            let config: SwitchyardConfig = Figment::new()
                .merge(Serialized::defaults(SwitchyardConfig::default()))
                .merge(deployment_env_provider())
                .extract()?;
            assert_eq!(config.genie.host.as_deref(), Some("adb-123.azuredatabricks.net"));
            assert_eq!(config.genie.space_id.as_deref(), Some("space-42"));
            assert_eq!(config.genie.token.as_deref(), Some("dapi-test"));
            Ok(())
        });
    }

    #[test]
    fn config_file_in_jail_is_loaded() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                LOCAL_CONFIG_FILE,
                r#"
                [genie]
                space_id = "from-file"
                "#,
            )?;
            let config = load_config_from_path(Path::new(LOCAL_CONFIG_FILE))?;
            assert_eq!(config.genie.space_id.as_deref(), Some("from-file"));
            Ok(())
        });
    }
}
