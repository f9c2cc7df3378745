// SPDX-FileCopyrightText: 2026 Reconnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./reconnect.toml` > `~/.config/reconnect/reconnect.toml`
//! > `/etc/reconnect/reconnect.toml` with environment variable overrides via
//! the `RECONNECT_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::ReconnectConfig;

/// Sections that environment variables may address.
const ENV_SECTIONS: [&str; 5] = ["service", "storage", "server", "analytics", "metrics"];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/reconnect/reconnect.toml` (system-wide)
/// 3. `~/.config/reconnect/reconnect.toml` (user XDG config)
/// 4. `./reconnect.toml` (local directory)
/// 5. `RECONNECT_*` environment variables
pub fn load_config() -> Result<ReconnectConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<ReconnectConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ReconnectConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<ReconnectConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ReconnectConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(ReconnectConfig::default()))
        .merge(Toml::file("/etc/reconnect/reconnect.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("reconnect/reconnect.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("reconnect.toml"))
        .merge(env_provider())
}

/// Environment provider mapping `RECONNECT_<SECTION>_<KEY>` to `section.key`.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `RECONNECT_ANALYTICS_QUERY_TIMEOUT_SECS` must become
/// `analytics.query_timeout_secs`.
fn env_provider() -> Env {
    Env::prefixed("RECONNECT_").map(|key| {
        let key_str = key.as_str();
        for section in ENV_SECTIONS {
            if let Some(rest) = key_str
                .strip_prefix(section)
                .and_then(|r| r.strip_prefix('_'))
            {
                return format!("{section}.{rest}").into();
            }
        }
        key_str.to_string().into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_vars_map_to_sections() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("RECONNECT_ANALYTICS_QUERY_TIMEOUT_SECS", "3");
            jail.set_env("RECONNECT_SERVER_PORT", "8088");
            jail.set_env("RECONNECT_STORAGE_DATABASE_PATH", "/tmp/env.db");
            let config = load_config()?;
            assert_eq!(config.analytics.query_timeout_secs, 3);
            assert_eq!(config.server.port, 8088);
            assert_eq!(config.storage.database_path, "/tmp/env.db");
            Ok(())
        });
    }

    #[test]
    fn local_file_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "reconnect.toml",
                r#"
[analytics]
utc_offset_minutes = 120
"#,
            )?;
            let config = load_config()?;
            assert_eq!(config.analytics.utc_offset_minutes, 120);
            assert_eq!(config.analytics.default_window_days, 30);
            Ok(())
        });
    }

    #[test]
    fn env_beats_local_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("reconnect.toml", "[server]\nport = 4000\n")?;
            jail.set_env("RECONNECT_SERVER_PORT", "4001");
            let config = load_config()?;
            assert_eq!(config.server.port, 4001);
            Ok(())
        });
    }
}
