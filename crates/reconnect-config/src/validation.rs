// SPDX-FileCopyrightText: 2026 Reconnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as valid bind addresses, non-empty paths, and numeric ranges.

use crate::diagnostic::ConfigError;
use crate::model::ReconnectConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &ReconnectConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if !LOG_LEVELS.contains(&config.service.log_level.as_str()) {
        fail(format!(
            "service.log_level `{}` must be one of {}",
            config.service.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    let host = config.server.host.trim();
    if host.is_empty() {
        fail("server.host must not be empty".to_string());
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            fail(format!(
                "server.host `{host}` is not a valid IP address or hostname"
            ));
        }
    }

    let analytics = &config.analytics;
    if analytics.query_timeout_secs == 0 {
        fail("analytics.query_timeout_secs must be at least 1".to_string());
    }
    if analytics.default_window_days == 0 {
        fail("analytics.default_window_days must be at least 1".to_string());
    }
    if !(-720..=840).contains(&analytics.utc_offset_minutes) {
        fail(format!(
            "analytics.utc_offset_minutes must be between -720 and 840, got {}",
            analytics.utc_offset_minutes
        ));
    }
    if analytics.max_page_size == 0 {
        fail("analytics.max_page_size must be at least 1".to_string());
    }
    if analytics.default_page_size == 0 || analytics.default_page_size > analytics.max_page_size {
        fail(format!(
            "analytics.default_page_size must be between 1 and max_page_size ({}), got {}",
            analytics.max_page_size, analytics.default_page_size
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_message(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        let config = ReconnectConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = ReconnectConfig::default();
        config.storage.database_path = "".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "database_path"));
    }

    #[test]
    fn zero_timeout_and_bad_offset_are_both_reported() {
        let mut config = ReconnectConfig::default();
        config.analytics.query_timeout_secs = 0;
        config.analytics.utc_offset_minutes = 900;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(has_message(&errors, "query_timeout_secs"));
        assert!(has_message(&errors, "utc_offset_minutes"));
    }

    #[test]
    fn default_page_size_above_max_fails() {
        let mut config = ReconnectConfig::default();
        config.analytics.default_page_size = 50;
        config.analytics.max_page_size = 25;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "default_page_size"));
    }

    #[test]
    fn unknown_log_level_fails() {
        let mut config = ReconnectConfig::default();
        config.service.log_level = "verbose".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "log_level"));
    }

    #[test]
    fn invalid_host_fails() {
        let mut config = ReconnectConfig::default();
        config.server.host = "local host!".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "server.host"));
    }

    #[test]
    fn valid_custom_config_passes() {
        let mut config = ReconnectConfig::default();
        config.server.host = "0.0.0.0".to_string();
        config.storage.database_path = "/tmp/test.db".to_string();
        config.analytics.utc_offset_minutes = -300;
        assert!(validate_config(&config).is_ok());
    }
}
