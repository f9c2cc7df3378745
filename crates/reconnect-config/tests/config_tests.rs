// SPDX-FileCopyrightText: 2026 Reconnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Reconnect configuration system.

use std::io::Write;

use reconnect_config::diagnostic::ConfigError;
use reconnect_config::{
    load_and_validate_path, load_and_validate_str, load_config_from_str,
};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_reconnect_config() {
    let toml = r#"
[service]
name = "dashboard-analytics"
log_level = "debug"

[storage]
database_path = "/tmp/outreach.db"
wal_mode = false
busy_timeout_ms = 250

[server]
enabled = false
host = "0.0.0.0"
port = 8080

[analytics]
query_timeout_secs = 4
default_window_days = 14
utc_offset_minutes = 60
default_page_size = 10
max_page_size = 50

[metrics]
prometheus_enabled = false
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.service.name, "dashboard-analytics");
    assert_eq!(config.service.log_level, "debug");
    assert_eq!(config.storage.database_path, "/tmp/outreach.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.storage.busy_timeout_ms, 250);
    assert!(!config.server.enabled);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.analytics.query_timeout_secs, 4);
    assert_eq!(config.analytics.default_window_days, 14);
    assert_eq!(config.analytics.utc_offset_minutes, 60);
    assert_eq!(config.analytics.default_page_size, 10);
    assert_eq!(config.analytics.max_page_size, 50);
    assert!(!config.metrics.prometheus_enabled);
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_optional_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.service.name, "reconnect");
    assert_eq!(config.service.log_level, "info");
    assert!(config.storage.wal_mode);
    assert!(config.server.enabled);
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.analytics.query_timeout_secs, 10);
    assert_eq!(config.analytics.default_window_days, 30);
    assert_eq!(config.analytics.utc_offset_minutes, 0);
    assert_eq!(config.analytics.default_page_size, 20);
    assert_eq!(config.analytics.max_page_size, 100);
    assert!(config.metrics.prometheus_enabled);
}

/// An unknown key produces an UnknownKey diagnostic with a suggestion.
#[test]
fn unknown_key_produces_suggestion() {
    let toml = r#"
[server]
prot = 8080
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject unknown key");
    let unknown = errors
        .iter()
        .find_map(|e| match e {
            ConfigError::UnknownKey {
                key, suggestion, ..
            } => Some((key.clone(), suggestion.clone())),
            _ => None,
        })
        .expect("should contain an UnknownKey error");
    assert_eq!(unknown.0, "prot");
    assert_eq!(unknown.1.as_deref(), Some("port"));
}

/// A wrongly typed value yields an InvalidType diagnostic naming the key path.
#[test]
fn wrong_type_produces_invalid_type() {
    let toml = r#"
[analytics]
default_window_days = "thirty"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject string for integer");
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::InvalidType { key, .. } if key.contains("default_window_days")
    )));
}

/// Parsed but semantically invalid values are all reported together.
#[test]
fn validation_errors_are_collected() {
    let toml = r#"
[analytics]
query_timeout_secs = 0
default_window_days = 0
"#;

    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    let validation_count = errors
        .iter()
        .filter(|e| matches!(e, ConfigError::Validation { .. }))
        .count();
    assert_eq!(validation_count, 2);
}

/// A config file on disk loads through the path entry point.
#[test]
fn loads_from_explicit_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reconnect.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "[analytics]\nutc_offset_minutes = -300").unwrap();

    let config = load_and_validate_path(&path).expect("file config should validate");
    assert_eq!(config.analytics.utc_offset_minutes, -300);
}

/// Diagnostics render through miette without panicking.
#[test]
fn errors_render_without_panicking() {
    let errors = load_and_validate_str("[storage]\ndatabse_path = \"x\"\n").unwrap_err();
    reconnect_config::render_errors(&errors);
}
