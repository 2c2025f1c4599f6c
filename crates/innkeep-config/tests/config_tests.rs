// SPDX-FileCopyrightText: 2026 Innkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Innkeep configuration system.

use innkeep_config::diagnostic::{ConfigError, suggest_key};
use innkeep_config::model::InnkeepConfig;
use innkeep_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_innkeep_config() {
    let toml = r#"
[service]
name = "test-backoffice"
log_level = "debug"

[server]
host = "0.0.0.0"
port = 9090

[storage]
database_path = "/tmp/test.db"
wal_mode = false

[mailbox]
enabled = true
host = "imap.example.com"
port = 993
username = "bookings@example.com"
password = "hunter2"
mailbox = "Support"
poll_interval_secs = 15
batch_size = 5
backoff_base_ms = 1000
backoff_cap_ms = 8000

[analysis]
endpoint = "http://analysis.internal:5000/api/process_email"
timeout_secs = 10
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.service.name, "test-backoffice");
    assert_eq!(config.service.log_level, "debug");
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.storage.database_path, "/tmp/test.db");
    assert!(!config.storage.wal_mode);
    assert!(config.mailbox.enabled);
    assert_eq!(config.mailbox.host, "imap.example.com");
    assert_eq!(config.mailbox.username, "bookings@example.com");
    assert_eq!(config.mailbox.mailbox, "Support");
    assert_eq!(config.mailbox.poll_interval_secs, 15);
    assert_eq!(config.mailbox.batch_size, 5);
    assert_eq!(config.mailbox.backoff_base_ms, 1000);
    assert_eq!(config.mailbox.backoff_cap_ms, 8000);
    assert_eq!(
        config.analysis.endpoint,
        "http://analysis.internal:5000/api/process_email"
    );
    assert_eq!(config.analysis.timeout_secs, 10);
}

/// Unknown field in [mailbox] section produces an UnknownField error.
#[test]
fn unknown_field_in_mailbox_produces_error() {
    let toml = r#"
[mailbox]
hsot = "imap.example.com"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    // Figment wraps serde's deny_unknown_fields error
    assert!(
        err_str.contains("unknown field") || err_str.contains("hsot"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Unknown top-level section is rejected.
#[test]
fn unknown_section_produces_error() {
    let toml = r#"
[mailserver]
host = "imap.example.com"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown section");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("mailserver"),
        "error should mention unknown field, got: {err_str}"
    );
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_optional_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.service.name, "innkeep");
    assert_eq!(config.service.log_level, "info");
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8080);
    assert!(config.storage.wal_mode);
    assert!(!config.mailbox.enabled);
    assert_eq!(config.mailbox.port, 993);
    assert_eq!(config.mailbox.mailbox, "INBOX");
    assert_eq!(config.mailbox.poll_interval_secs, 30);
    assert_eq!(config.mailbox.batch_size, 10);
    assert_eq!(config.mailbox.backoff_base_ms, 5000);
    assert_eq!(config.mailbox.backoff_cap_ms, 30_000);
    assert_eq!(config.analysis.timeout_secs, 30);
}

/// An override via dot notation (how INNKEEP_MAILBOX_HOST reaches Figment)
/// wins over the TOML value.
#[test]
fn override_wins_over_toml_value() {
    use figment::{
        Figment,
        providers::{Format, Serialized, Toml},
    };

    let toml_content = r#"
[mailbox]
host = "from-toml.example.com"
"#;

    let config: InnkeepConfig = Figment::new()
        .merge(Serialized::defaults(InnkeepConfig::default()))
        .merge(Toml::string(toml_content))
        .merge(("mailbox.host", "from-env.example.com"))
        .extract()
        .expect("should merge override");

    assert_eq!(config.mailbox.host, "from-env.example.com");
}

/// `INNKEEP_MAILBOX_POLL_INTERVAL_SECS` must map to
/// `mailbox.poll_interval_secs`, not `mailbox.poll.interval.secs`.
#[test]
fn underscore_keys_map_to_single_config_key() {
    use figment::{Figment, providers::Serialized};

    let config: InnkeepConfig = Figment::new()
        .merge(Serialized::defaults(InnkeepConfig::default()))
        .merge(("mailbox.poll_interval_secs", 7u64))
        .extract()
        .expect("should set poll_interval_secs via dot notation");

    assert_eq!(config.mailbox.poll_interval_secs, 7);
}

/// load_and_validate_str surfaces semantic validation errors.
#[test]
fn validation_errors_surface_through_load_and_validate() {
    let toml = r#"
[mailbox]
enabled = true
"#;

    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    assert!(errors.len() >= 3, "expected host/username/password errors");
    assert!(
        errors
            .iter()
            .all(|e| matches!(e, ConfigError::Validation { .. }))
    );
}

/// Typo suggestions surface for mailbox section keys.
#[test]
fn typo_suggestion_for_mailbox_keys() {
    let valid = &[
        "enabled",
        "host",
        "port",
        "username",
        "password",
        "mailbox",
        "poll_interval_secs",
        "batch_size",
        "backoff_base_ms",
        "backoff_cap_ms",
    ];
    assert_eq!(
        suggest_key("poll_intervall_secs", valid),
        Some("poll_interval_secs".to_string())
    );
    assert_eq!(suggest_key("batchsize", valid), Some("batch_size".to_string()));
}

/// Wrong value type for a numeric key is a type error, not a silent default.
#[test]
fn wrong_type_for_port_produces_error() {
    let toml = r#"
[server]
port = "eighty-eighty"
"#;

    let err = load_config_from_str(toml).expect_err("should reject string port");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("invalid type") || err_str.contains("u16") || err_str.contains("number"),
        "error should mention a type problem, got: {err_str}"
    );
}
