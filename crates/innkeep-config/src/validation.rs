// SPDX-FileCopyrightText: 2026 Innkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as valid bind addresses, non-empty paths, and mailbox
//! credential completeness. Collects all errors rather than failing fast.

use crate::diagnostic::ConfigError;
use crate::model::InnkeepConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// every collected validation error.
pub fn validate_config(config: &InnkeepConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // Bind address must be present and plausible.
    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!(
                    "server.host `{host}` is not a valid IP address or hostname"
                ),
            });
        }
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    // Mailbox ingestion needs a complete connection description when enabled.
    if config.mailbox.enabled {
        if config.mailbox.host.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: "mailbox.host is required when mailbox.enabled = true"
                    .to_string(),
            });
        }
        if config.mailbox.username.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: "mailbox.username is required when mailbox.enabled = true"
                    .to_string(),
            });
        }
        if config.mailbox.password.is_empty() {
            errors.push(ConfigError::Validation {
                message: "mailbox.password is required when mailbox.enabled = true \
                          (set INNKEEP_MAILBOX_PASSWORD)"
                    .to_string(),
            });
        }
        if config.mailbox.batch_size == 0 {
            errors.push(ConfigError::Validation {
                message: "mailbox.batch_size must be at least 1".to_string(),
            });
        }
        if config.mailbox.poll_interval_secs == 0 {
            errors.push(ConfigError::Validation {
                message: "mailbox.poll_interval_secs must be at least 1".to_string(),
            });
        }
        if config.mailbox.backoff_base_ms == 0 {
            errors.push(ConfigError::Validation {
                message: "mailbox.backoff_base_ms must be at least 1".to_string(),
            });
        }
        if config.mailbox.backoff_cap_ms < config.mailbox.backoff_base_ms {
            errors.push(ConfigError::Validation {
                message: format!(
                    "mailbox.backoff_cap_ms ({}) must not be below mailbox.backoff_base_ms ({})",
                    config.mailbox.backoff_cap_ms, config.mailbox.backoff_base_ms
                ),
            });
        }
    }

    if config.analysis.endpoint.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "analysis.endpoint must not be empty".to_string(),
        });
    }

    if config.analysis.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "analysis.timeout_secs must be at least 1".to_string(),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
