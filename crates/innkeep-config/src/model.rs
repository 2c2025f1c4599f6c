// SPDX-FileCopyrightText: 2026 Innkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Innkeep back office.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Innkeep configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct InnkeepConfig {
    /// Service identity and logging settings.
    #[serde(default)]
    pub service: ServiceConfig,

    /// HTTP gateway settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Mailbox ingestion settings.
    #[serde(default)]
    pub mailbox: MailboxConfig,

    /// Classification service settings.
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// Service identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Display name of the service.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_service_name() -> String {
    "innkeep".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("innkeep").join("innkeep.db"))
        .and_then(|p| p.to_str().map(String::from))
        .unwrap_or_else(|| "innkeep.db".to_string())
}

fn default_wal_mode() -> bool {
    true
}

/// Mailbox ingestion configuration.
///
/// Ingestion is disabled unless `enabled` is set and the connection fields
/// are provided. The password is usually supplied via the
/// `INNKEEP_MAILBOX_PASSWORD` environment variable rather than the TOML file.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MailboxConfig {
    /// Enable the ingestion pipeline.
    #[serde(default)]
    pub enabled: bool,

    /// IMAP server hostname.
    #[serde(default)]
    pub host: String,

    /// IMAP server port (implicit TLS).
    #[serde(default = "default_imap_port")]
    pub port: u16,

    /// Account username.
    #[serde(default)]
    pub username: String,

    /// Account password.
    #[serde(default)]
    pub password: String,

    /// Mailbox to poll.
    #[serde(default = "default_mailbox")]
    pub mailbox: String,

    /// Seconds between poll ticks.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Messages fetched per round-trip.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Reconnect backoff base delay in milliseconds.
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,

    /// Reconnect backoff ceiling in milliseconds.
    #[serde(default = "default_backoff_cap_ms")]
    pub backoff_cap_ms: u64,
}

impl Default for MailboxConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            host: String::new(),
            port: default_imap_port(),
            username: String::new(),
            password: String::new(),
            mailbox: default_mailbox(),
            poll_interval_secs: default_poll_interval_secs(),
            batch_size: default_batch_size(),
            backoff_base_ms: default_backoff_base_ms(),
            backoff_cap_ms: default_backoff_cap_ms(),
        }
    }
}

fn default_imap_port() -> u16 {
    993
}

fn default_mailbox() -> String {
    "INBOX".to_string()
}

fn default_poll_interval_secs() -> u64 {
    30
}

fn default_batch_size() -> usize {
    10
}

fn default_backoff_base_ms() -> u64 {
    5000
}

fn default_backoff_cap_ms() -> u64 {
    30_000
}

/// Classification service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Endpoint accepting `{subject, body, from_email}` JSON.
    #[serde(default = "default_analysis_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds.
    #[serde(default = "default_analysis_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            endpoint: default_analysis_endpoint(),
            timeout_secs: default_analysis_timeout_secs(),
        }
    }
}

fn default_analysis_endpoint() -> String {
    "http://127.0.0.1:5000/api/process_email".to_string()
}

fn default_analysis_timeout_secs() -> u64 {
    30
}
