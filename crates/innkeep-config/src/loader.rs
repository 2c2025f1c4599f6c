// SPDX-FileCopyrightText: 2026 Innkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./innkeep.toml` > `~/.config/innkeep/innkeep.toml`
//! > `/etc/innkeep/innkeep.toml` with environment variable overrides via the
//! `INNKEEP_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::InnkeepConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/innkeep/innkeep.toml` (system-wide)
/// 3. `~/.config/innkeep/innkeep.toml` (user XDG config)
/// 4. `./innkeep.toml` (local directory)
/// 5. `INNKEEP_*` environment variables
pub fn load_config() -> Result<InnkeepConfig, figment::Error> {
    base_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<InnkeepConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(InnkeepConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<InnkeepConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(InnkeepConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for the standard load (exposed for diagnostics so
/// callers can inspect provider metadata before extraction).
pub fn base_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(InnkeepConfig::default()))
        .merge(Toml::file("/etc/innkeep/innkeep.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("innkeep/innkeep.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("innkeep.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `INNKEEP_MAILBOX_POLL_INTERVAL_SECS` must map to
/// `mailbox.poll_interval_secs`, not `mailbox.poll.interval.secs`.
fn env_provider() -> Env {
    Env::prefixed("INNKEEP_").map(|key| {
        // `key` is the lowercased env var name with the prefix stripped,
        // e.g. INNKEEP_MAILBOX_HOST -> "mailbox_host".
        let mapped = key
            .as_str()
            .replacen("service_", "service.", 1)
            .replacen("server_", "server.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("mailbox_", "mailbox.", 1)
            .replacen("analysis_", "analysis.", 1);
        mapped.into()
    })
}
