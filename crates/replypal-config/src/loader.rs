// SPDX-FileCopyrightText: 2026 Replypal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./replypal.toml` > `~/.config/replypal/replypal.toml` > `/etc/replypal/replypal.toml`
//! with environment variable overrides via `REPLYPAL_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::ReplypalConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/replypal/replypal.toml";

/// Local config file, relative to the working directory.
pub const LOCAL_CONFIG_FILE: &str = "replypal.toml";

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/replypal/replypal.toml` (system-wide)
/// 3. `~/.config/replypal/replypal.toml` (user XDG config)
/// 4. `./replypal.toml` (local directory)
/// 5. `REPLYPAL_*` environment variables
pub fn load_config() -> Result<ReplypalConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<ReplypalConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ReplypalConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<ReplypalConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ReplypalConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(ReplypalConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("replypal/replypal.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `REPLYPAL_KEYFILE_FILE_NAME` must map to `keyfile.file_name`,
/// not `keyfile.file.name`.
///
/// `REPLYPAL_API_KEY` and `REPLYPAL_KEY_PASSWORD` carry secrets for the CLI
/// and are never config keys, so they are filtered out here.
fn env_provider() -> Env {
    Env::prefixed("REPLYPAL_")
        .ignore(&["api_key", "key_password"])
        .map(|key| {
            // `key` keeps the env var's case with the prefix stripped.
            // Example: REPLYPAL_VALIDATOR_TIMEOUT_SECS -> "validator.timeout_secs"
            let key_str = key.as_str().to_ascii_lowercase();
            let mapped = key_str
                .replacen("app_", "app.", 1)
                .replacen("keyfile_", "keyfile.", 1)
                .replacen("validator_", "validator.", 1);
            mapped.into()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_vars_map_to_sections() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("REPLYPAL_KEYFILE_FILE_NAME", "work.enc");
            jail.set_env("REPLYPAL_VALIDATOR_TIMEOUT_SECS", "30");
            jail.set_env("REPLYPAL_APP_LOG_LEVEL", "debug");

            let config: ReplypalConfig = Figment::new()
                .merge(Serialized::defaults(ReplypalConfig::default()))
                .merge(env_provider())
                .extract()?;

            assert_eq!(config.keyfile.file_name, "work.enc");
            assert_eq!(config.validator.timeout_secs, 30);
            assert_eq!(config.app.log_level, "debug");
            Ok(())
        });
    }

    #[test]
    fn secret_env_vars_are_not_config_keys() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("REPLYPAL_API_KEY", "sk-test-12345");
            jail.set_env("REPLYPAL_KEY_PASSWORD", "correct horse");

            let config: ReplypalConfig = Figment::new()
                .merge(Serialized::defaults(ReplypalConfig::default()))
                .merge(env_provider())
                .extract()?;

            assert_eq!(config.keyfile.file_name, "gemini-api-key.enc");
            Ok(())
        });
    }

    #[test]
    fn local_file_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                LOCAL_CONFIG_FILE,
                r#"
[keyfile]
directory = "/srv/keys"
"#,
            )?;

            let config: ReplypalConfig = Figment::new()
                .merge(Serialized::defaults(ReplypalConfig::default()))
                .merge(Toml::file(LOCAL_CONFIG_FILE))
                .extract()?;

            assert_eq!(config.keyfile.directory.as_deref(), Some("/srv/keys"));
            assert_eq!(config.keyfile.file_name, "gemini-api-key.enc");
            Ok(())
        });
    }
}
