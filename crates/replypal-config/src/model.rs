// SPDX-FileCopyrightText: 2026 Replypal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Replypal.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.
//!
//! Envelope KDF and cipher parameters are protocol constants and are
//! deliberately absent here: changing them would make existing key files
//! unopenable.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level Replypal configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ReplypalConfig {
    /// Process-wide settings.
    #[serde(default)]
    pub app: AppConfig,

    /// Where sealed key files are written and read.
    #[serde(default)]
    pub keyfile: KeyFileConfig,

    /// API key liveness check settings.
    #[serde(default)]
    pub validator: ValidatorConfig,
}

/// Process-wide settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// `log_level` trimmed and lowercased, ready for a tracing filter directive.
    pub fn normalized_log_level(&self) -> String {
        self.log_level.trim().to_ascii_lowercase()
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Key file location settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KeyFileConfig {
    /// File name of the sealed key file.
    #[serde(default = "default_file_name")]
    pub file_name: String,

    /// Directory holding key files. `None` means the current directory.
    #[serde(default)]
    pub directory: Option<String>,
}

impl Default for KeyFileConfig {
    fn default() -> Self {
        Self {
            file_name: default_file_name(),
            directory: None,
        }
    }
}

impl KeyFileConfig {
    /// Directory key files live in.
    pub fn directory_path(&self) -> PathBuf {
        self.directory
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

fn default_file_name() -> String {
    "gemini-api-key.enc".to_string()
}

/// Liveness check configuration for the generative-AI API key.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ValidatorConfig {
    /// Check keys against the remote service before sealing and after opening.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Base URL of the generative-AI API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model used for the liveness check request.
    #[serde(default = "default_model")]
    pub model: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}
