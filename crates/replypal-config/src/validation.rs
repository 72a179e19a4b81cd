// SPDX-FileCopyrightText: 2026 Replypal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as known log levels, plain file names, and URL schemes.

use crate::diagnostic::ConfigError;
use crate::model::ReplypalConfig;

/// Log levels accepted by `app.log_level`.
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &ReplypalConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let level = config.app.normalized_log_level();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "app.log_level `{}` is not one of {}",
                config.app.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    // Key file name must be a bare file name
    let file_name = config.keyfile.file_name.trim();
    if file_name.is_empty() {
        errors.push(ConfigError::Validation {
            message: "keyfile.file_name must not be empty".to_string(),
        });
    } else if file_name.contains('/')
        || file_name.contains('\\')
        || file_name == "."
        || file_name == ".."
    {
        errors.push(ConfigError::Validation {
            message: format!(
                "keyfile.file_name `{file_name}` must be a file name, not a path (use keyfile.directory)"
            ),
        });
    }

    if let Some(dir) = &config.keyfile.directory
        && dir.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "keyfile.directory must not be empty when set".to_string(),
        });
    }

    let base_url = config.validator.base_url.trim();
    if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
        errors.push(ConfigError::Validation {
            message: format!("validator.base_url `{base_url}` must start with http:// or https://"),
        });
    }

    if config.validator.model.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "validator.model must not be empty".to_string(),
        });
    }

    if config.validator.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "validator.timeout_secs must be at least 1".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
