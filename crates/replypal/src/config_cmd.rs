// SPDX-FileCopyrightText: 2026 Replypal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `replypal config` command implementation.

use replypal_config::model::ReplypalConfig;
use replypal_core::ReplypalError;

/// Render the effective configuration as pretty JSON.
pub fn render_config(config: &ReplypalConfig) -> Result<String, ReplypalError> {
    serde_json::to_string_pretty(config)
        .map_err(|e| ReplypalError::Internal(format!("failed to serialize config: {e}")))
}

/// Run the `replypal config` command.
pub fn run_config(config: &ReplypalConfig) -> Result<(), ReplypalError> {
    println!("{}", render_config(config)?);
    Ok(())
}
