// SPDX-FileCopyrightText: 2026 Replypal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key file persistence (the "download" and "upload" side of the workflow).

use async_trait::async_trait;

use crate::error::ReplypalError;

/// Saves and loads sealed key files by name.
///
/// Key files hold only envelope text; plaintext secrets never pass through
/// a store.
#[async_trait]
pub trait KeyFileStore: Send + Sync {
    /// Writes `contents` under `name`, replacing any existing file.
    async fn save(&self, name: &str, contents: &str) -> Result<(), ReplypalError>;

    /// Reads the file stored under `name`.
    async fn load(&self, name: &str) -> Result<String, ReplypalError>;
}
