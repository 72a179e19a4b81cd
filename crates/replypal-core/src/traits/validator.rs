// SPDX-FileCopyrightText: 2026 Replypal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Liveness check for a recovered API key.

use async_trait::async_trait;

use crate::error::ReplypalError;

/// Checks whether an API key is accepted by the remote service.
#[async_trait]
pub trait KeyValidator: Send + Sync {
    /// Returns the human-readable name of this validator.
    fn name(&self) -> &str;

    /// Returns `Ok(true)` if the remote service accepts `api_key`.
    ///
    /// A rejected key is `Ok(false)`, not an error.
    async fn validate(&self, api_key: &str) -> Result<bool, ReplypalError>;
}
