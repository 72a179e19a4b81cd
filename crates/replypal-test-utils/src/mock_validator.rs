// SPDX-FileCopyrightText: 2026 Replypal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock API key validator.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use replypal_core::{KeyValidator, ReplypalError};

/// A key validator with a fixed verdict that records the keys it was asked about.
#[derive(Debug)]
pub struct MockValidator {
    accept: AtomicBool,
    error: Option<String>,
    seen: Mutex<Vec<String>>,
}

impl MockValidator {
    /// Validator that accepts every key.
    pub fn accepting() -> Self {
        Self::with_verdict(true)
    }

    /// Validator that rejects every key.
    pub fn rejecting() -> Self {
        Self::with_verdict(false)
    }

    /// Validator whose check itself fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::accepting()
        }
    }

    fn with_verdict(accept: bool) -> Self {
        Self {
            accept: AtomicBool::new(accept),
            error: None,
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Change the verdict for later calls.
    pub fn set_accept(&self, accept: bool) {
        self.accept.store(accept, Ordering::SeqCst);
    }

    /// Keys passed to `validate`, in call order.
    pub async fn seen(&self) -> Vec<String> {
        self.seen.lock().await.clone()
    }
}

#[async_trait]
impl KeyValidator for MockValidator {
    fn name(&self) -> &str {
        "mock-validator"
    }

    async fn validate(&self, api_key: &str) -> Result<bool, ReplypalError> {
        self.seen.lock().await.push(api_key.to_string());
        if let Some(message) = &self.error {
            return Err(ReplypalError::Validator {
                message: message.clone(),
                source: None,
            });
        }
        Ok(self.accept.load(Ordering::SeqCst))
    }
}
