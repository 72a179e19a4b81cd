// SPDX-FileCopyrightText: 2026 Replypal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory key file store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use replypal_core::{KeyFileStore, ReplypalError};

/// A key file store that keeps files in a map.
#[derive(Debug, Default)]
pub struct MemoryKeyFileStore {
    files: Mutex<HashMap<String, String>>,
}

impl MemoryKeyFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current contents of `name`, if saved.
    pub async fn get(&self, name: &str) -> Option<String> {
        self.files.lock().await.get(name).cloned()
    }

    /// Overwrite `name` directly, bypassing the trait.
    pub async fn put(&self, name: &str, contents: impl Into<String>) {
        self.files.lock().await.insert(name.to_string(), contents.into());
    }

    /// Number of stored files.
    pub async fn len(&self) -> usize {
        self.files.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.files.lock().await.is_empty()
    }
}

#[async_trait]
impl KeyFileStore for MemoryKeyFileStore {
    async fn save(&self, name: &str, contents: &str) -> Result<(), ReplypalError> {
        self.put(name, contents).await;
        Ok(())
    }

    async fn load(&self, name: &str) -> Result<String, ReplypalError> {
        self.get(name).await.ok_or_else(|| ReplypalError::Storage {
            source: Box::new(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no key file named {name}"),
            )),
        })
    }
}
