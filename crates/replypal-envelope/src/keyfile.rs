// SPDX-FileCopyrightText: 2026 Replypal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key file lifecycle: create a sealed key file, load it back.
//!
//! Creating checks the key against the remote service before anything is
//! written, so a typo never ends up sealed. Loading checks it again after
//! decryption because keys can be revoked while the file sits on disk.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use replypal_core::{EnvelopeError, KeyFileStore, KeyValidator, RandomSource, ReplypalError};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};

use crate::envelope::{Envelope, SecretEnvelope};
use crate::random::SystemRandomSource;

/// Creates and loads password-sealed API key files.
pub struct KeyFileManager {
    store: Arc<dyn KeyFileStore>,
    validator: Option<Arc<dyn KeyValidator>>,
    envelope: SecretEnvelope<Arc<dyn RandomSource>>,
    file_name: String,
}

impl std::fmt::Debug for KeyFileManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyFileManager")
            .field("file_name", &self.file_name)
            .field("validator", &self.validator.as_ref().map(|v| v.name().to_string()))
            .finish_non_exhaustive()
    }
}

impl KeyFileManager {
    /// Manager writing `file_name` into `store`, with no liveness check.
    pub fn new(store: Arc<dyn KeyFileStore>, file_name: impl Into<String>) -> Self {
        Self {
            store,
            validator: None,
            envelope: SecretEnvelope::with_random_source(Arc::new(SystemRandomSource::new())),
            file_name: file_name.into(),
        }
    }

    /// Check keys with `validator` before sealing and after opening.
    pub fn with_validator(mut self, validator: Arc<dyn KeyValidator>) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Draw salts and nonces from `rng` instead of the system CSPRNG.
    pub fn with_random_source(mut self, rng: Arc<dyn RandomSource>) -> Self {
        self.envelope = SecretEnvelope::with_random_source(rng);
        self
    }

    /// Name of the key file this manager reads and writes.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Seal `api_key` under `password` and save it as the key file.
    ///
    /// Surrounding whitespace is trimmed from the key. Returns the trimmed key
    /// so the caller can start using it without reopening the file.
    pub async fn create(
        &self,
        api_key: &str,
        password: &SecretString,
    ) -> Result<SecretString, ReplypalError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(EnvelopeError::InvalidInput("API key must not be empty").into());
        }
        ensure_password(password)?;

        if !self.check_key(api_key).await? {
            return Err(ReplypalError::Validator {
                message: "the API key was rejected by the service; check it and try again"
                    .to_string(),
                source: None,
            });
        }

        let api_key = SecretString::from(api_key.to_string());
        let envelope = self
            .envelope
            .seal_async(api_key.clone(), password.clone())
            .await?;
        self.store.save(&self.file_name, &envelope.to_json()).await?;

        info!(file = %self.file_name, "key file created");
        Ok(api_key)
    }

    /// Load the key file and recover the API key with `password`.
    pub async fn load(&self, password: &SecretString) -> Result<SecretString, ReplypalError> {
        ensure_password(password)?;

        let text = self.store.load(&self.file_name).await?;
        let envelope = Envelope::from_json(&text)?;
        let api_key = self.envelope.open_async(envelope, password.clone()).await?;

        if !self.check_key(api_key.expose_secret()).await? {
            return Err(ReplypalError::Validator {
                message: "the decrypted key was rejected; it may have expired or been revoked"
                    .to_string(),
                source: None,
            });
        }

        info!(file = %self.file_name, "key file loaded");
        Ok(api_key)
    }

    async fn check_key(&self, api_key: &str) -> Result<bool, ReplypalError> {
        let Some(validator) = &self.validator else {
            debug!("no key validator configured, skipping liveness check");
            return Ok(true);
        };

        let valid = validator.validate(api_key).await?;
        if !valid {
            warn!(validator = validator.name(), "API key failed liveness check");
        }
        Ok(valid)
    }
}

/// Whitespace-only passwords are refused even though the password itself is
/// used untrimmed.
fn ensure_password(password: &SecretString) -> Result<(), EnvelopeError> {
    if password.expose_secret().trim().is_empty() {
        return Err(EnvelopeError::InvalidInput("password must not be empty"));
    }
    Ok(())
}

/// Key files stored in a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsKeyFileStore {
    root: PathBuf,
}

impl FsKeyFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Full path of the key file called `name`.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

async fn write_then_rename(tmp: &Path, path: &Path, contents: &str) -> std::io::Result<()> {
    tokio::fs::write(tmp, contents).await?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(tmp, std::fs::Permissions::from_mode(0o600)).await?;
    }

    tokio::fs::rename(tmp, path).await
}

fn storage_err(e: std::io::Error) -> ReplypalError {
    ReplypalError::Storage {
        source: Box::new(e),
    }
}

#[async_trait]
impl KeyFileStore for FsKeyFileStore {
    async fn save(&self, name: &str, contents: &str) -> Result<(), ReplypalError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(storage_err)?;

        // Write then rename so a crash never leaves a half-written key file.
        let path = self.path_for(name);
        let tmp = self.path_for(&format!(".{name}.tmp"));
        if let Err(e) = write_then_rename(&tmp, &path, contents).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(storage_err(e));
        }

        debug!(path = %path.display(), "key file written");
        Ok(())
    }

    async fn load(&self, name: &str) -> Result<String, ReplypalError> {
        let path = self.path_for(name);
        tokio::fs::read_to_string(&path).await.map_err(storage_err)
    }
}

/// Mask a secret value for display: `"sk-t...2345"` format.
///
/// Shows prefix (up to 4 chars) and suffix (up to 4 chars) with "..." in between.
/// Short values (< 10 chars) are fully masked as "****".
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() < 10 {
        return "****".to_string();
    }
    let prefix: String = chars[..4].iter().collect();
    let suffix: String = chars[chars.len() - 4..].iter().collect();
    format!("{prefix}...{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use tracing_test::traced_test;

    #[tokio::test]
    async fn fs_store_roundtrip() {
        let dir = tempdir().unwrap();
        let store = FsKeyFileStore::new(dir.path());

        store.save("gemini-api-key.enc", "{\"salt\":\"x\"}").await.unwrap();
        let loaded = store.load("gemini-api-key.enc").await.unwrap();
        assert_eq!(loaded, "{\"salt\":\"x\"}");
        assert!(!store.path_for(".gemini-api-key.enc.tmp").exists());
    }

    #[tokio::test]
    async fn fs_store_creates_missing_directory() {
        let dir = tempdir().unwrap();
        let store = FsKeyFileStore::new(dir.path().join("nested/keys"));

        store.save("k.enc", "contents").await.unwrap();
        assert!(store.path_for("k.enc").exists());
    }

    #[tokio::test]
    async fn fs_store_overwrites() {
        let dir = tempdir().unwrap();
        let store = FsKeyFileStore::new(dir.path());

        store.save("k.enc", "first").await.unwrap();
        store.save("k.enc", "second").await.unwrap();
        assert_eq!(store.load("k.enc").await.unwrap(), "second");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn fs_store_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let store = FsKeyFileStore::new(dir.path());
        store.save("k.enc", "contents").await.unwrap();

        let mode = std::fs::metadata(store.path_for("k.enc")).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[tokio::test]
    async fn fs_store_failed_save_removes_temp_file() {
        let dir = tempdir().unwrap();
        let store = FsKeyFileStore::new(dir.path());
        // A non-empty directory in the way makes the final rename fail.
        std::fs::create_dir(store.path_for("k.enc")).unwrap();
        std::fs::write(store.path_for("k.enc").join("keep"), "x").unwrap();

        let err = store.save("k.enc", "contents").await.unwrap_err();
        assert!(matches!(err, ReplypalError::Storage { .. }));
        assert!(!store.path_for(".k.enc.tmp").exists());
        assert!(store.path_for("k.enc").join("keep").exists());
    }

    #[tokio::test]
    async fn fs_store_missing_file_is_storage_error() {
        let dir = tempdir().unwrap();
        let store = FsKeyFileStore::new(dir.path());

        let err = store.load("absent.enc").await.unwrap_err();
        assert!(matches!(err, ReplypalError::Storage { .. }));
    }

    #[tokio::test]
    async fn manager_without_validator_roundtrips_through_disk() {
        let dir = tempdir().unwrap();
        let manager = KeyFileManager::new(
            Arc::new(FsKeyFileStore::new(dir.path())),
            "gemini-api-key.enc",
        );
        let password = SecretString::from("correct horse".to_string());

        let created = manager.create("  sk-test-12345\n", &password).await.unwrap();
        assert_eq!(created.expose_secret(), "sk-test-12345");

        let text = std::fs::read_to_string(dir.path().join("gemini-api-key.enc")).unwrap();
        assert!(!text.contains("sk-test-12345"));

        let loaded = manager.load(&password).await.unwrap();
        assert_eq!(loaded.expose_secret(), "sk-test-12345");
    }

    #[tokio::test]
    #[traced_test]
    async fn secrets_never_reach_the_logs() {
        let dir = tempdir().unwrap();
        let manager = KeyFileManager::new(Arc::new(FsKeyFileStore::new(dir.path())), "k.enc");
        let password = SecretString::from("correct horse".to_string());

        manager.create("sk-test-12345", &password).await.unwrap();
        manager.load(&password).await.unwrap();

        assert!(logs_contain("key file created"));
        assert!(logs_contain("key file loaded"));
        assert!(!logs_contain("sk-test-12345"));
        assert!(!logs_contain("correct horse"));
    }

    #[test]
    fn mask_secret_long_value() {
        assert_eq!(mask_secret("sk-ant-REDACTED"), "sk-a...mnop");
    }

    #[test]
    fn mask_secret_short_value() {
        assert_eq!(mask_secret("short"), "****");
    }

    #[test]
    fn mask_secret_exact_boundary() {
        assert_eq!(mask_secret("1234567890"), "1234...7890");
    }

    #[test]
    fn mask_secret_multibyte() {
        assert_eq!(mask_secret("키키키키-secret-키키키키"), "키키키키...키키키키");
    }

    #[test]
    fn debug_omits_secrets() {
        let manager = KeyFileManager::new(Arc::new(FsKeyFileStore::new(".")), "k.enc");
        let debug = format!("{manager:?}");
        assert!(debug.contains("k.enc"));
        assert_eq!(manager.file_name(), "k.enc");
    }
}
