// SPDX-FileCopyrightText: 2026 Replypal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `replypal create` and `replypal load` command implementations.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use replypal_config::model::ReplypalConfig;
use replypal_core::ReplypalError;
use replypal_envelope::{mask_secret, prompt, FsKeyFileStore, KeyFileManager};
use replypal_gemini::GeminiKeyValidator;
use secrecy::ExposeSecret;
use tracing::debug;

/// Split a key file location into the directory and file name the store uses.
///
/// With no explicit path, the configured directory and file name apply.
fn resolve_location(config: &ReplypalConfig, path: Option<&Path>) -> (PathBuf, String) {
    let Some(path) = path else {
        return (
            config.keyfile.directory_path(),
            config.keyfile.file_name.clone(),
        );
    };

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| config.keyfile.file_name.clone());
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    (dir, file_name)
}

fn build_manager(
    config: &ReplypalConfig,
    store: Arc<FsKeyFileStore>,
    file_name: String,
    verify: bool,
) -> Result<KeyFileManager, ReplypalError> {
    let manager = KeyFileManager::new(store, file_name);

    if verify && config.validator.enabled {
        let validator = GeminiKeyValidator::new(&config.validator)?;
        debug!(endpoint = validator.endpoint(), "API key liveness check enabled");
        Ok(manager.with_validator(Arc::new(validator)))
    } else {
        debug!("API key liveness check disabled");
        Ok(manager)
    }
}

/// Run the `replypal create` command.
///
/// Reads the API key and a new password, checks the key, seals it and writes
/// the key file. Returns the path written.
pub async fn run_create(
    config: &ReplypalConfig,
    out: Option<&Path>,
    verify: bool,
) -> Result<PathBuf, ReplypalError> {
    let (dir, file_name) = resolve_location(config, out);
    let store = Arc::new(FsKeyFileStore::new(dir));
    let manager = build_manager(config, store.clone(), file_name, verify)?;
    let path = store.path_for(manager.file_name());

    let api_key = prompt::get_api_key()?;
    let password = prompt::get_password_with_confirm()?;
    let api_key = manager.create(api_key.expose_secret(), &password).await?;

    eprintln!(
        "Key file written to {} (key {})",
        path.display(),
        mask_secret(api_key.expose_secret())
    );
    Ok(path)
}

/// Run the `replypal load` command.
///
/// Opens the key file and prints the key, masked unless `reveal` is set.
pub async fn run_load(
    config: &ReplypalConfig,
    file: Option<&Path>,
    reveal: bool,
    verify: bool,
) -> Result<(), ReplypalError> {
    let (dir, file_name) = resolve_location(config, file);
    let manager = build_manager(config, Arc::new(FsKeyFileStore::new(dir)), file_name, verify)?;

    let password = prompt::get_password()?;
    let api_key = manager.load(&password).await?;

    if reveal {
        println!("{}", api_key.expose_secret());
    } else {
        println!("{}", mask_secret(api_key.expose_secret()));
    }
    Ok(())
}
