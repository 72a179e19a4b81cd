// SPDX-FileCopyrightText: 2026 Replypal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Password-based secret envelopes for Replypal.
//!
//! Seals an API key under a user password with PBKDF2-HMAC-SHA256 and
//! AES-256-GCM, stores it as a small JSON key file, and opens it again.
//! Randomness, storage and key validation are supplied by the host through
//! the traits in `replypal-core`.

pub mod crypto;
pub mod envelope;
pub mod kdf;
pub mod keyfile;
pub mod prompt;
pub mod random;

pub use envelope::{open, seal, Envelope, SecretEnvelope};
pub use keyfile::{mask_secret, FsKeyFileStore, KeyFileManager};
pub use prompt::{get_api_key, get_password, get_password_with_confirm};
pub use random::SystemRandomSource;
