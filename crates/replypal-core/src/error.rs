// SPDX-FileCopyrightText: 2026 Replypal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for Replypal.

use thiserror::Error;

/// Message shown to users for any failure to open a key file.
///
/// Malformed files and wrong passwords share this text so the two causes
/// cannot be told apart from the outside.
pub const OPEN_FAILURE_MESSAGE: &str = "wrong password or corrupted file";

/// Failures of the password envelope (seal/open) operations.
///
/// `DecryptionFailed` carries no detail on purpose: a wrong password and a
/// tampered ciphertext must be indistinguishable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    /// Caller misuse, such as an empty secret or password.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// The envelope text is not a structurally valid envelope.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// Authentication failed: wrong password or tampered data.
    #[error("decryption failed")]
    DecryptionFailed,

    /// The host cannot provide secure randomness or the cipher primitive.
    #[error("cryptographic primitive unavailable: {0}")]
    CryptoUnavailable(String),
}

impl EnvelopeError {
    /// Text suitable for showing to an end user.
    ///
    /// `MalformedEnvelope` and `DecryptionFailed` map to the same message.
    pub fn user_message(&self) -> String {
        match self {
            Self::MalformedEnvelope(_) | Self::DecryptionFailed => OPEN_FAILURE_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

/// The primary error type used across Replypal crates.
#[derive(Debug, Error)]
pub enum ReplypalError {
    /// Configuration errors (invalid TOML, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Envelope sealing or opening failed.
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    /// Key file storage errors (missing file, permission denied).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The API key was rejected by the remote service, or the check itself failed.
    #[error("key validation failed: {message}")]
    Validator {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Reading a password or key from the terminal or environment failed.
    #[error("input error: {0}")]
    Prompt(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ReplypalError {
    /// Text suitable for showing to an end user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Envelope(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}
