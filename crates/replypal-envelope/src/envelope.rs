// SPDX-FileCopyrightText: 2026 Replypal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Password-sealed secret envelopes.
//!
//! Sealing draws a fresh 16-byte salt and 12-byte nonce, derives an AES-256
//! key from the password with PBKDF2-HMAC-SHA256 (100 000 iterations) and
//! encrypts the secret with AES-256-GCM. The result is a flat JSON document:
//!
//! ```json
//! { "salt": "<base64>", "iv": "<base64>", "data": "<base64 ciphertext + tag>" }
//! ```
//!
//! The document carries no version or algorithm identifier, so key files
//! exported by the Replypal browser extension open unchanged.

use base64::alphabet;
use base64::engine::general_purpose::STANDARD;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use replypal_core::{EnvelopeError, RandomSource};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::debug;
use zeroize::Zeroizing;

use crate::crypto::{self, NONCE_LEN, TAG_LEN};
use crate::kdf::{self, SALT_LEN};
use crate::random::SystemRandomSource;

/// A sealed secret: everything needed to recover it except the password.
#[derive(Clone, PartialEq, Eq)]
pub struct Envelope {
    salt: [u8; SALT_LEN],
    iv: [u8; NONCE_LEN],
    data: Vec<u8>,
}

impl std::fmt::Debug for Envelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Envelope")
            .field("data_len", &self.data.len())
            .finish_non_exhaustive()
    }
}

/// On-disk field layout. Unknown fields are ignored.
#[derive(Deserialize)]
struct EnvelopeFile {
    salt: String,
    iv: String,
    data: String,
}

impl Envelope {
    /// Assemble an envelope from raw parts.
    pub fn from_parts(
        salt: [u8; SALT_LEN],
        iv: [u8; NONCE_LEN],
        data: Vec<u8>,
    ) -> Result<Self, EnvelopeError> {
        if data.len() < TAG_LEN {
            return Err(EnvelopeError::MalformedEnvelope(format!(
                "`data` is {} bytes, shorter than the {TAG_LEN}-byte tag",
                data.len()
            )));
        }
        Ok(Self { salt, iv, data })
    }

    /// The KDF salt.
    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }

    /// The AES-GCM nonce.
    pub fn iv(&self) -> &[u8; NONCE_LEN] {
        &self.iv
    }

    /// Ciphertext with the authentication tag appended.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Parse the JSON key file format.
    pub fn from_json(text: &str) -> Result<Self, EnvelopeError> {
        let file: EnvelopeFile = serde_json::from_str(text)
            .map_err(|e| EnvelopeError::MalformedEnvelope(format!("invalid envelope JSON: {e}")))?;

        let salt = decode_fixed::<SALT_LEN>("salt", &file.salt)?;
        let iv = decode_fixed::<NONCE_LEN>("iv", &file.iv)?;
        let data = decode_field("data", &file.data)?;
        Self::from_parts(salt, iv, data)
    }

    /// Serialize to the JSON key file format.
    pub fn to_json(&self) -> String {
        serde_json::json!({
            "salt": STANDARD.encode(self.salt),
            "iv": STANDARD.encode(self.iv),
            "data": STANDARD.encode(&self.data),
        })
        .to_string()
    }
}

/// Standard alphabet that accepts fields with or without `=` padding.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

fn decode_field(name: &str, value: &str) -> Result<Vec<u8>, EnvelopeError> {
    LENIENT
        .decode(value.trim())
        .map_err(|e| EnvelopeError::MalformedEnvelope(format!("`{name}` is not valid base64: {e}")))
}

fn decode_fixed<const N: usize>(name: &str, value: &str) -> Result<[u8; N], EnvelopeError> {
    let bytes = decode_field(name, value)?;
    let len = bytes.len();
    bytes.try_into().map_err(|_| {
        EnvelopeError::MalformedEnvelope(format!("`{name}` must be {N} bytes, got {len}"))
    })
}

/// Seals and opens secrets under a password.
///
/// Stateless apart from the random source: no key material outlives a call.
#[derive(Debug, Clone, Default)]
pub struct SecretEnvelope<R = SystemRandomSource> {
    rng: R,
}

impl SecretEnvelope<SystemRandomSource> {
    /// Envelope sealer using the operating system CSPRNG.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: RandomSource> SecretEnvelope<R> {
    /// Envelope sealer drawing salts and nonces from `rng`.
    pub fn with_random_source(rng: R) -> Self {
        Self { rng }
    }

    /// Seal a text secret under `password`.
    pub fn seal(&self, secret: &str, password: &str) -> Result<Envelope, EnvelopeError> {
        self.seal_bytes(secret.as_bytes(), password)
    }

    /// Seal an arbitrary byte secret under `password`.
    ///
    /// Empty inputs are rejected before any randomness is drawn.
    pub fn seal_bytes(&self, secret: &[u8], password: &str) -> Result<Envelope, EnvelopeError> {
        if secret.is_empty() {
            return Err(EnvelopeError::InvalidInput("secret must not be empty"));
        }
        if password.is_empty() {
            return Err(EnvelopeError::InvalidInput("password must not be empty"));
        }

        let mut salt = [0u8; SALT_LEN];
        self.rng.fill(&mut salt)?;
        let mut iv = [0u8; NONCE_LEN];
        self.rng.fill(&mut iv)?;

        let key = kdf::derive_key(password.as_bytes(), &salt);
        let data = crypto::encrypt(&key, iv, secret)?;

        debug!(data_len = data.len(), "secret sealed");
        Ok(Envelope { salt, iv, data })
    }

    /// Recover a text secret from `envelope`.
    ///
    /// Plaintext that is not UTF-8 was not produced by [`Self::seal`] and is
    /// reported as malformed.
    pub fn open(&self, envelope: &Envelope, password: &str) -> Result<SecretString, EnvelopeError> {
        let bytes = self.open_bytes(envelope, password)?;
        let text = std::str::from_utf8(&bytes).map_err(|_| {
            EnvelopeError::MalformedEnvelope("decrypted secret is not UTF-8 text".to_string())
        })?;
        Ok(SecretString::from(text.to_owned()))
    }

    /// Recover the raw secret bytes from `envelope`.
    pub fn open_bytes(
        &self,
        envelope: &Envelope,
        password: &str,
    ) -> Result<Zeroizing<Vec<u8>>, EnvelopeError> {
        if password.is_empty() {
            return Err(EnvelopeError::InvalidInput("password must not be empty"));
        }

        let key = kdf::derive_key(password.as_bytes(), &envelope.salt);
        let plaintext = crypto::decrypt(&key, envelope.iv, &envelope.data)?;

        debug!("secret opened");
        Ok(plaintext)
    }

    /// Parse key file text and open it in one step.
    pub fn open_json(&self, text: &str, password: &str) -> Result<SecretString, EnvelopeError> {
        let envelope = Envelope::from_json(text)?;
        self.open(&envelope, password)
    }
}

impl<R: RandomSource + Clone + 'static> SecretEnvelope<R> {
    /// [`Self::seal`] on the blocking thread pool.
    ///
    /// The KDF is deliberately slow; this keeps it off async worker threads.
    pub async fn seal_async(
        &self,
        secret: SecretString,
        password: SecretString,
    ) -> Result<Envelope, EnvelopeError> {
        let this = self.clone();
        tokio::task::spawn_blocking(move || {
            this.seal(secret.expose_secret(), password.expose_secret())
        })
        .await
        .map_err(|e| EnvelopeError::CryptoUnavailable(format!("seal task failed: {e}")))?
    }

    /// [`Self::open`] on the blocking thread pool.
    pub async fn open_async(
        &self,
        envelope: Envelope,
        password: SecretString,
    ) -> Result<SecretString, EnvelopeError> {
        let this = self.clone();
        tokio::task::spawn_blocking(move || this.open(&envelope, password.expose_secret()))
            .await
            .map_err(|e| EnvelopeError::CryptoUnavailable(format!("open task failed: {e}")))?
    }
}

/// Seal `secret` under `password` with the system random source.
pub fn seal(secret: &str, password: &str) -> Result<Envelope, EnvelopeError> {
    SecretEnvelope::new().seal(secret, password)
}

/// Open `envelope` with `password`.
pub fn open(envelope: &Envelope, password: &str) -> Result<SecretString, EnvelopeError> {
    SecretEnvelope::new().open(envelope, password)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic source so envelope bytes can be asserted exactly.
    #[derive(Clone)]
    struct FixedRandom(u8);

    impl RandomSource for FixedRandom {
        fn fill(&self, dest: &mut [u8]) -> Result<(), EnvelopeError> {
            dest.fill(self.0);
            Ok(())
        }
    }

    #[test]
    fn json_uses_padded_standard_base64() {
        let envelope = SecretEnvelope::with_random_source(FixedRandom(0xFF))
            .seal("sk-test-12345", "correct horse")
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&envelope.to_json()).unwrap();

        assert_eq!(value["salt"], "/////////////////////w==");
        assert_eq!(value["iv"], "////////////////");
        assert_eq!(value.as_object().unwrap().len(), 3);
    }

    #[test]
    fn data_is_plaintext_plus_tag() {
        let envelope = seal("sk-test-12345", "correct horse").unwrap();
        assert_eq!(envelope.data().len(), "sk-test-12345".len() + TAG_LEN);
    }

    #[test]
    fn json_roundtrip_preserves_fields() {
        let envelope = seal("sk-test-12345", "correct horse").unwrap();
        let parsed = Envelope::from_json(&envelope.to_json()).unwrap();
        assert_eq!(parsed, envelope);
    }

    #[test]
    fn fixed_randomness_gives_reproducible_envelope() {
        let sealer = SecretEnvelope::with_random_source(FixedRandom(1));
        let a = sealer.seal("secret", "pw").unwrap();
        let b = sealer.seal("secret", "pw").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let envelope = seal("sk-test-12345", "correct horse").unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&envelope.to_json()).unwrap();
        value["note"] = serde_json::Value::from("exported from browser");

        let secret = SecretEnvelope::new()
            .open_json(&value.to_string(), "correct horse")
            .unwrap();
        assert_eq!(secret.expose_secret(), "sk-test-12345");
    }

    #[test]
    fn bad_base64_is_malformed() {
        let text = r#"{"salt":"!!!","iv":"AAAAAAAAAAAAAAAA","data":"AAAAAAAAAAAAAAAAAAAAAA=="}"#;
        let err = Envelope::from_json(text).unwrap_err();
        assert!(matches!(err, EnvelopeError::MalformedEnvelope(ref m) if m.contains("salt")));
    }

    #[test]
    fn unpadded_fields_open() {
        let envelope = seal("sk-test-12345", "correct horse").unwrap();
        let text = serde_json::json!({
            "salt": STANDARD.encode(envelope.salt()).trim_end_matches('='),
            "iv": STANDARD.encode(envelope.iv()),
            "data": STANDARD.encode(envelope.data()).trim_end_matches('='),
        })
        .to_string();
        assert!(!text.contains('='));

        let secret = SecretEnvelope::new().open_json(&text, "correct horse").unwrap();
        assert_eq!(secret.expose_secret(), "sk-test-12345");
    }

    #[test]
    fn wrong_salt_length_is_malformed() {
        let text = r#"{"salt":"AAAA","iv":"AAAAAAAAAAAAAAAA","data":"AAAAAAAAAAAAAAAAAAAAAA=="}"#;
        let err = Envelope::from_json(text).unwrap_err();
        assert!(matches!(err, EnvelopeError::MalformedEnvelope(ref m) if m.contains("16 bytes")));
    }

    #[test]
    fn short_data_is_malformed() {
        let text = r#"{"salt":"AAAAAAAAAAAAAAAAAAAAAA==","iv":"AAAAAAAAAAAAAAAA","data":"AAAA"}"#;
        assert!(matches!(
            Envelope::from_json(text),
            Err(EnvelopeError::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn non_string_field_is_malformed() {
        let text = r#"{"salt":16,"iv":"AAAAAAAAAAAAAAAA","data":"AAAA"}"#;
        assert!(matches!(
            Envelope::from_json(text),
            Err(EnvelopeError::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn not_json_is_malformed() {
        assert!(matches!(
            Envelope::from_json("gemini-api-key"),
            Err(EnvelopeError::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn open_rejects_empty_password() {
        let envelope = seal("secret", "pw").unwrap();
        assert_eq!(
            open(&envelope, "").unwrap_err(),
            EnvelopeError::InvalidInput("password must not be empty")
        );
    }

    #[test]
    fn non_utf8_plaintext_is_malformed() {
        let sealer = SecretEnvelope::new();
        let envelope = sealer.seal_bytes(&[0xFF, 0xFE, 0x00], "pw").unwrap();

        assert_eq!(sealer.open_bytes(&envelope, "pw").unwrap().as_slice(), &[0xFF, 0xFE, 0x00]);
        assert!(matches!(
            sealer.open(&envelope, "pw"),
            Err(EnvelopeError::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn debug_output_hides_contents() {
        let envelope = seal("sk-test-12345", "correct horse").unwrap();
        let debug = format!("{envelope:?}");
        assert!(debug.contains("data_len"));
        assert!(!debug.contains("salt"));
    }

    #[tokio::test]
    async fn async_roundtrip() {
        let sealer = SecretEnvelope::new();
        let envelope = sealer
            .seal_async(
                SecretString::from("sk-test-12345".to_string()),
                SecretString::from("correct horse".to_string()),
            )
            .await
            .unwrap();
        let secret = sealer
            .open_async(envelope, SecretString::from("correct horse".to_string()))
            .await
            .unwrap();
        assert_eq!(secret.expose_secret(), "sk-test-12345");
    }

    #[tokio::test]
    async fn async_wrong_password_fails() {
        let sealer = SecretEnvelope::new();
        let envelope = sealer
            .seal_async(
                SecretString::from("sk-test-12345".to_string()),
                SecretString::from("correct horse".to_string()),
            )
            .await
            .unwrap();
        let err = sealer
            .open_async(envelope, SecretString::from("wrong password".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err, EnvelopeError::DecryptionFailed);
    }
}
