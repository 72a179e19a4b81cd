// SPDX-FileCopyrightText: 2026 Replypal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Low-level AES-256-GCM encrypt/decrypt with a caller-supplied nonce.
//!
//! The nonce is drawn by the envelope layer from the host random source so
//! that tests can substitute it; this module never generates randomness.

use replypal_core::EnvelopeError;
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM};
use zeroize::Zeroizing;

use crate::kdf::KEY_LEN;

/// AES-GCM nonce length in bytes (96 bits).
pub const NONCE_LEN: usize = 12;

/// AES-GCM authentication tag length in bytes (128 bits).
pub const TAG_LEN: usize = 16;

fn aead_key(key: &[u8; KEY_LEN]) -> Result<LessSafeKey, EnvelopeError> {
    let unbound = UnboundKey::new(&AES_256_GCM, key)
        .map_err(|_| EnvelopeError::CryptoUnavailable("AES-256-GCM is not available".to_string()))?;
    Ok(LessSafeKey::new(unbound))
}

/// Encrypt `plaintext`, returning the ciphertext with the 16-byte tag appended.
///
/// The caller must never reuse `nonce` with the same key.
pub fn encrypt(
    key: &[u8; KEY_LEN],
    nonce: [u8; NONCE_LEN],
    plaintext: &[u8],
) -> Result<Vec<u8>, EnvelopeError> {
    let key = aead_key(key)?;
    let mut in_out = plaintext.to_vec();
    key.seal_in_place_append_tag(Nonce::assume_unique_for_key(nonce), Aad::empty(), &mut in_out)
        .map_err(|_| EnvelopeError::CryptoUnavailable("AES-256-GCM encryption failed".to_string()))?;
    Ok(in_out)
}

/// Decrypt and authenticate `ciphertext` (which must end with the tag).
///
/// Any authentication failure is reported as [`EnvelopeError::DecryptionFailed`].
pub fn decrypt(
    key: &[u8; KEY_LEN],
    nonce: [u8; NONCE_LEN],
    ciphertext: &[u8],
) -> Result<Zeroizing<Vec<u8>>, EnvelopeError> {
    let key = aead_key(key)?;
    let mut in_out = Zeroizing::new(ciphertext.to_vec());
    let plaintext_len = key
        .open_in_place(Nonce::assume_unique_for_key(nonce), Aad::empty(), &mut in_out)
        .map_err(|_| EnvelopeError::DecryptionFailed)?
        .len();
    in_out.truncate(plaintext_len);
    Ok(in_out)
}
