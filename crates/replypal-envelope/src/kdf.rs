// SPDX-FileCopyrightText: 2026 Replypal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! PBKDF2-HMAC-SHA256 key derivation from a password.
//!
//! The iteration count, hash and output length are protocol constants. They
//! are not recorded in the envelope, so changing any of them makes every
//! existing key file unopenable.

use std::num::NonZeroU32;

use ring::pbkdf2;
use zeroize::Zeroizing;

/// PBKDF2 iteration count.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Length of the per-envelope salt in bytes.
pub const SALT_LEN: usize = 16;

/// Length of the derived AES-256 key in bytes.
pub const KEY_LEN: usize = 32;

const ITERATIONS: NonZeroU32 = NonZeroU32::MIN.saturating_add(PBKDF2_ITERATIONS - 1);

/// Derive the 32-byte envelope key from `password` and `salt`.
///
/// The returned key is wrapped in [`Zeroizing`] for automatic memory zeroing
/// on drop.
pub fn derive_key(password: &[u8], salt: &[u8; SALT_LEN]) -> Zeroizing<[u8; KEY_LEN]> {
    derive_with_iterations(password, salt, ITERATIONS)
}

fn derive_with_iterations(
    password: &[u8],
    salt: &[u8],
    iterations: NonZeroU32,
) -> Zeroizing<[u8; KEY_LEN]> {
    let mut output = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        iterations,
        salt,
        password,
        output.as_mut(),
    );
    output
}
