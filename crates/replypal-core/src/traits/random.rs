// SPDX-FileCopyrightText: 2026 Replypal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secure random byte source.

use crate::error::EnvelopeError;

/// A cryptographically secure random number generator.
///
/// Implementations must return `EnvelopeError::CryptoUnavailable` rather than
/// filling `dest` with predictable bytes.
pub trait RandomSource: Send + Sync {
    /// Fills `dest` entirely with random bytes.
    fn fill(&self, dest: &mut [u8]) -> Result<(), EnvelopeError>;
}

impl<T: RandomSource + ?Sized> RandomSource for &T {
    fn fill(&self, dest: &mut [u8]) -> Result<(), EnvelopeError> {
        (**self).fill(dest)
    }
}

impl<T: RandomSource + ?Sized> RandomSource for std::sync::Arc<T> {
    fn fill(&self, dest: &mut [u8]) -> Result<(), EnvelopeError> {
        (**self).fill(dest)
    }
}
