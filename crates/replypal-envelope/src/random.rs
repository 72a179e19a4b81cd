// SPDX-FileCopyrightText: 2026 Replypal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The operating system CSPRNG as a [`RandomSource`].

use replypal_core::{EnvelopeError, RandomSource};
use ring::rand::{SecureRandom, SystemRandom};

/// Random source backed by `ring`'s [`SystemRandom`].
#[derive(Debug, Clone)]
pub struct SystemRandomSource {
    rng: SystemRandom,
}

impl SystemRandomSource {
    pub fn new() -> Self {
        Self {
            rng: SystemRandom::new(),
        }
    }
}

impl Default for SystemRandomSource {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for SystemRandomSource {
    fn fill(&self, dest: &mut [u8]) -> Result<(), EnvelopeError> {
        self.rng
            .fill(dest)
            .map_err(|_| EnvelopeError::CryptoUnavailable("system random source failed".to_string()))
    }
}
