// SPDX-FileCopyrightText: 2026 Replypal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic random sources.

use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

use replypal_core::{EnvelopeError, RandomSource};

/// Fills buffers with an incrementing byte counter and records every call.
///
/// Lets tests assert both the exact salt/nonce bytes and whether the
/// source was consulted at all.
#[derive(Debug, Default)]
pub struct CountingRandom {
    next: AtomicU8,
    calls: AtomicUsize,
}

impl CountingRandom {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the counter at `start` instead of zero.
    pub fn starting_at(start: u8) -> Self {
        Self {
            next: AtomicU8::new(start),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `fill` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RandomSource for CountingRandom {
    fn fill(&self, dest: &mut [u8]) -> Result<(), EnvelopeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        for byte in dest.iter_mut() {
            *byte = self.next.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

/// A random source that is never available.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingRandom;

impl RandomSource for FailingRandom {
    fn fill(&self, _dest: &mut [u8]) -> Result<(), EnvelopeError> {
        Err(EnvelopeError::CryptoUnavailable(
            "random source disabled for test".to_string(),
        ))
    }
}
