// SPDX-FileCopyrightText: 2026 Replypal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Replypal integration tests.
//!
//! Provides in-memory implementations of the host traits so the envelope
//! and key file workflows can be tested without disks, networks or a real
//! random source.
//!
//! # Components
//!
//! - [`MemoryKeyFileStore`] - Key file store backed by a map
//! - [`MockValidator`] - Key validator with a scripted verdict
//! - [`CountingRandom`] / [`FailingRandom`] - Deterministic random sources

pub mod mock_random;
pub mod mock_store;
pub mod mock_validator;

pub use mock_random::{CountingRandom, FailingRandom};
pub use mock_store::MemoryKeyFileStore;
pub use mock_validator::MockValidator;
