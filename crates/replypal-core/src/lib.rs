// SPDX-FileCopyrightText: 2026 Replypal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Replypal.
//!
//! Provides the error types shared by every crate and the host-environment
//! traits (randomness, key file storage, key validation) that the envelope
//! core is written against.

pub mod error;
pub mod traits;

pub use error::{EnvelopeError, ReplypalError, OPEN_FAILURE_MESSAGE};
pub use traits::{KeyFileStore, KeyValidator, RandomSource};
