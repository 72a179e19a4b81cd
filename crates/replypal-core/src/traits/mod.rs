// SPDX-FileCopyrightText: 2026 Replypal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Host-environment capabilities consumed by the envelope core.
//!
//! Randomness, key file persistence and key liveness checks are provided by
//! whatever host embeds Replypal (CLI, desktop shell, tests).

pub mod random;
pub mod store;
pub mod validator;

pub use random::RandomSource;
pub use store::KeyFileStore;
pub use validator::KeyValidator;
