// SPDX-FileCopyrightText: 2026 Replypal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google Gemini API key validation for Replypal.
//!
//! Implements [`replypal_core::KeyValidator`] by issuing the smallest
//! possible `generateContent` request with the candidate key.

pub mod types;
pub mod validator;

pub use validator::GeminiKeyValidator;
