// SPDX-FileCopyrightText: 2026 Replypal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Password and API key acquisition via TTY prompt or environment variable.

use replypal_core::ReplypalError;
use secrecy::SecretString;

/// Environment variable holding the key file password.
pub const PASSWORD_ENV_VAR: &str = "REPLYPAL_KEY_PASSWORD";

/// Environment variable holding the API key to seal.
pub const API_KEY_ENV_VAR: &str = "REPLYPAL_API_KEY";

fn from_env(name: &str) -> Option<SecretString> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Some(SecretString::from(value)),
        _ => None,
    }
}

fn read_hidden(label: &str) -> Result<String, ReplypalError> {
    eprint!("{label}: ");
    rpassword::read_password().map_err(|e| ReplypalError::Prompt(format!("failed to read {label}: {e}")))
}

fn stdin_is_terminal() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stdin())
}

fn not_provided(what: &str, var: &str) -> ReplypalError {
    ReplypalError::Prompt(format!(
        "No {what} provided. Set {var} environment variable or run interactively."
    ))
}

/// Get the key file password from the environment or an interactive prompt.
///
/// Priority:
/// 1. `REPLYPAL_KEY_PASSWORD` environment variable
/// 2. Interactive TTY prompt via `rpassword`
pub fn get_password() -> Result<SecretString, ReplypalError> {
    if let Some(password) = from_env(PASSWORD_ENV_VAR) {
        return Ok(password);
    }

    if stdin_is_terminal() {
        let password = read_hidden("Password")?;
        if password.is_empty() {
            return Err(ReplypalError::Prompt("empty password not allowed".to_string()));
        }
        return Ok(SecretString::from(password));
    }

    Err(not_provided("password", PASSWORD_ENV_VAR))
}

/// Get a new key file password, asking twice when prompting.
///
/// The environment variable is taken as-is without confirmation.
pub fn get_password_with_confirm() -> Result<SecretString, ReplypalError> {
    if let Some(password) = from_env(PASSWORD_ENV_VAR) {
        return Ok(password);
    }

    if stdin_is_terminal() {
        let first = read_hidden("New password")?;
        let second = read_hidden("Confirm password")?;

        if first != second {
            return Err(ReplypalError::Prompt("passwords do not match".to_string()));
        }
        if first.is_empty() {
            return Err(ReplypalError::Prompt("empty password not allowed".to_string()));
        }
        return Ok(SecretString::from(first));
    }

    Err(not_provided("password", PASSWORD_ENV_VAR))
}

/// Get the API key to seal from the environment or a hidden prompt.
pub fn get_api_key() -> Result<SecretString, ReplypalError> {
    if let Some(key) = from_env(API_KEY_ENV_VAR) {
        return Ok(key);
    }

    if stdin_is_terminal() {
        let key = read_hidden("Gemini API key")?;
        if key.trim().is_empty() {
            return Err(ReplypalError::Prompt("empty API key not allowed".to_string()));
        }
        return Ok(SecretString::from(key));
    }

    Err(not_provided("API key", API_KEY_ENV_VAR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use serial_test::serial;

    #[test]
    #[serial]
    fn password_from_env_var() {
        // SAFETY: test-only env mutation, serialized with the other env tests.
        unsafe { std::env::set_var(PASSWORD_ENV_VAR, "correct horse") };
        let result = get_password();
        unsafe { std::env::remove_var(PASSWORD_ENV_VAR) };

        assert_eq!(result.unwrap().expose_secret(), "correct horse");
    }

    #[test]
    #[serial]
    fn password_with_confirm_from_env_var() {
        unsafe { std::env::set_var(PASSWORD_ENV_VAR, "correct horse") };
        let result = get_password_with_confirm();
        unsafe { std::env::remove_var(PASSWORD_ENV_VAR) };

        assert!(result.is_ok());
    }

    #[test]
    #[serial]
    fn empty_password_env_var_is_rejected() {
        unsafe { std::env::set_var(PASSWORD_ENV_VAR, "") };
        // stdin is not a terminal under the test harness.
        let result = get_password();
        unsafe { std::env::remove_var(PASSWORD_ENV_VAR) };

        assert!(matches!(result, Err(ReplypalError::Prompt(_))));
    }

    #[test]
    #[serial]
    fn api_key_from_env_var() {
        unsafe { std::env::set_var(API_KEY_ENV_VAR, "sk-test-12345") };
        let result = get_api_key();
        unsafe { std::env::remove_var(API_KEY_ENV_VAR) };

        assert_eq!(result.unwrap().expose_secret(), "sk-test-12345");
    }

    #[test]
    #[serial]
    fn missing_api_key_names_the_variable() {
        unsafe { std::env::remove_var(API_KEY_ENV_VAR) };
        let err = get_api_key().unwrap_err();
        assert!(err.to_string().contains(API_KEY_ENV_VAR));
    }
}
