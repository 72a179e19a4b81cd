// SPDX-FileCopyrightText: 2026 Replypal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP liveness check for Gemini API keys.
//!
//! Provides [`GeminiKeyValidator`], which sends a one-token
//! `generateContent` request and treats any 2xx response as a live key.

use std::time::Duration;

use async_trait::async_trait;
use replypal_config::model::ValidatorConfig;
use replypal_core::{KeyValidator, ReplypalError};
use reqwest::header::HeaderValue;
use tracing::{debug, warn};

use crate::types::{ApiErrorResponse, GenerateContentRequest};

/// Header carrying the API key on every Gemini request.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Checks Gemini API keys against the live API.
#[derive(Debug, Clone)]
pub struct GeminiKeyValidator {
    client: reqwest::Client,
    endpoint: String,
}

impl GeminiKeyValidator {
    /// Creates a validator from the `[validator]` config section.
    pub fn new(config: &ValidatorConfig) -> Result<Self, ReplypalError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ReplypalError::Validator {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            endpoint: endpoint_url(&config.base_url, &config.model),
        })
    }

    /// The `generateContent` URL this validator posts to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn endpoint_url(base_url: &str, model: &str) -> String {
    format!(
        "{}/v1beta/models/{model}:generateContent",
        base_url.trim_end_matches('/')
    )
}

#[async_trait]
impl KeyValidator for GeminiKeyValidator {
    fn name(&self) -> &str {
        "gemini"
    }

    /// Any failure to get a 2xx answer counts as an invalid key.
    async fn validate(&self, api_key: &str) -> Result<bool, ReplypalError> {
        let Ok(mut key_header) = HeaderValue::from_str(api_key) else {
            warn!("API key contains characters not allowed in an HTTP header");
            return Ok(false);
        };
        key_header.set_sensitive(true);

        let response = match self
            .client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, key_header)
            .json(&GenerateContentRequest::liveness_check())
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "API key check request failed");
                return Ok(false);
            }
        };

        let status = response.status();
        debug!(status = %status, "API key check response received");
        if status.is_success() {
            return Ok(true);
        }

        let body = response.text().await.unwrap_or_default();
        match serde_json::from_str::<ApiErrorResponse>(&body) {
            Ok(api_err) => warn!(
                status = %status,
                api_status = %api_err.error.status,
                message = %api_err.error.message,
                "API key rejected"
            ),
            Err(_) => warn!(status = %status, "API key rejected"),
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MODEL_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

    fn test_validator(base_url: &str) -> GeminiKeyValidator {
        let config = ValidatorConfig {
            base_url: base_url.to_string(),
            timeout_secs: 5,
            ..ValidatorConfig::default()
        };
        GeminiKeyValidator::new(&config).unwrap()
    }

    #[test]
    fn endpoint_joins_base_and_model() {
        assert_eq!(
            endpoint_url("https://generativelanguage.googleapis.com/", "gemini-2.5-flash"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[tokio::test]
    async fn accepts_key_on_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .and(header("x-goog-api-key", "sk-test-12345"))
            .and(body_json(serde_json::json!({
                "contents": [{"parts": [{"text": "test"}]}],
                "generationConfig": {"maxOutputTokens": 1}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{"content": {"parts": [{"text": "O"}]}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let validator = test_validator(&server.uri());
        assert!(validator.validate("sk-test-12345").await.unwrap());
    }

    #[tokio::test]
    #[traced_test]
    async fn rejects_key_on_400_without_logging_it() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": {
                    "code": 400,
                    "message": "API key not valid. Please pass a valid API key.",
                    "status": "INVALID_ARGUMENT"
                }
            })))
            .mount(&server)
            .await;

        let validator = test_validator(&server.uri());
        assert!(!validator.validate("sk-revoked-key").await.unwrap());
        assert!(logs_contain("INVALID_ARGUMENT"));
        assert!(!logs_contain("sk-revoked-key"));
    }

    #[tokio::test]
    async fn rejects_key_on_server_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&server)
            .await;

        let validator = test_validator(&server.uri());
        assert!(!validator.validate("sk-test-12345").await.unwrap());
    }

    #[tokio::test]
    async fn transport_failure_is_invalid_not_error() {
        // Nothing listens on port 9 (discard) on test hosts.
        let validator = test_validator("http://127.0.0.1:9");
        assert!(!validator.validate("sk-test-12345").await.unwrap());
    }

    #[tokio::test]
    async fn header_unsafe_key_is_invalid() {
        let validator = test_validator("http://127.0.0.1:9");
        assert!(!validator.validate("sk-test\n12345").await.unwrap());
    }

    #[test]
    fn name_is_gemini() {
        assert_eq!(test_validator("http://localhost").name(), "gemini");
    }
}
