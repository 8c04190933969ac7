//! HTTP client for a Groq-compatible chat-completion API.
//!
//! Wraps `reqwest` with bearer-key auth, JSON-mode completions, and typed
//! error handling. HTTP 429 responses surface as
//! [`EnrichError::RateLimited`] so the caller can advance its model
//! rotation; other non-2xx responses surface the provider's error message
//! as [`EnrichError::Api`].

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde_json::{Map, Value};

use crate::error::EnrichError;
use crate::types::{ApiErrorBody, ChatMessage, ChatRequest, ChatResponse, ResponseFormat};

const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1/";

const MAX_COMPLETION_TOKENS: u32 = 2048;

/// Client for the chat-completion endpoint.
///
/// Use [`EnrichClient::new`] for production or
/// [`EnrichClient::with_base_url`] to point at a mock server in tests.
pub struct EnrichClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl EnrichClient {
    /// Creates a new client pointed at the production endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`EnrichError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, EnrichError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`EnrichError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`EnrichError::Api`] if `base_url` is not a
    /// valid URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, EnrichError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("offerbase/0.1 (discount-enrichment)")
            .build()?;

        // Normalise: a trailing slash makes Url::join treat the last path
        // segment as a directory instead of replacing it.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| EnrichError::Api(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Sends one JSON-mode chat completion and returns the object the model
    /// produced.
    ///
    /// # Errors
    ///
    /// - [`EnrichError::RateLimited`] on HTTP 429.
    /// - [`EnrichError::Api`] on other non-2xx statuses, an empty choice
    ///   list, or completion content that is not a JSON object.
    /// - [`EnrichError::Http`] on network failure.
    /// - [`EnrichError::Deserialize`] if the envelope or the completion
    ///   content is not valid JSON.
    pub async fn complete_json(
        &self,
        model: &str,
        system_message: &str,
        user_message: &str,
    ) -> Result<Map<String, Value>, EnrichError> {
        let url = self
            .base_url
            .join("chat/completions")
            .map_err(|e| EnrichError::Api(format!("invalid endpoint URL: {e}")))?;

        let request = ChatRequest {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_message,
                },
                ChatMessage {
                    role: "user",
                    content: user_message,
                },
            ],
            max_tokens: MAX_COMPLETION_TOKENS,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let response = self
            .client
            .post(url.clone())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(EnrichError::RateLimited(extract_error_message(&body)));
        }
        if !status.is_success() {
            return Err(EnrichError::Api(format!(
                "{status}: {}",
                extract_error_message(&body)
            )));
        }

        let envelope: ChatResponse =
            serde_json::from_str(&body).map_err(|e| EnrichError::Deserialize {
                context: url.to_string(),
                source: e,
            })?;

        let content = envelope
            .choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .ok_or_else(|| EnrichError::Api("completion returned no choices".to_string()))?;

        let value: Value =
            serde_json::from_str(content).map_err(|e| EnrichError::Deserialize {
                context: format!("completion content for model {model}"),
                source: e,
            })?;

        match value {
            Value::Object(map) => Ok(map),
            other => Err(EnrichError::Api(format!(
                "completion content is not a JSON object: {other}"
            ))),
        }
    }
}

/// Pulls the provider's error message out of an error body, falling back to
/// the raw (truncated) body when it is not the expected shape.
fn extract_error_message(body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ApiErrorBody>(body) {
        return parsed.error.message;
    }
    let mut message: String = body.trim().chars().take(200).collect();
    if body.trim().chars().count() > 200 {
        message.push_str("...");
    }
    if message.is_empty() {
        message.push_str("no error detail provided");
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_error_message_reads_openai_shape() {
        let body = r#"{"error": {"message": "rate_limit_exceeded", "type": "requests"}}"#;
        assert_eq!(extract_error_message(body), "rate_limit_exceeded");
    }

    #[test]
    fn extract_error_message_falls_back_to_raw_body() {
        assert_eq!(extract_error_message("plain failure"), "plain failure");
        assert_eq!(extract_error_message(""), "no error detail provided");
    }

    #[test]
    fn with_base_url_normalises_trailing_slash() {
        let with = EnrichClient::with_base_url("key", 30, "https://api.groq.com/openai/v1/")
            .expect("client construction should not fail");
        let without = EnrichClient::with_base_url("key", 30, "https://api.groq.com/openai/v1")
            .expect("client construction should not fail");
        assert_eq!(with.base_url, without.base_url);
    }

    #[test]
    fn with_base_url_rejects_garbage() {
        let result = EnrichClient::with_base_url("key", 30, "not a url");
        assert!(matches!(result, Err(EnrichError::Api(_))));
    }
}
