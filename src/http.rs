//! Shared HTTP client factory.
//!
//! Every upstream call (catalog listing and chat completions) goes through a
//! client built here so the user agent and timeout stay consistent.

use crate::config::UpstreamConfig;
use crate::error::LlmBoxError;
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;

/// Longest slice of a raw upstream body quoted in an error message.
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Create a client from the upstream section of the config.
pub fn create_client(upstream: &UpstreamConfig) -> Result<Client, reqwest::Error> {
    create_client_with_timeout(&upstream.user_agent, upstream.timeout())
}

/// Create a client with a custom user agent and optional timeout.
///
/// `None` leaves reqwest's default in place, which never times out.
pub fn create_client_with_timeout(
    user_agent: &str,
    timeout: Option<Duration>,
) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder().user_agent(user_agent);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build()
}

/// Turn a non-success upstream response into an error.
///
/// Prefers the OpenAI-style `{"error": {"message": ...}}` body, falling back
/// to the raw body text.
pub async fn status_error(response: Response) -> LlmBoxError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    LlmBoxError::UpstreamStatus {
        status: status.as_u16(),
        message: error_message_from_body(&text)
            .unwrap_or_else(|| fallback_message(status, &text)),
    }
}

fn error_message_from_body(text: &str) -> Option<String> {
    let body: Value = serde_json::from_str(text).ok()?;
    let error = body.get("error")?;
    error
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| error.as_str())
        .map(str::to_string)
}

fn fallback_message(status: reqwest::StatusCode, text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect()
    }
}
