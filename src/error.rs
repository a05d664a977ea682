//! Unified error handling for LLMBox.
//!
//! Provides a consistent error type across the catalog, dispatcher and HTTP layers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;

/// Unified error type for LLMBox operations.
#[derive(Debug, Clone)]
pub enum LlmBoxError {
    /// API key not configured for the catalog source.
    ApiKeyMissing(String),
    /// The request never produced a response (connect, TLS, timeout).
    Request(String),
    /// Upstream answered with a non-success status.
    UpstreamStatus { status: u16, message: String },
    /// Failed to parse upstream response.
    ParseError(String),
    /// Completion response had no textual content in its first choice.
    MissingContent,
    /// Configuration error.
    ConfigError(String),
    /// Caller sent a body that does not match the API.
    InvalidRequest(String),
}

impl fmt::Display for LlmBoxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApiKeyMissing(source) => write!(f, "No API key configured for {}", source),
            Self::Request(msg) => write!(f, "Request failed: {}", msg),
            Self::UpstreamStatus { status, message } => {
                write!(f, "Upstream returned status {}: {}", status, message)
            }
            Self::ParseError(msg) => write!(f, "Parse error: {}", msg),
            Self::MissingContent => write!(f, "Response contained no message content"),
            Self::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            Self::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
        }
    }
}

impl std::error::Error for LlmBoxError {}

impl From<reqwest::Error> for LlmBoxError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::ParseError(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}

#[derive(Serialize)]
struct ErrorResponseBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    message: String,
    r#type: &'static str,
}

impl LlmBoxError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ApiKeyMissing(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Request(_) => StatusCode::BAD_GATEWAY,
            Self::UpstreamStatus { .. } => StatusCode::BAD_GATEWAY,
            Self::ParseError(_) => StatusCode::BAD_GATEWAY,
            Self::MissingContent => StatusCode::BAD_GATEWAY,
            Self::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Get the error type string.
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::ApiKeyMissing(_) | Self::ConfigError(_) => "configuration_error",
            Self::Request(_)
            | Self::UpstreamStatus { .. }
            | Self::ParseError(_)
            | Self::MissingContent => "upstream_error",
            Self::InvalidRequest(_) => "invalid_request",
        }
    }

    /// Render as the per-model placeholder stored in comparison results.
    pub fn to_placeholder(&self) -> String {
        format!("[Error: {}]", self)
    }
}

impl IntoResponse for LlmBoxError {
    fn into_response(self) -> Response {
        let body = ErrorResponseBody {
            error: ErrorDetail {
                message: self.to_string(),
                r#type: self.error_type(),
            },
        };

        (self.status_code(), Json(body)).into_response()
    }
}
