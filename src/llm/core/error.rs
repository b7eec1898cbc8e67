//! Failures of a chat-completions call
//!
//! Variants follow the life of one request: it may not leave the machine
//! (`Transport`), the provider may refuse it (`Authentication`, `RateLimited`,
//! `Api`, `Http`), or the answer may be unusable (`Decode`, `EmptyResponse`,
//! `InvalidToolArguments`).

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    /// Request never got a status: connect failure, timeout, broken body
    #[error("Transport error: {0}")]
    Transport(String),

    /// 401 from the provider
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// 429 from the provider
    #[error("Rate limited (retry after {retry_after:?})")]
    RateLimited { retry_after: Option<Duration> },

    /// Non-success status carrying the provider's `{"error": {...}}` envelope
    #[error("API error ({code}): {message}")]
    Api { code: String, message: String },

    /// Non-success status with a body we could not interpret
    #[error("HTTP error (status {status}): {body}")]
    Http { status: u16, body: String },

    /// Success status, but the body is not a chat completion
    #[error("Failed to decode completion: {0}")]
    Decode(String),

    /// The completion had no choices
    #[error("Completion contained no choices")]
    EmptyResponse,

    /// The model asked for a tool with arguments that are not a JSON object
    #[error("Invalid arguments for tool call {name} ({id}): {reason}")]
    InvalidToolArguments {
        id: String,
        name: String,
        reason: String,
    },
}

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        LlmError::Decode(err.to_string())
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        let status = err.status();
        let message = err.without_url().to_string();
        match status {
            Some(status) => LlmError::Http {
                status: status.as_u16(),
                body: message,
            },
            None => LlmError::Transport(message),
        }
    }
}
