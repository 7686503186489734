//! Error types for the OpenAI client.

use thiserror::Error;

/// Result type for OpenAI client operations.
pub type Result<T> = std::result::Result<T, OpenAIError>;

/// OpenAI client errors.
#[derive(Debug, Error)]
pub enum OpenAIError {
    /// Missing API key or invalid settings
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection failed, timed out, or the request never left the client
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response (rate limit, invalid request, outage)
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Body was not the JSON shape we expected
    #[error("Parse error: {0}")]
    Parse(String),

    /// Completion came back without any choice or content
    #[error("OpenAI returned an empty completion")]
    EmptyResponse,
}

impl OpenAIError {
    /// HTTP status of the failed call, when the API answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            OpenAIError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the API rejected the call for exceeding a rate limit.
    pub fn is_rate_limited(&self) -> bool {
        self.status() == Some(429)
    }
}
