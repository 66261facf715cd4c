//! Error types for chat-model providers.

use thiserror::Error;

/// Result type for provider operations.
pub type Result<T> = std::result::Result<T, LlmError>;

/// Errors that can occur when talking to a chat-model provider.
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Failed to serialize/deserialize data.
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// API authentication failed.
    #[error("authentication failed: {0}")]
    AuthenticationError(String),

    /// API key not found in the environment.
    #[error("API key not found: {0}")]
    ApiKeyNotFound(String),

    /// Rate limit exceeded.
    #[error("rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// The provider returned a payload that could not be interpreted.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// General provider error.
    #[error("provider error: {0}")]
    ProviderError(String),
}

impl LlmError {
    /// Check if retrying the request might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LlmError::HttpError(_) | LlmError::RateLimitExceeded(_)
        )
    }

    /// Check if this error is due to authentication.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            LlmError::AuthenticationError(_) | LlmError::ApiKeyNotFound(_)
        )
    }
}

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        LlmError::SerializationError(err.to_string())
    }
}

/// Providers surface through the core as model-invocation failures.
impl From<LlmError> for marquee_core::EngineError {
    fn from(err: LlmError) -> Self {
        marquee_core::EngineError::ModelInvocation(err.to_string())
    }
}
