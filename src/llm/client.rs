use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during LLM operations
#[derive(Debug, Error)]
pub enum LLMError {
    #[error("API returned status {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Trait for LLM clients that turn an instruction into raw command text
///
/// The returned text is untrusted: it may carry prose, code fences or labels
/// around the command and has not been checked against any policy.
#[async_trait]
pub trait LLMClient: Send + Sync {
    async fn generate(&self, instruction: &str) -> Result<String, LLMError>;
}
