use crate::llm::client::{LLMClient, LLMError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("LLM error: {0}")]
    LLMError(#[from] LLMError),

    #[error("Model returned an empty response")]
    EmptyResponse,
}

/// Obtains the raw model response for an instruction
pub struct Translator {
    client: Box<dyn LLMClient>,
}

impl Translator {
    pub fn new(client: Box<dyn LLMClient>) -> Self {
        Self { client }
    }

    /// Ask the model for a command; the result is still untrusted text
    pub async fn translate(&self, instruction: &str) -> Result<String, TranslationError> {
        let response = self.client.generate(instruction).await?;

        if response.trim().is_empty() {
            return Err(TranslationError::EmptyResponse);
        }

        tracing::debug!(raw = ?response, "raw generated command");
        Ok(response)
    }
}
