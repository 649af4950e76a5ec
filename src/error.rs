use std::io;
use thiserror::Error;

use crate::config::settings::ConfigError;
use crate::llm::client::LLMError;
use crate::llm::translator::TranslationError;
use crate::pipeline::operator::PromptError;
use crate::security::policy::ValidationError;
use crate::shell::executor::ExecutionError;

/// Top-level application error that wraps all module-specific errors
///
/// Used by the binary for everything that happens around a pipeline run.
/// Inside a run, failures become a `PipelineOutcome` instead so that every
/// terminal state reaches the operator.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("LLM error: {0}")]
    Llm(#[from] LLMError),

    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    #[error("Policy error: {0}")]
    Policy(#[from] ValidationError),

    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    #[error("Prompt error: {0}")]
    Prompt(#[from] PromptError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for application-level operations
pub type AppResult<T> = std::result::Result<T, AppError>;
