pub mod audit;
pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod security;
pub mod shell;
pub mod ui;

// Re-export commonly used types for convenience
pub use error::{AppError, AppResult};
pub use pipeline::{Instruction, Pipeline, PipelineOutcome};
pub use security::{CommandPolicy, ValidatedCommand};
