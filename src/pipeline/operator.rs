use thiserror::Error;

use crate::pipeline::state::Confirmation;
use crate::security::ValidatedCommand;

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Failed to read input: {0}")]
    Read(String),

    #[error("Input interrupted")]
    Interrupted,
}

/// The human in the loop
///
/// Sees every validated command before it runs and decides whether it runs.
pub trait Operator {
    fn show_command(&mut self, command: &ValidatedCommand);

    fn confirm(&mut self, command: &ValidatedCommand) -> Result<Confirmation, PromptError>;
}
