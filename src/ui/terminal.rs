use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::pipeline::{Confirmation, Operator, PromptError};
use crate::security::ValidatedCommand;

const INSTRUCTION_PROMPT: &str = "Enter your instruction: ";
const CONFIRM_PROMPT: &str = "Do you want to execute this command? (yes/no/dry-run): ";

/// Line-based operator on the controlling terminal
pub struct TerminalOperator {
    editor: DefaultEditor,
    verbose: bool,
}

impl TerminalOperator {
    pub fn new(verbose: bool) -> Result<Self, PromptError> {
        let editor = DefaultEditor::new().map_err(|e| PromptError::Read(e.to_string()))?;
        Ok(Self { editor, verbose })
    }

    /// Ask for an instruction; end of input yields an empty string
    pub fn read_instruction(&mut self) -> Result<String, PromptError> {
        match self.editor.readline(INSTRUCTION_PROMPT) {
            Ok(line) => Ok(line),
            Err(ReadlineError::Eof) => Ok(String::new()),
            Err(ReadlineError::Interrupted) => Err(PromptError::Interrupted),
            Err(e) => Err(PromptError::Read(e.to_string())),
        }
    }
}

impl Operator for TerminalOperator {
    fn show_command(&mut self, command: &ValidatedCommand) {
        if self.verbose {
            println!("Generated Shell Command: {}", command);
            tracing::info!(command = command.as_str(), rule = command.rule(), "generated command");
        } else {
            println!("Proposed Shell Command: {}", command);
        }
    }

    fn confirm(&mut self, _command: &ValidatedCommand) -> Result<Confirmation, PromptError> {
        match self.editor.readline(CONFIRM_PROMPT) {
            Ok(answer) => Ok(Confirmation::parse(&answer)),
            // Ctrl-C or Ctrl-D at this prompt is a refusal, never a default "yes"
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(Confirmation::Abort),
            Err(e) => Err(PromptError::Read(e.to_string())),
        }
    }
}
