#![allow(dead_code)]

use async_trait::async_trait;
use nlrun::command::SanitizedCommand;
use nlrun::llm::{LLMClient, LLMError, Translator};
use nlrun::pipeline::{Confirmation, Operator, PromptError};
use nlrun::security::{CommandPolicy, ValidatedCommand};

/// LLM client that always answers with the same text
pub struct MockLLMClient {
    pub response: String,
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn generate(&self, _instruction: &str) -> Result<String, LLMError> {
        Ok(self.response.clone())
    }
}

/// LLM client that always fails with an HTTP status
pub struct FailingLLMClient {
    pub status: u16,
}

#[async_trait]
impl LLMClient for FailingLLMClient {
    async fn generate(&self, _instruction: &str) -> Result<String, LLMError> {
        Err(LLMError::ApiError {
            status: self.status,
            body: "unavailable".to_string(),
        })
    }
}

pub fn translator(response: &str) -> Translator {
    Translator::new(Box::new(MockLLMClient {
        response: response.to_string(),
    }))
}

/// Operator that gives a fixed answer and records what it saw
#[derive(Default)]
pub struct ScriptedOperator {
    pub answer: String,
    pub shown: Vec<String>,
    pub confirmations: usize,
}

impl ScriptedOperator {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            ..Default::default()
        }
    }
}

impl Operator for ScriptedOperator {
    fn show_command(&mut self, command: &ValidatedCommand) {
        self.shown.push(command.as_str().to_string());
    }

    fn confirm(&mut self, _command: &ValidatedCommand) -> Result<Confirmation, PromptError> {
        self.confirmations += 1;
        Ok(Confirmation::parse(&self.answer))
    }
}

/// Run text through the global policy, panicking if it is refused
pub fn validated(command: &str) -> ValidatedCommand {
    CommandPolicy::global()
        .validate(SanitizedCommand::from(command))
        .expect("command should be allowed")
}
