use std::fmt;

use crate::shell::ExecutionResult;

/// Operator-supplied natural-language text, trimmed and non-empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction(String);

impl Instruction {
    pub fn new(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            None
        } else {
            Some(Self(text.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Operator answer at the confirmation prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Execute,
    DryRun,
    Abort,
}

impl Confirmation {
    /// `no` aborts, `dry-run` simulates, anything else (even empty) executes
    pub fn parse(answer: &str) -> Self {
        match answer.trim().to_lowercase().as_str() {
            "no" => Confirmation::Abort,
            "dry-run" => Confirmation::DryRun,
            _ => Confirmation::Execute,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Received,
    Translated,
    Extracted,
    Sanitized,
    Validated,
    AwaitingConfirmation,
    Executed,
    DryRun,
    Aborted,
    Rejected,
    Failed,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Received => "received",
            PipelineState::Translated => "translated",
            PipelineState::Extracted => "extracted",
            PipelineState::Sanitized => "sanitized",
            PipelineState::Validated => "validated",
            PipelineState::AwaitingConfirmation => "awaiting-confirmation",
            PipelineState::Executed => "executed",
            PipelineState::DryRun => "dry-run",
            PipelineState::Aborted => "aborted",
            PipelineState::Rejected => "rejected",
            PipelineState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Stage a failed run stopped at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Translation,
    Confirmation,
    Execution,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Translation => f.write_str("translation"),
            Stage::Confirmation => f.write_str("confirmation"),
            Stage::Execution => f.write_str("execution"),
        }
    }
}

/// How one instruction run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    Executed(ExecutionResult),
    DryRun(ExecutionResult),
    Aborted {
        command: String,
    },
    Rejected {
        command: String,
    },
    Failed {
        stage: Stage,
        cause: String,
        /// Output captured before the failure, if a process ran
        output: Option<String>,
    },
}

impl PipelineOutcome {
    pub fn state(&self) -> PipelineState {
        match self {
            PipelineOutcome::Executed(_) => PipelineState::Executed,
            PipelineOutcome::DryRun(_) => PipelineState::DryRun,
            PipelineOutcome::Aborted { .. } => PipelineState::Aborted,
            PipelineOutcome::Rejected { .. } => PipelineState::Rejected,
            PipelineOutcome::Failed { .. } => PipelineState::Failed,
        }
    }
}
