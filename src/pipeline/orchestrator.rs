use std::path::PathBuf;

use crate::audit::{AuditEvent, AuditLogger};
use crate::command::{extract_command, sanitize_command};
use crate::llm::Translator;
use crate::pipeline::operator::Operator;
use crate::pipeline::state::{Confirmation, Instruction, PipelineOutcome, PipelineState, Stage};
use crate::security::{CommandPolicy, ValidatedCommand, ValidationError};
use crate::shell::{ExecutionError, ExecutionResult, ShellExecutor};

/// Drives one instruction from model request to (at most one) execution
///
/// Every stage fails fast; nothing is retried and nothing is kept between runs.
pub struct Pipeline {
    translator: Translator,
    policy: &'static CommandPolicy,
    executor: ShellExecutor,
    audit: Option<AuditLogger>,
}

impl Pipeline {
    pub fn new(translator: Translator, executor: ShellExecutor) -> Self {
        Self {
            translator,
            policy: CommandPolicy::global(),
            executor,
            audit: None,
        }
    }

    pub fn with_policy(mut self, policy: &'static CommandPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_audit(mut self, audit: AuditLogger) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Run the pipeline for one instruction
    ///
    /// With `dry_run` set the confirmation step is skipped and the command is
    /// only simulated.
    pub async fn run(
        &self,
        instruction: &Instruction,
        operator: &mut dyn Operator,
        dry_run: bool,
    ) -> PipelineOutcome {
        let mut state = PipelineState::Received;
        tracing::info!(instruction = instruction.as_str(), "pipeline started");

        let raw = match self.translator.translate(instruction.as_str()).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(error = %e, "translation failed");
                return self.finish(
                    &mut state,
                    PipelineOutcome::Failed {
                        stage: Stage::Translation,
                        cause: e.to_string(),
                        output: None,
                    },
                );
            }
        };
        advance(&mut state, PipelineState::Translated);

        let extracted = extract_command(&raw);
        tracing::debug!(command = extracted.as_str(), "extracted command");
        advance(&mut state, PipelineState::Extracted);

        let sanitized = sanitize_command(extracted);
        tracing::debug!(command = sanitized.as_str(), "sanitized command for validation");
        advance(&mut state, PipelineState::Sanitized);

        let validated = match self.policy.validate(sanitized) {
            Ok(validated) => validated,
            Err(e) => {
                let ValidationError::PolicyRejected { command } = &e;
                tracing::warn!(command = command.as_str(), "command rejected by policy");
                self.audit(AuditEvent::Rejected {
                    instruction: instruction.as_str(),
                    llm_output: &raw,
                    reason: &e.to_string(),
                });
                return self.finish(
                    &mut state,
                    PipelineOutcome::Rejected {
                        command: command.clone(),
                    },
                );
            }
        };
        tracing::debug!(command = validated.as_str(), rule = validated.rule(), "command validated");
        advance(&mut state, PipelineState::Validated);

        operator.show_command(&validated);

        let simulate = if dry_run {
            true
        } else {
            advance(&mut state, PipelineState::AwaitingConfirmation);
            match operator.confirm(&validated) {
                Ok(Confirmation::Abort) => {
                    tracing::info!("operator aborted execution");
                    return self.finish(
                        &mut state,
                        PipelineOutcome::Aborted {
                            command: validated.as_str().to_string(),
                        },
                    );
                }
                Ok(Confirmation::DryRun) => true,
                Ok(Confirmation::Execute) => false,
                Err(e) => {
                    tracing::error!(error = %e, "confirmation failed");
                    return self.finish(
                        &mut state,
                        PipelineOutcome::Failed {
                            stage: Stage::Confirmation,
                            cause: e.to_string(),
                            output: None,
                        },
                    );
                }
            }
        };

        let outcome = self.execute(&validated, simulate);
        self.finish(&mut state, outcome)
    }

    fn execute(&self, command: &ValidatedCommand, simulate: bool) -> PipelineOutcome {
        match self.executor.execute(command, simulate) {
            Ok(result) => {
                let command = command.as_str();
                self.audit(if result.simulated {
                    AuditEvent::DryRun { command }
                } else {
                    AuditEvent::Executed {
                        command,
                        exit_code: result.exit_code,
                    }
                });
                if result.simulated {
                    PipelineOutcome::DryRun(result)
                } else {
                    PipelineOutcome::Executed(result)
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "command execution failed");
                let cause = e.to_string();
                // Only a process that ran and exited counts as an execution
                match &e {
                    ExecutionError::NonZeroExit { code, .. } => self.audit(AuditEvent::Executed {
                        command: command.as_str(),
                        exit_code: *code,
                    }),
                    ExecutionError::Spawn { .. } | ExecutionError::Io { .. } => {
                        self.audit(AuditEvent::Failed {
                            command: command.as_str(),
                            reason: &cause,
                        })
                    }
                }
                let output = Some(e.output()).filter(|output| !output.is_empty());
                PipelineOutcome::Failed {
                    stage: Stage::Execution,
                    cause,
                    output: output.map(str::to_string),
                }
            }
        }
    }

    fn finish(&self, state: &mut PipelineState, outcome: PipelineOutcome) -> PipelineOutcome {
        advance(state, outcome.state());
        if let PipelineOutcome::Executed(ExecutionResult { exit_code, .. }) = &outcome {
            tracing::info!(?exit_code, "command executed");
        }
        outcome
    }

    fn audit(&self, event: AuditEvent<'_>) {
        if let Some(audit) = &self.audit {
            if let Err(e) = audit.record(&event, &current_dir()) {
                tracing::warn!(error = %e, path = %audit.path().display(), "failed to write audit log");
            }
        }
    }
}

fn advance(state: &mut PipelineState, next: PipelineState) {
    tracing::debug!(from = %state, to = %next, "pipeline transition");
    *state = next;
}

fn current_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}
