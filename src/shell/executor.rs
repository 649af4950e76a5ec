use std::io::{self, Read};
use std::process::{Command, ExitStatus, Stdio};
use thiserror::Error;

use crate::security::ValidatedCommand;

pub const DEFAULT_SHELL: &str = "sh";

#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("Command exited with {}", exit_description(.code))]
    NonZeroExit { code: Option<i32>, output: String },

    #[error("Failed to start {shell}: {source}")]
    Spawn {
        shell: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to collect command output: {source}")]
    Io {
        output: String,
        #[source]
        source: io::Error,
    },
}

impl ExecutionError {
    /// Whatever the command printed before failing
    pub fn output(&self) -> &str {
        match self {
            ExecutionError::NonZeroExit { output, .. } | ExecutionError::Io { output, .. } => output,
            ExecutionError::Spawn { .. } => "",
        }
    }
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

/// Result of running (or simulating) a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Combined stdout and stderr, in the order the command wrote them
    pub output: String,
    pub success: bool,
    pub exit_code: Option<i32>,
    /// True for dry runs, where no process was started
    pub simulated: bool,
}

/// Runs validated commands through a shell interpreter
///
/// There is no timeout: a command that never exits blocks the caller.
#[derive(Debug, Clone)]
pub struct ShellExecutor {
    shell: String,
}

impl ShellExecutor {
    pub fn new() -> Self {
        Self::with_shell(DEFAULT_SHELL)
    }

    pub fn with_shell(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }

    /// Execute a validated command, or describe it when `dry_run` is set
    ///
    /// Failures are reported once and never retried.
    pub fn execute(
        &self,
        command: &ValidatedCommand,
        dry_run: bool,
    ) -> Result<ExecutionResult, ExecutionError> {
        if dry_run {
            return Ok(Self::simulate(command));
        }

        let (output, status) = self.run_shell(command.as_str())?;
        Self::process_output(output, status)
    }

    fn simulate(command: &ValidatedCommand) -> ExecutionResult {
        ExecutionResult {
            output: format!("[Dry Run] Command: {}", command.as_str()),
            success: true,
            exit_code: None,
            simulated: true,
        }
    }

    /// Spawn `<shell> -c <command>` with stdout and stderr on one pipe
    fn run_shell(&self, script: &str) -> Result<(String, ExitStatus), ExecutionError> {
        let spawn_error = |source| ExecutionError::Spawn {
            shell: self.shell.clone(),
            source,
        };

        let (mut reader, writer) = io::pipe().map_err(spawn_error)?;
        let stderr_writer = writer.try_clone().map_err(spawn_error)?;

        // The builder owns the parent's copies of the write end; it must be
        // dropped before reading or the pipe never reports EOF.
        let mut child = {
            let mut cmd = Command::new(&self.shell);
            cmd.arg("-c")
                .arg(script)
                .stdin(Stdio::null())
                .stdout(writer)
                .stderr(stderr_writer);
            cmd.spawn().map_err(spawn_error)?
        };

        let mut bytes = Vec::new();
        let read_result = reader.read_to_end(&mut bytes);
        let output = String::from_utf8_lossy(&bytes).to_string();

        let status = child.wait().map_err(|source| ExecutionError::Io {
            output: output.clone(),
            source,
        })?;

        if let Err(source) = read_result {
            return Err(ExecutionError::Io { output, source });
        }

        Ok((output, status))
    }

    fn process_output(output: String, status: ExitStatus) -> Result<ExecutionResult, ExecutionError> {
        let exit_code = status.code();

        if !status.success() {
            return Err(ExecutionError::NonZeroExit {
                code: exit_code,
                output,
            });
        }

        Ok(ExecutionResult {
            output,
            success: true,
            exit_code,
            simulated: false,
        })
    }
}

impl Default for ShellExecutor {
    fn default() -> Self {
        Self::new()
    }
}
