use crate::pipeline::{PipelineOutcome, Stage};

pub const EXIT_OK: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_REJECTED: i32 = 2;

/// Text shown to the operator once a run has ended
pub fn render_outcome(outcome: &PipelineOutcome) -> String {
    match outcome {
        PipelineOutcome::Executed(result) | PipelineOutcome::DryRun(result) => {
            format!("Command Output:\n{}", result.output)
        }
        PipelineOutcome::Aborted { .. } => "Command execution aborted.".to_string(),
        PipelineOutcome::Rejected { command } => {
            format!("Refused: {} is not permitted by the command policy", command)
        }
        PipelineOutcome::Failed {
            stage,
            cause,
            output,
        } => {
            let mut text = match stage {
                Stage::Translation => format!("Error translating instruction: {}", cause),
                Stage::Confirmation => format!("Failed to read confirmation: {}", cause),
                Stage::Execution => format!("Error executing command: {}", cause),
            };
            // Partial output is kept even on failure; it shows what already happened.
            if let Some(output) = output.as_deref().filter(|output| !output.is_empty()) {
                text.push_str("\nCommand Output:\n");
                text.push_str(output);
            }
            text
        }
    }
}

/// Process exit code for a finished run
///
/// A policy refusal is not a crash, but scripts still need to tell it apart
/// from a command that ran.
pub fn exit_code(outcome: &PipelineOutcome) -> i32 {
    match outcome {
        PipelineOutcome::Executed(_) | PipelineOutcome::DryRun(_) | PipelineOutcome::Aborted { .. } => {
            EXIT_OK
        }
        PipelineOutcome::Rejected { .. } => EXIT_REJECTED,
        PipelineOutcome::Failed { .. } => EXIT_FAILURE,
    }
}
