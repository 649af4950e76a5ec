pub mod operator;
pub mod orchestrator;
pub mod state;

pub use operator::{Operator, PromptError};
pub use orchestrator::Pipeline;
pub use state::{Confirmation, Instruction, PipelineOutcome, PipelineState, Stage};
