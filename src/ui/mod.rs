pub mod output;
pub mod terminal;

pub use output::{exit_code, render_outcome};
pub use terminal::TerminalOperator;
