use clap::Parser;
use std::path::PathBuf;

/// Translate a natural-language instruction into an allow-listed shell command
#[derive(Debug, Parser)]
#[command(name = "nlrun", version, about)]
pub struct Args {
    /// Natural language instruction; prompted for when omitted
    #[arg(long)]
    pub instruction: Option<String>,

    /// Simulate the generated command without asking or executing
    #[arg(long)]
    pub dry_run: bool,

    /// Print the generated command with extra framing and debug logging
    #[arg(long)]
    pub verbose: bool,

    /// Config file (default: ~/.config/nlrun/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Instruction given on the command line, if it has any content
    pub fn instruction(&self) -> Option<&str> {
        self.instruction
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }
}
