pub mod extractor;
pub mod sanitizer;

pub use extractor::{extract_command, ExtractedCommand};
pub use sanitizer::{sanitize_command, SanitizedCommand, COMMAND_LABEL};
