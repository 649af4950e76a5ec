use crate::command::extractor::ExtractedCommand;

/// Label the model sometimes puts in front of the command it emits
///
/// Matched case-sensitively; other spellings ("command:", "Command :") are
/// left untouched and will be refused by the policy.
pub const COMMAND_LABEL: &str = "Command:";

/// Extracted command with the label and surrounding whitespace removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedCommand(String);

impl SanitizedCommand {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<&str> for SanitizedCommand {
    /// Sanitize raw text directly, for callers that skip extraction
    fn from(text: &str) -> Self {
        Self(strip_label(text).to_string())
    }
}

pub fn sanitize_command(extracted: ExtractedCommand) -> SanitizedCommand {
    SanitizedCommand::from(extracted.as_str())
}

// Repeated labels are stripped too, otherwise a second pass would change the result.
fn strip_label(mut text: &str) -> &str {
    loop {
        text = text.trim();
        match text.strip_prefix(COMMAND_LABEL) {
            Some(rest) => text = rest,
            None => return text,
        }
    }
}
