/// Opening marker of the fenced block the model is expected to use
pub const BASH_FENCE: &str = "```bash";

/// Closing marker of a fenced block
pub const FENCE: &str = "```";

/// Command text isolated from a raw model response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedCommand(String);

impl ExtractedCommand {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Pull the command out of a free-form model response
///
/// Only the first ```bash block is considered. When there is no such block,
/// it is never closed, or it is empty, the whole response is used instead.
/// Never fails: anything unsafe that slips through here is left for the
/// policy to refuse.
pub fn extract_command(response: &str) -> ExtractedCommand {
    let block = fenced_block(response).filter(|body| !body.is_empty());
    ExtractedCommand(block.unwrap_or_else(|| response.trim()).to_string())
}

fn fenced_block(response: &str) -> Option<&str> {
    let open = response.find(BASH_FENCE)?;
    let body = &response[open + BASH_FENCE.len()..];
    let close = body.find(FENCE)?;
    Some(body[..close].trim())
}
