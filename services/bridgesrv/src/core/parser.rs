//! Command parsing for the wire protocol
//!
//! One raw chunk read from a socket becomes at most one [`Command`]. The
//! grammar is whitespace-separated tokens with no quoting or escaping;
//! numeric and hex conversion is deferred to the dispatcher so that
//! conversion failures surface as command-specific errors.

/// A parsed wire command: lowercased name plus raw string arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub name: String,
    pub args: Vec<String>,
}

/// Parse one raw request into a [`Command`]
///
/// Returns `None` when the input is empty after trimming (the empty
/// command case). Invalid UTF-8 is replaced rather than rejected.
pub fn parse_command(raw: &[u8]) -> Option<Command> {
    let text = String::from_utf8_lossy(raw);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut tokens = trimmed.split_whitespace();
    let name = tokens.next()?.to_lowercase();
    let args = tokens.map(str::to_owned).collect();

    Some(Command { name, args })
}
