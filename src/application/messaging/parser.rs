//! Command parser - Splits mention text into a command and its arguments

use crate::application::errors::CommandError;
use crate::domain::entities::CommandInvocation;

/// Result of tokenizing a command string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCommand {
    Invocation(CommandInvocation),
    /// Quoting was unbalanced; `name` is the first whitespace-separated word
    Malformed { name: String },
}

/// Tokenize `raw` with shell-word rules. The first token is the command name.
///
/// Fails with `EmptyCommand` when there is nothing to dispatch.
pub fn parse_command(raw: &str) -> Result<ParsedCommand, CommandError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(CommandError::EmptyCommand);
    }

    match shlex::split(&escape_comments(raw)) {
        Some(mut tokens) => {
            if tokens.is_empty() {
                return Err(CommandError::EmptyCommand);
            }
            let name = tokens.remove(0).to_lowercase();
            Ok(ParsedCommand::Invocation(CommandInvocation::new(name, tokens)))
        }
        None => {
            let name = raw.split_whitespace().next().unwrap_or_default().to_lowercase();
            Ok(ParsedCommand::Malformed { name })
        }
    }
}

/// Escape `#` outside quotes so shlex keeps it as text instead of a comment.
/// Channel names and hashtags are ordinary words in chat.
fn escape_comments(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        match (quote, c) {
            (None, '#') => out.push_str("\\#"),
            (None, '\\') | (Some('"'), '\\') => {
                out.push(c);
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            }
            (None, '"') | (None, '\'') => {
                quote = Some(c);
                out.push(c);
            }
            (Some(q), c) if c == q => {
                quote = None;
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}
