//! Command dispatcher - Routes parsed commands to their behaviour

use std::time::{Duration, Instant};

use crate::application::errors::CommandError;
use crate::domain::entities::{CommandInvocation, CommandKind, CommandTable, FilterRegistry};
use super::parser::{parse_command, ParsedCommand};

/// What the session should do after posting a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Shutdown,
}

/// Response text plus the out-of-band control signal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub response: String,
    pub control: Control,
}

impl CommandOutcome {
    pub fn reply(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            control: Control::Continue,
        }
    }

    pub fn shutdown(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            control: Control::Shutdown,
        }
    }
}

/// Handler result
pub type HandlerResult = Result<CommandOutcome, CommandError>;

/// Turns mention text into a response
pub struct CommandDispatcher {
    table: CommandTable,
    filters: FilterRegistry,
    bot_name: String,
    started_at: Instant,
}

impl CommandDispatcher {
    pub fn new(table: CommandTable, bot_name: impl Into<String>) -> Self {
        Self {
            table,
            filters: FilterRegistry::new(),
            bot_name: bot_name.into(),
            started_at: Instant::now(),
        }
    }

    /// Reset the uptime clock, called when the session starts
    pub fn with_started_at(mut self, started_at: Instant) -> Self {
        self.started_at = started_at;
        self
    }

    pub fn table(&self) -> &CommandTable {
        &self.table
    }

    pub fn filters(&self) -> &FilterRegistry {
        &self.filters
    }

    /// Parse and execute one command string received on `channel`
    pub fn handle(&mut self, raw: &str, channel: &str) -> HandlerResult {
        let invocation = match parse_command(raw)? {
            ParsedCommand::Invocation(invocation) => invocation,
            ParsedCommand::Malformed { name } => {
                tracing::warn!("[{}] Could not tokenize command: {:?}", channel, raw);
                return Ok(self.unknown(channel, &name));
            }
        };

        tracing::info!("[{}] Received command: {:?}", channel, raw);

        let Some(kind) = self.table.lookup(&invocation.command).map(|spec| spec.kind) else {
            return Ok(self.unknown(channel, &invocation.command));
        };

        self.execute(kind, invocation)
    }

    fn unknown(&self, channel: &str, name: &str) -> CommandOutcome {
        let response = format!("Unknown command: \"{}\"", name);
        tracing::error!("[{}] {}", channel, response);
        CommandOutcome::reply(response)
    }

    fn execute(&mut self, kind: CommandKind, invocation: CommandInvocation) -> HandlerResult {
        let args = invocation.args;
        let outcome = match kind {
            CommandKind::Help => CommandOutcome::reply(self.table.help_text()),
            CommandKind::Ping => CommandOutcome::reply(format!(
                "{} has been up for {}",
                self.bot_name,
                format_uptime(self.started_at.elapsed())
            )),
            CommandKind::List => CommandOutcome::reply(self.list_filters()),
            CommandKind::Add => CommandOutcome::reply(self.add_filters(&args)),
            CommandKind::Del => CommandOutcome::reply(self.del_filters(&args)),
            CommandKind::Clear => {
                let removed = self.filters.clear();
                CommandOutcome::reply(format!("Cleared {} filter(s)", removed))
            }
            CommandKind::Exit | CommandKind::Quit => {
                CommandOutcome::shutdown(format!("{} is shutting down", self.bot_name))
            }
            CommandKind::Raise => {
                return Err(CommandError::DeliberateFault(format!(
                    "{} command invoked",
                    kind
                )))
            }
        };
        Ok(outcome)
    }

    fn list_filters(&self) -> String {
        if self.filters.is_empty() {
            return "No filters configured.".to_string();
        }
        let mut out = "Current filters:\n".to_string();
        for (keyword, count) in self.filters.iter() {
            out.push_str(&format!("  {}: {}\n", keyword, count));
        }
        out
    }

    fn add_filters(&mut self, args: &[String]) -> String {
        if args.is_empty() {
            return "Usage: add <keyword> [keyword ...]".to_string();
        }
        let added: Vec<&str> = args
            .iter()
            .filter(|kw| self.filters.add(kw.as_str()))
            .map(|kw| kw.as_str())
            .collect();
        if added.is_empty() {
            "All of those filters already exist.".to_string()
        } else {
            format!("Added {} filter(s): {}", added.len(), added.join(", "))
        }
    }

    fn del_filters(&mut self, args: &[String]) -> String {
        if args.is_empty() {
            return "Usage: del <keyword> [keyword ...]".to_string();
        }
        let (removed, missing): (Vec<&String>, Vec<&String>) =
            args.iter().partition(|kw| self.filters.remove(kw));

        let mut parts = Vec::new();
        if !removed.is_empty() {
            parts.push(format!("Removed {} filter(s): {}", removed.len(), join(&removed)));
        }
        if !missing.is_empty() {
            parts.push(format!("No such filter(s): {}", join(&missing)));
        }
        parts.join("\n")
    }
}

fn join(words: &[&String]) -> String {
    words.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", ")
}

/// `1d 02h 03m 04s`, with the day part only when there is one
pub fn format_uptime(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    let (days, hours, minutes, seconds) =
        (secs / 86_400, (secs % 86_400) / 3_600, (secs % 3_600) / 60, secs % 60);
    if days > 0 {
        format!("{}d {:02}h {:02}m {:02}s", days, hours, minutes, seconds)
    } else {
        format!("{}h {:02}m {:02}s", hours, minutes, seconds)
    }
}
