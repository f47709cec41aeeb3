use std::fmt;

/// The fixed set of commands the bot understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Help,
    Ping,
    Exit,
    Quit,
    List,
    Add,
    Del,
    Clear,
    Raise,
}

impl CommandKind {
    /// Definition order, which is also the order `help` lists them in
    pub const ALL: [CommandKind; 9] = [
        CommandKind::Help,
        CommandKind::Ping,
        CommandKind::Exit,
        CommandKind::Quit,
        CommandKind::List,
        CommandKind::Add,
        CommandKind::Del,
        CommandKind::Clear,
        CommandKind::Raise,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CommandKind::Help => "help",
            CommandKind::Ping => "ping",
            CommandKind::Exit => "exit",
            CommandKind::Quit => "quit",
            CommandKind::List => "list",
            CommandKind::Add => "add",
            CommandKind::Del => "del",
            CommandKind::Clear => "clear",
            CommandKind::Raise => "raise",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CommandKind::Help => "Shows this helpful command reference.",
            CommandKind::Ping => "Show uptime of this bot.",
            CommandKind::Exit => "Shutdown the entire bot (requires app restart)",
            CommandKind::Quit => "Same as exit.",
            CommandKind::List => "List current twitter filters and their counters",
            CommandKind::Add => "Add some twitter keyword filters.",
            CommandKind::Del => "Remove some twitter keyword filters.",
            CommandKind::Clear => "Remove all twitter filters",
            CommandKind::Raise => "Manually test exception handler",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A recognized command name and its help text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub kind: CommandKind,
    pub name: String,
    pub description: String,
}

impl CommandSpec {
    pub fn new(kind: CommandKind) -> Self {
        Self {
            kind,
            name: kind.name().to_string(),
            description: kind.description().to_string(),
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }
}

/// Immutable table of recognized commands, built once at startup
#[derive(Debug, Clone)]
pub struct CommandTable {
    entries: Vec<CommandSpec>,
}

impl CommandTable {
    /// Table holding every command in definition order
    pub fn standard() -> Self {
        Self::from_specs(CommandKind::ALL.iter().copied().map(CommandSpec::new))
    }

    /// Build a table from explicit specs. Later duplicates of a name are dropped.
    pub fn from_specs(specs: impl IntoIterator<Item = CommandSpec>) -> Self {
        let mut entries: Vec<CommandSpec> = Vec::new();
        for spec in specs {
            if entries.iter().all(|e| e.name != spec.name) {
                entries.push(spec);
            }
        }
        Self { entries }
    }

    pub fn lookup(&self, name: &str) -> Option<&CommandSpec> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandSpec> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Help text listing every entry, one per line
    pub fn help_text(&self) -> String {
        let mut help = "Available commands:\n".to_string();
        for spec in &self.entries {
            help.push_str(&format!("  {} - {}\n", spec.name, spec.description));
        }
        help
    }
}

impl Default for CommandTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// A parsed command, created and discarded within one message handling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    pub command: String,
    pub args: Vec<String>,
}

impl CommandInvocation {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_in_definition_order() {
        let table = CommandTable::standard();
        let names: Vec<&str> = table.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["help", "ping", "exit", "quit", "list", "add", "del", "clear", "raise"]
        );
    }

    #[test]
    fn test_lookup() {
        let table = CommandTable::standard();
        assert_eq!(table.lookup("ping").map(|s| s.kind), Some(CommandKind::Ping));
        assert!(table.contains("clear"));
        assert!(!table.contains("version"));
        assert!(!table.contains("HELP"));
    }

    #[test]
    fn test_duplicates_dropped() {
        let table = CommandTable::from_specs(vec![
            CommandSpec::new(CommandKind::Help),
            CommandSpec::new(CommandKind::Help).with_description("other"),
        ]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup("help").unwrap().description, CommandKind::Help.description());
    }

    #[test]
    fn test_help_text_lists_each_entry_once() {
        let table = CommandTable::standard();
        let help = table.help_text();
        for spec in table.iter() {
            let line = format!("  {} - {}", spec.name, spec.description);
            assert_eq!(help.lines().filter(|l| *l == line).count(), 1, "{}", line);
        }
    }
}
