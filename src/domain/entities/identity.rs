use std::fmt;

/// Who the bot is on the platform. Resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BotIdentity {
    pub id: String,
    pub mention_token: String,
}

impl BotIdentity {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let mention_token = format!("<@{}>", id);
        Self { id, mention_token }
    }

    pub fn is_mentioned_in(&self, text: &str) -> bool {
        text.contains(&self.mention_token)
    }

    /// Text between the first mention and the next one (or the end),
    /// trimmed and lower-cased. `None` when the bot isn't mentioned.
    pub fn command_text(&self, text: &str) -> Option<String> {
        text.split(self.mention_token.as_str())
            .nth(1)
            .map(|rest| rest.trim().to_lowercase())
    }
}

impl fmt::Display for BotIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.mention_token)
    }
}
