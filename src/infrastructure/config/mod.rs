//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::application::errors::ConfigError;
use crate::application::services::SessionSettings;

pub const TOKEN_VAR: &str = "BOT_USER_TOKEN";
pub const BOT_ID_VAR: &str = "BOT_USER_ID";

/// Bot configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub bot: BotConfig,
    #[serde(default)]
    pub slack: SlackConfig,
    #[serde(default)]
    pub adapter: AdapterKind,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BotConfig {
    pub name: String,
    pub default_channel: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SlackConfig {
    pub api_base: String,
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            api_base: "https://slack.com/api".to_string(),
        }
    }
}

/// Which platform adapter `run` drives
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AdapterKind {
    #[default]
    Slack,
    Console,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                name: "zuschauer-bot".to_string(),
                default_channel: "#bot-test".to_string(),
            },
            slack: SlackConfig::default(),
            adapter: AdapterKind::default(),
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        tracing::debug!("Reading config from {}", path.display());
        let content = std::fs::read_to_string(&path)?;

        Self::from_yaml(&content)
    }

    /// Defaults when `path` doesn't exist; a file that exists must parse
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.bot.name.trim().is_empty() {
            return Err(ConfigError::InvalidValue("bot.name must not be empty".to_string()));
        }
        if self.bot.default_channel.trim().is_empty() {
            return Err(ConfigError::InvalidValue("bot.default-channel must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            bot_name: self.bot.name.clone(),
            default_channel: self.bot.default_channel.clone(),
        }
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

/// Platform credentials taken from the environment
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: String,
    /// Pre-known bot user id; resolved from the platform when absent
    pub bot_id: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .field("bot_id", &self.bot_id)
            .finish()
    }
}

impl Credentials {
    pub fn from_env(token_override: Option<String>) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok(), token_override)
    }

    pub fn from_lookup<F>(lookup: F, token_override: Option<String>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = token_override
            .or_else(|| lookup(TOKEN_VAR))
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingField(TOKEN_VAR.to_string()))?;

        let bot_id = lookup(BOT_ID_VAR).filter(|id| !id.trim().is_empty());

        Ok(Self { token, bot_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::errors::BotError;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r##"
bot:
  name: watcher
  default-channel: "#general"
slack:
  api-base: http://localhost:9000/api
adapter: console
"##;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.bot.name, "watcher");
        assert_eq!(config.bot.default_channel, "#general");
        assert_eq!(config.slack.api_base, "http://localhost:9000/api");
        assert_eq!(config.adapter, AdapterKind::Console);
    }

    #[test]
    fn test_optional_sections_default() {
        let config = Config::from_yaml("bot:\n  name: watcher\n  default-channel: \"#x\"\n").unwrap();
        assert_eq!(config.slack, SlackConfig::default());
        assert_eq!(config.adapter, AdapterKind::Slack);
    }

    #[test]
    fn test_empty_name_rejected() {
        let err = Config::from_yaml("bot:\n  name: \"\"\n  default-channel: \"#x\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }

    #[test]
    fn test_default_round_trips_through_yaml() {
        let yaml = Config::default().to_yaml().unwrap();
        assert_eq!(Config::from_yaml(&yaml).unwrap(), Config::default());
    }

    #[test]
    fn test_load_or_default() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("config.yaml");
        assert_eq!(Config::load_or_default(&missing).unwrap(), Config::default());

        let mut file = std::fs::File::create(&missing).unwrap();
        writeln!(file, "bot: [not, a, map]").unwrap();
        assert!(Config::load_or_default(&missing).is_err());
    }

    #[test]
    fn test_unreadable_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(dir.path().join("config.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
        assert!(BotError::from(err).is_fatal_startup());
    }

    #[test]
    fn test_credentials() {
        let creds = Credentials::from_lookup(env(&[(TOKEN_VAR, "xoxb-1"), (BOT_ID_VAR, "U1")]), None).unwrap();
        assert_eq!(creds.token, "xoxb-1");
        assert_eq!(creds.bot_id.as_deref(), Some("U1"));

        let creds = Credentials::from_lookup(env(&[(TOKEN_VAR, "xoxb-1"), (BOT_ID_VAR, "")]), None).unwrap();
        assert_eq!(creds.bot_id, None);

        let creds = Credentials::from_lookup(env(&[]), Some("xoxb-cli".to_string())).unwrap();
        assert_eq!(creds.token, "xoxb-cli");

        let err = Credentials::from_lookup(env(&[(BOT_ID_VAR, "U1")]), None).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(field) if field == TOKEN_VAR));
    }

    #[test]
    fn test_credentials_debug_hides_token() {
        let creds = Credentials { token: "xoxb-secret".to_string(), bot_id: None };
        assert!(!format!("{:?}", creds).contains("xoxb-secret"));
    }
}
