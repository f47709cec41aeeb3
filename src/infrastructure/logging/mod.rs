//! Logging setup from `logging.yaml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use crate::application::errors::ConfigError;

/// Output layout of log lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct LoggingConfig {
    /// Default directive, e.g. `info`
    #[serde(default = "default_level")]
    pub level: String,
    /// Extra per-target directives, e.g. `reqwest=warn`
    #[serde(default)]
    pub directives: Vec<String>,
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default)]
    pub target: bool,
    #[serde(default = "default_ansi")]
    pub ansi: bool,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_ansi() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            directives: Vec::new(),
            format: LogFormat::default(),
            target: false,
            ansi: default_ansi(),
        }
    }
}

impl LoggingConfig {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse logging config: {}", e)))
    }

    /// Filter from the file's directives, with `extra` (usually `RUST_LOG`) on top
    pub fn env_filter(&self, extra: Option<&str>) -> Result<EnvFilter, ConfigError> {
        let mut directives = vec![self.level.clone()];
        directives.extend(self.directives.iter().cloned());
        if let Some(extra) = extra.filter(|s| !s.trim().is_empty()) {
            directives.push(extra.to_string());
        }

        EnvFilter::try_new(directives.join(","))
            .map_err(|e| ConfigError::InvalidValue(format!("Bad log directive: {}", e)))
    }

    /// Install the global subscriber
    pub fn init(&self) -> Result<(), ConfigError> {
        let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
        let filter = self.env_filter(rust_log.as_deref())?;

        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(self.target)
            .with_ansi(self.ansi);

        let result = match self.format {
            LogFormat::Full => builder.try_init(),
            LogFormat::Compact => builder.compact().try_init(),
            LogFormat::Pretty => builder.pretty().try_init(),
            LogFormat::Json => builder.json().try_init(),
        };

        result.map_err(|e| ConfigError::InvalidValue(format!("Failed to install logger: {}", e)))
    }
}
