//! Configuration loading and management.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Runtime configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,
    /// Command matching configuration.
    #[serde(default)]
    pub commands: CommandsConfig,
    /// Builtin modules to start.
    #[serde(default)]
    pub modules: ModulesConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Default `EnvFilter` directive, used when `RUST_LOG` is unset (default: "info").
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

/// How the first token of a line is compared against registered keywords.
///
/// Tables always store keywords lower-cased.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordMatch {
    /// Lower-case the token before lookup, so `ECHO` finds `echo`.
    #[default]
    Insensitive,
    /// Compare the token as typed. Uppercase input never matches.
    Exact,
}

impl KeywordMatch {
    /// Normalize a user token into a table key.
    pub fn key(self, token: &str) -> std::borrow::Cow<'_, str> {
        match self {
            Self::Insensitive => std::borrow::Cow::Owned(token.to_lowercase()),
            Self::Exact => std::borrow::Cow::Borrowed(token),
        }
    }
}

/// Command matching configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommandsConfig {
    /// Keyword comparison mode (default: insensitive).
    #[serde(default)]
    pub keyword_match: KeywordMatch,
}

/// Builtin module selection.
#[derive(Debug, Clone, Deserialize)]
pub struct ModulesConfig {
    /// Builtin module names, started in this order.
    #[serde(default = "default_builtins")]
    pub builtins: Vec<String>,
}

impl Default for ModulesConfig {
    fn default() -> Self {
        Self {
            builtins: default_builtins(),
        }
    }
}

fn default_log_filter() -> String {
    "info".to_string()
}

fn default_builtins() -> Vec<String> {
    ["tty", "command_registry", "help", "echo", "time"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_values_are_correct() {
        let config = Config::default();
        assert_eq!(config.log.filter, "info");
        assert!(!config.log.json);
        assert_eq!(config.commands.keyword_match, KeywordMatch::Insensitive);
        assert_eq!(
            config.modules.builtins,
            ["tty", "command_registry", "help", "echo", "time"]
        );
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.log.filter, "info");
        assert_eq!(config.modules.builtins.len(), 5);
    }

    #[test]
    fn parses_all_sections() {
        let config: Config = toml::from_str(
            r#"
            [log]
            filter = "herald=debug"
            json = true

            [commands]
            keyword_match = "exact"

            [modules]
            builtins = ["command_registry", "help"]
            "#,
        )
        .unwrap();
        assert_eq!(config.log.filter, "herald=debug");
        assert!(config.log.json);
        assert_eq!(config.commands.keyword_match, KeywordMatch::Exact);
        assert_eq!(config.modules.builtins, ["command_registry", "help"]);
    }

    #[test]
    fn rejects_unknown_match_mode() {
        let result: Result<Config, _> = toml::from_str("[commands]\nkeyword_match = \"fuzzy\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn keyword_match_key() {
        assert_eq!(KeywordMatch::Insensitive.key("EcHo"), "echo");
        assert_eq!(KeywordMatch::Exact.key("EcHo"), "EcHo");
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[log]\nfilter = \"warn\"").unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.log.filter, "warn");
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = Config::load("/nonexistent/herald.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
