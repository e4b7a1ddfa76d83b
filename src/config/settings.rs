//! Configuration settings for tinyagent.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub model: ModelSettings,
    pub tools: ToolSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for storing application data.
    pub data_dir: String,
    /// Append-only structured log of model and tool calls.
    pub log_file: String,
    /// Append-only history of user input lines.
    pub history_file: String,
    /// Log level for the log file (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.tinyagent".to_string(),
            log_file: "~/.tinyagent/agent.log".to_string(),
            history_file: "~/.tinyagent/history".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Language model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// Model identifier sent with every request.
    pub name: String,
    /// Override for the OpenAI-compatible API base URL.
    pub api_base: Option<String>,
    /// HTTP timeout for a single model request.
    pub timeout_secs: u64,
    /// First message of every conversation.
    pub system_prompt: String,
    /// Maximum tool-call rounds in one turn. 0 disables the limit.
    pub max_tool_rounds: usize,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            name: "gpt-5".to_string(),
            api_base: None,
            timeout_secs: 300,
            system_prompt: "Do not run commands on the internet as a whole.".to_string(),
            max_tool_rounds: crate::agent::DEFAULT_MAX_TOOL_ROUNDS,
        }
    }
}

/// Settings shared by all tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    /// Print each shell command and SQL query before running it.
    pub echo_commands: bool,
    /// Programs the shell tool may start (first word of the command), plus
    /// `postgres` to allow database queries. Empty allows everything.
    pub allowed_commands: Vec<String>,
    pub shell: ShellSettings,
    pub postgres: PostgresSettings,
    pub search: SearchSettings,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            echo_commands: true,
            allowed_commands: Vec::new(),
            shell: ShellSettings::default(),
            postgres: PostgresSettings::default(),
            search: SearchSettings::default(),
        }
    }
}

/// Shell tool settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellSettings {
    /// Interpreter invoked as `<program> -c <command>`.
    pub program: String,
}

impl Default for ShellSettings {
    fn default() -> Self {
        Self {
            program: "/bin/bash".to_string(),
        }
    }
}

/// Database query tool settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PostgresSettings {
    /// Client program invoked as `<program> <database> -c <query>`.
    pub program: String,
    pub database: String,
}

impl Default for PostgresSettings {
    fn default() -> Self {
        Self {
            program: "psql".to_string(),
            database: "postgres".to_string(),
        }
    }
}

/// Web search tool settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// HTML results page of the search provider.
    pub endpoint: String,
    /// Value of the `kl` locale parameter.
    pub locale: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Hard cap on the number of response body bytes read.
    pub max_body_bytes: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://html.duckduckgo.com/html/".to_string(),
            locale: "us-en".to_string(),
            user_agent: "agent/1.0 (+local)".to_string(),
            timeout_secs: 12,
            max_body_bytes: 1 << 20,
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::AgentError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tinyagent")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    /// Get the expanded log file path.
    pub fn log_file(&self) -> PathBuf {
        Self::expand_path(&self.general.log_file)
    }

    /// Get the expanded input history path.
    pub fn history_file(&self) -> PathBuf {
        Self::expand_path(&self.general.history_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_tools() {
        let settings = Settings::default();
        assert_eq!(settings.model.name, "gpt-5");
        assert_eq!(settings.tools.shell.program, "/bin/bash");
        assert_eq!(settings.tools.postgres.database, "postgres");
        assert_eq!(settings.tools.search.timeout_secs, 12);
        assert_eq!(settings.tools.search.max_body_bytes, 1024 * 1024);
        assert!(settings.tools.allowed_commands.is_empty());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [model]
            name = "gpt-4.1"
            max_tool_rounds = 0

            [tools.postgres]
            database = "analytics"
            "#,
        )
        .unwrap();

        assert_eq!(settings.model.name, "gpt-4.1");
        assert_eq!(settings.model.max_tool_rounds, 0);
        assert_eq!(settings.model.timeout_secs, 300);
        assert_eq!(settings.tools.postgres.database, "analytics");
        assert_eq!(settings.tools.postgres.program, "psql");
        assert_eq!(settings.tools.search.locale, "us-en");
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut settings = Settings::default();
        settings.tools.allowed_commands = vec!["ls".to_string(), "postgres".to_string()];
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.tools.allowed_commands, settings.tools.allowed_commands);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let settings = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(settings.general.log_level, "info");
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[model\nname = ").unwrap();
        assert!(matches!(
            Settings::load_from(Some(&path)),
            Err(crate::error::AgentError::TomlParse(_))
        ));
    }
}
