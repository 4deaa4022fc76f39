use crate::services::shell_process::ShellCommand;
use crate::view::theme::Theme;
use serde::{Deserialize, Serialize};
use shellpane_core::history::DEFAULT_HISTORY_LIMIT;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub theme: Theme,

    #[serde(default)]
    pub console: ConsoleConfig,

    /// Where command history is kept between runs.
    /// Defaults to `<data dir>/shellpane/session.json`.
    #[serde(default)]
    pub session_file: Option<PathBuf>,
}

/// Shell and history settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Shell program; the platform default when unset
    #[serde(default)]
    pub shell: Option<String>,

    #[serde(default)]
    pub shell_args: Option<Vec<String>>,

    /// Maximum number of remembered commands. `null` keeps everything.
    #[serde(default = "default_history_limit")]
    pub history_limit: Option<usize>,

    #[serde(default)]
    pub working_dir: Option<PathBuf>,
}

fn default_history_limit() -> Option<usize> {
    Some(DEFAULT_HISTORY_LIMIT)
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            shell: None,
            shell_args: None,
            history_limit: default_history_limit(),
            working_dir: None,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("{}: {}", path.display(), e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path.as_ref(), contents).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Load `path` if given, otherwise the default config file if it
    /// exists, otherwise the built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load_from_file(path);
        }

        match default_config_path() {
            Some(path) if path.exists() => {
                tracing::debug!("Loading config from {}", path.display());
                Self::load_from_file(path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.console.history_limit == Some(0) {
            return Err(ConfigError::ValidationError(
                "history_limit must be greater than 0 (use null for no limit)".to_string(),
            ));
        }

        if let Some(shell) = &self.console.shell {
            if shell.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "shell cannot be empty".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// The command used to launch the shell
    pub fn shell_command(&self) -> ShellCommand {
        let command = match &self.console.shell {
            Some(program) => {
                let args = self.console.shell_args.clone().unwrap_or_default();
                ShellCommand::new(program.clone(), args)
            }
            None => {
                let mut command = ShellCommand::platform_default();
                if let Some(args) = &self.console.shell_args {
                    command.args = args.clone();
                }
                command
            }
        };
        command.with_working_dir(self.console.working_dir.clone())
    }

    /// Resolved session file location, if one can be determined
    pub fn session_path(&self) -> Option<PathBuf> {
        self.session_file.clone().or_else(|| {
            dirs::data_local_dir().map(|dir| dir.join("shellpane").join("session.json"))
        })
    }
}

/// `<config dir>/shellpane/config.json`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("shellpane").join("config.json"))
}

/// Configuration error types
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(msg) => write!(f, "IO error: {msg}"),
            ConfigError::ParseError(msg) => write!(f, "Parse error: {msg}"),
            ConfigError::SerializeError(msg) => write!(f, "Serialize error: {msg}"),
            ConfigError::ValidationError(msg) => write!(f, "Validation error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}
