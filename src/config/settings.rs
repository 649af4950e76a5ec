use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::llm::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT};
use crate::shell::executor::DEFAULT_SHELL;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Config directory not found")]
    DirectoryNotFound,

    #[error("Invalid config value: {0}")]
    InvalidValue(String),

    #[error("Missing {0} environment variable")]
    MissingApiKey(String),

    #[error("No instruction provided")]
    EmptyInstruction,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub llm: LLMConfig,
    pub execution: ExecutionConfig,
    pub audit: AuditConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LLMConfig {
    pub model: String,
    pub api_key_env: String,
    pub model_env: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            model_env: "GEMINI_MODEL".to_string(),
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ExecutionConfig {
    pub shell: String,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            shell: DEFAULT_SHELL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct AuditConfig {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
        }
    }
}

impl Config {
    /// `$HOME/.config/nlrun`
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        let home = std::env::var("HOME").map_err(|_| ConfigError::DirectoryNotFound)?;
        Ok(PathBuf::from(home).join(".config").join("nlrun"))
    }

    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration
    ///
    /// An explicit path must exist. Without one, the default location is
    /// tried and a missing file (or missing `HOME`) means built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load_from(path);
        }

        match Self::config_path() {
            Ok(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default_config()),
        }
    }

    /// Load and validate a specific TOML file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;

        config.validate()?;

        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Built-in settings used when no file exists
    pub fn default_config() -> Self {
        Self::default()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::InvalidValue("model must not be empty".to_string()));
        }

        if self.llm.api_key_env.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "api_key_env must not be empty".to_string(),
            ));
        }

        if !self.llm.base_url.starts_with("http://") && !self.llm.base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue(format!(
                "Invalid base_url: {}. Must be an http(s) URL",
                self.llm.base_url
            )));
        }

        if self.llm.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue(
                "timeout_seconds must be greater than 0".to_string(),
            ));
        }

        if self.execution.shell.trim().is_empty() {
            return Err(ConfigError::InvalidValue("shell must not be empty".to_string()));
        }

        Ok(())
    }

    /// API key from the environment, else from the file
    pub fn api_key(&self) -> Result<SecretString, ConfigError> {
        if let Some(key) = non_empty_env(&self.llm.api_key_env) {
            return Ok(SecretString::from(key));
        }

        self.llm
            .api_key
            .as_ref()
            .filter(|key| !key.is_empty())
            .map(|key| SecretString::from(key.clone()))
            .ok_or_else(|| ConfigError::MissingApiKey(self.llm.api_key_env.clone()))
    }

    /// Model identifier, environment first
    pub fn model(&self) -> String {
        non_empty_env(&self.llm.model_env).unwrap_or_else(|| self.llm.model.clone())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.llm.timeout_seconds)
    }

    /// Where the audit log goes, or `None` when auditing is disabled
    pub fn audit_path(&self) -> Result<Option<PathBuf>, ConfigError> {
        if !self.audit.enabled {
            return Ok(None);
        }

        match &self.audit.path {
            Some(path) => Ok(Some(path.clone())),
            None => Ok(Some(Self::config_dir()?.join("history.log"))),
        }
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    if name.is_empty() {
        return None;
    }
    std::env::var(name).ok().filter(|value| !value.is_empty())
}
