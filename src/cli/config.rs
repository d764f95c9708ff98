//! Configuration management for openrouter-cli
//!
//! Provides TOML-based configuration with defaults and validation.
//! Location: ~/.openrouter-cli/config.toml

use crate::errors::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default API root
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default chat model
pub const DEFAULT_MODEL: &str = "qwen/qwen3-14b:free";

/// Default history log, relative to the working directory
pub const DEFAULT_HISTORY_FILE: &str = "history.jsonl";

/// Environment variable holding the bearer token
pub const DEFAULT_API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Complete configuration for openrouter-cli
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub chat: ChatConfig,
}

/// Remote API connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Sent as `HTTP-Referer`
    pub referer: String,
    /// Sent as `X-Title`
    pub title: String,
    pub api_key_env: String,
    pub connect_timeout_secs: u64,
}

/// Chat command defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub default_model: String,
    pub history_file: PathBuf,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            referer: "https://github.com/bazoocaze/openrouter-cli".to_string(),
            title: "OpenRouter CLI".to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            connect_timeout_secs: 30,
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            default_model: DEFAULT_MODEL.to_string(),
            history_file: PathBuf::from(DEFAULT_HISTORY_FILE),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(config_path) = path {
            Self::load_from_file(config_path)
        } else {
            Self::load_default()
        }
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| CliError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load from the standard location, or fall back to built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Some(config_path) = Self::default_path() {
            if config_path.exists() {
                return Self::load_from_file(&config_path);
            }
        }

        Ok(Config::default())
    }

    /// `~/.openrouter-cli/config.toml`, when a home directory is known
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".openrouter-cli").join("config.toml"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(CliError::Config("api.base_url must not be empty".to_string()));
        }

        if self.api.api_key_env.trim().is_empty() {
            return Err(CliError::Config("api.api_key_env must not be empty".to_string()));
        }

        if self.chat.default_model.trim().is_empty() {
            return Err(CliError::Config(
                "chat.default_model must not be empty".to_string(),
            ));
        }

        if self.chat.history_file.as_os_str().is_empty() {
            return Err(CliError::Config(
                "chat.history_file must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Endpoint URL for a path below the API root
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.api.connect_timeout_secs)
    }
}

/// Bearer token, resolved once at startup
#[derive(Clone, Default)]
pub struct ApiCredentials {
    token: String,
}

impl ApiCredentials {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }

    /// Read the token from the configured environment variable.
    ///
    /// A missing variable is not an error: the request goes out with an empty
    /// bearer token and the API rejects it.
    pub fn from_env(config: &Config) -> Self {
        let token = std::env::var(&config.api.api_key_env).unwrap_or_default();
        if token.is_empty() {
            tracing::debug!(var = %config.api.api_key_env, "API key not set");
        }
        Self { token }
    }

    pub fn authorization(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl std::fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("token", &if self.token.is_empty() { "<unset>" } else { "<redacted>" })
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.chat.default_model, "qwen/qwen3-14b:free");
        assert_eq!(config.chat.history_file, PathBuf::from("history.jsonl"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_endpoint_joins_slashes() {
        let mut config = Config::default();
        assert_eq!(
            config.endpoint("chat/completions"),
            "https://openrouter.ai/api/v1/chat/completions"
        );

        config.api.base_url = "http://127.0.0.1:9000/api/v1/".to_string();
        assert_eq!(config.endpoint("/models"), "http://127.0.0.1:9000/api/v1/models");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[chat]\ndefault_model = \"meta/llama:free\"").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.chat.default_model, "meta/llama:free");
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.chat.history_file, PathBuf::from(DEFAULT_HISTORY_FILE));
    }

    #[test]
    fn test_config_validation_empty_base_url() {
        let mut config = Config::default();
        config.api.base_url = "  ".to_string();
        assert!(matches!(config.validate(), Err(CliError::Config(_))));
    }

    #[test]
    fn test_config_validation_empty_model() {
        let mut config = Config::default();
        config.chat.default_model = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api\nbase_url = ").unwrap();

        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = Config::load(Some(Path::new("/nonexistent/openrouter.toml"))).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_credentials_header() {
        assert_eq!(ApiCredentials::new("sk-1").authorization(), "Bearer sk-1");
        assert_eq!(ApiCredentials::default().authorization(), "Bearer ");
    }

    #[test]
    fn test_credentials_debug_redacts() {
        let debug = format!("{:?}", ApiCredentials::new("sk-secret"));
        assert!(!debug.contains("sk-secret"));
    }
}
