//! Configuration loading and validation for FreightDesk.
//!
//! Loads configuration from `~/.freightdesk/config.toml` with environment
//! variable overrides. The one required value is the completion-service
//! credential; everything else has sensible defaults taken from the
//! reference deployment.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.freightdesk/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Completion-service API key. Usually supplied via `GROQ_API_KEY`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Chat-completions endpoint base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Default model
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Default temperature
    #[serde(default = "default_temperature")]
    pub default_temperature: f32,

    /// Default max tokens per completion
    #[serde(default = "default_max_tokens")]
    pub default_max_tokens: u32,

    /// Default nucleus-sampling parameter
    #[serde(default = "default_top_p")]
    pub default_top_p: f32,

    /// Where conversation transcripts are written
    #[serde(default = "default_history_dir")]
    pub history_dir: PathBuf,

    /// Maximum accepted upload size for tabular files, in megabytes
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: u64,

    /// Sample size for text-column digests
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,
}

fn default_base_url() -> String {
    "https://api.groq.com/openai/v1".into()
}
fn default_model() -> String {
    "llama3-70b-8192".into()
}
fn default_temperature() -> f32 {
    0.3
}
fn default_max_tokens() -> u32 {
    4000
}
fn default_top_p() -> f32 {
    0.9
}
fn default_history_dir() -> PathBuf {
    AppConfig::config_dir().join("history")
}
fn default_max_file_size_mb() -> u64 {
    10
}
fn default_sample_size() -> usize {
    3
}

/// Redact the credential in Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .field("default_model", &self.default_model)
            .field("default_temperature", &self.default_temperature)
            .field("default_max_tokens", &self.default_max_tokens)
            .field("default_top_p", &self.default_top_p)
            .field("history_dir", &self.history_dir)
            .field("max_file_size_mb", &self.max_file_size_mb)
            .field("sample_size", &self.sample_size)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.freightdesk/config.toml).
    ///
    /// Environment variables take priority over the file:
    /// - `GROQ_API_KEY` / `FREIGHTDESK_API_KEY` — the credential
    /// - `FREIGHTDESK_MODEL` — the default model
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        if let Ok(key) = std::env::var("GROQ_API_KEY") {
            config.api_key = Some(key);
        } else if let Ok(key) = std::env::var("FREIGHTDESK_API_KEY") {
            config.api_key = Some(key);
        }

        if let Ok(model) = std::env::var("FREIGHTDESK_MODEL") {
            config.default_model = model;
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".freightdesk")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_temperature < 0.0 || self.default_temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "default_temperature must be between 0.0 and 2.0".into(),
            ));
        }
        if self.default_top_p <= 0.0 || self.default_top_p > 1.0 {
            return Err(ConfigError::ValidationError(
                "default_top_p must be in (0.0, 1.0]".into(),
            ));
        }
        if self.sample_size == 0 {
            return Err(ConfigError::ValidationError(
                "sample_size must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Check if the credential is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    /// The credential, or the classified configuration error the relay must
    /// fail fast with before attempting any remote call.
    pub fn require_api_key(&self) -> Result<&str, freightdesk_core::Error> {
        match self.api_key.as_deref() {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(freightdesk_core::Error::Config {
                message: "GROQ_API_KEY not found in environment variables".into(),
            }),
        }
    }

    /// Generate a default config TOML string (for first-run setup).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            default_model: default_model(),
            default_temperature: default_temperature(),
            default_max_tokens: default_max_tokens(),
            default_top_p: default_top_p(),
            history_dir: default_history_dir(),
            max_file_size_mb: default_max_file_size_mb(),
            sample_size: default_sample_size(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}
