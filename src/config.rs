//! Configuration management.
//!
//! `AppConfig` is what can be written in the optional TOML file. It is
//! resolved once at startup into `Settings`, an immutable value that is
//! passed explicitly to the components that need it.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_CONTENT_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/{model}:generateContent?key={key}";
const DEFAULT_CHAT_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/openai/chat/completions";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    #[serde(default = "default_model")]
    pub default_model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// `{model}` and `{key}` are substituted per request
    #[serde(default = "default_content_endpoint")]
    pub content_endpoint: String,
    #[serde(default = "default_chat_endpoint")]
    pub chat_endpoint: String,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_content_endpoint() -> String {
    DEFAULT_CONTENT_ENDPOINT.to_string()
}

fn default_chat_endpoint() -> String {
    DEFAULT_CHAT_ENDPOINT.to_string()
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            default_model: default_model(),
            api_key: None,
            api_key_env: default_api_key_env(),
            content_endpoint: default_content_endpoint(),
            chat_endpoint: default_chat_endpoint(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Level used when RUST_LOG is not set
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

/// Read-only settings shared by the model client and the analyzer.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: String,
    pub default_model: String,
    pub content_endpoint: String,
    pub chat_endpoint: String,
}

impl AppConfig {
    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".gemini-pdf-analyzer").join("config.toml"))
    }

    /// Load from `explicit` if given, else from the default path if it
    /// exists, else defaults. Environment overrides are applied last.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match Self::config_path() {
                Ok(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            config.apply_model_override(&model);
        }

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn apply_model_override(&mut self, model: &str) {
        let model = model.trim();
        if !model.is_empty() {
            self.gemini.default_model = model.to_string();
        }
    }

    pub fn api_key(&self) -> Result<String> {
        if let Some(key) = &self.gemini.api_key {
            if !key.is_empty() {
                return Ok(key.clone());
            }
        }
        match std::env::var(&self.gemini.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => bail!(
                "{} environment variable is not set. Either:\n  \
                 1. export {}=your-key\n  \
                 2. Set api_key under [gemini] in {}",
                self.gemini.api_key_env,
                self.gemini.api_key_env,
                Self::config_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default()
            ),
        }
    }

    /// Freeze into `Settings`. Fails when no credential is available.
    pub fn settings(&self) -> Result<Settings> {
        Ok(Settings {
            api_key: self.api_key()?,
            default_model: self.gemini.default_model.clone(),
            content_endpoint: self.gemini.content_endpoint.clone(),
            chat_endpoint: self.gemini.chat_endpoint.clone(),
        })
    }
}

#[cfg(test)]
impl Settings {
    pub fn for_tests() -> Self {
        Self {
            api_key: "test-key".to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            content_endpoint: "https://gemini.test/models/{model}:generateContent?key={key}"
                .to_string(),
            chat_endpoint: "https://gemini.test/openai/chat/completions".to_string(),
        }
    }
}
