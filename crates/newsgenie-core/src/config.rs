use crate::ai::DEFAULT_MODEL;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const GNEWS_API_KEY: &str = "GNEWS_API_KEY";
pub const SERPER_API_KEY: &str = "SERPER_API_KEY";
pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const GEMINI_MODEL: &str = "GEMINI_MODEL";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub gnews_api_key: Option<String>,
    pub serper_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub model: Option<String>,
}

/// Keys for the two search backends, both required at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceKeys {
    pub gnews_api_key: String,
    pub serper_api_key: String,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(path, config_content)?;
        Ok(())
    }

    pub fn save_gemini_api_key(key: &str) -> Result<(), ConfigError> {
        Self::save_gemini_api_key_to(&Self::get_config_path()?, key)
    }

    /// Stores the key alongside the other settings. An unreadable file is
    /// left as it is so the stored service keys survive.
    pub fn save_gemini_api_key_to(path: &Path, key: &str) -> Result<(), ConfigError> {
        let mut config = Self::load_from(path).map_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "not overwriting unreadable config file");
            e
        })?;
        config.gemini_api_key = Some(key.to_string());
        config.save_to(path)
    }

    pub fn get_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("newsgenie").join("config.json"))
    }

    /// News and search keys from the process environment, then this config.
    pub fn service_keys(&self) -> Result<ServiceKeys, ConfigError> {
        self.service_keys_with(|name| std::env::var(name).ok())
    }

    pub fn service_keys_with(
        &self,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<ServiceKeys, ConfigError> {
        let gnews = pick(env(GNEWS_API_KEY), &self.gnews_api_key);
        let serper = pick(env(SERPER_API_KEY), &self.serper_api_key);

        match (gnews, serper) {
            (Some(gnews_api_key), Some(serper_api_key)) => Ok(ServiceKeys {
                gnews_api_key,
                serper_api_key,
            }),
            (gnews, serper) => {
                let mut missing = Vec::new();
                if gnews.is_none() {
                    missing.push(GNEWS_API_KEY);
                }
                if serper.is_none() {
                    missing.push(SERPER_API_KEY);
                }
                Err(ConfigError::MissingCredentials(missing))
            }
        }
    }

    pub fn gemini_api_key(&self) -> Option<String> {
        self.gemini_api_key_with(|name| std::env::var(name).ok())
    }

    pub fn gemini_api_key_with(&self, env: impl Fn(&str) -> Option<String>) -> Option<String> {
        pick(env(GEMINI_API_KEY), &self.gemini_api_key)
    }

    pub fn model(&self) -> String {
        self.model_with(|name| std::env::var(name).ok())
    }

    pub fn model_with(&self, env: impl Fn(&str) -> Option<String>) -> String {
        pick(env(GEMINI_MODEL), &self.model).unwrap_or_else(|| DEFAULT_MODEL.to_string())
    }
}

/// First non-blank value, environment before config.
fn pick(env_value: Option<String>, config_value: &Option<String>) -> Option<String> {
    env_value
        .into_iter()
        .chain(config_value.iter().cloned())
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}
