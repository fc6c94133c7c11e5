//! Configuration loaded from TOML.
//!
//! Defaults are embedded via `include_str!`. The parsed `Settings` value
//! is handed to whoever needs it; there is no process-wide singleton, and
//! the cache directory is an explicit configuration value rather than a
//! fixed path.

use std::path::PathBuf;

use serde::Deserialize;

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub cache: CacheSettings,
    pub service: ServiceSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    /// Directory for cached responses. The default is namespaced so it
    /// never collides with caches written under a different historical
    /// naming scheme.
    #[serde(default = "default_cache_dir")]
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceSettings {
    pub base_url: String,
}

fn default_cache_dir() -> PathBuf {
    std::env::temp_dir().join("word-info-cache")
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let s: Settings = toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate(&s)?;
    Ok(s)
}

fn validate(s: &Settings) -> Result<(), SettingsError> {
    if !s.service.base_url.starts_with("http://") && !s.service.base_url.starts_with("https://") {
        return Err(SettingsError::InvalidValue {
            field: "service.base_url".to_string(),
            reason: "must be an http(s) URL".to_string(),
        });
    }
    if s.cache.dir.as_os_str().is_empty() {
        return Err(SettingsError::InvalidValue {
            field: "cache.dir".to_string(),
            reason: "must not be empty".to_string(),
        });
    }
    Ok(())
}

impl Default for Settings {
    fn default() -> Self {
        parse_settings_toml(DEFAULT_SETTINGS_TOML).expect("settings TOML must be valid")
    }
}
