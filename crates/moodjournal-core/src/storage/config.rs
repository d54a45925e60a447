//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Photo and database locations
//! - Reminder defaults (daily reminder time, inactivity threshold)
//! - Insight limits
//! - Summary provider settings
//!
//! Configuration is stored at `~/.config/moodjournal/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;

/// Storage locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Database file override. Defaults to `<data_dir>/moodjournal.db`.
    #[serde(default)]
    pub database_path: Option<String>,
    /// Photo directory override. Defaults to `<data_dir>/journal_photos`.
    #[serde(default)]
    pub photos_dir: Option<String>,
}

/// Goal reminder defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemindersConfig {
    #[serde(default = "default_reminder_hour")]
    pub default_hour: u8,
    #[serde(default)]
    pub default_minute: u8,
    /// Days without a goal update before a "resume" reminder fires.
    #[serde(default = "default_inactivity_days")]
    pub inactivity_days: i64,
}

/// Insight screen settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightsConfig {
    #[serde(default = "default_top_activities")]
    pub top_activities: usize,
}

/// Text-generation provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// "openai" or "huggingface".
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_openai_url")]
    pub openai_base_url: String,
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    #[serde(default = "default_huggingface_url")]
    pub huggingface_base_url: String,
    #[serde(default = "default_huggingface_model")]
    pub huggingface_model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Number of most recent entries included in the prompt.
    #[serde(default = "default_prompt_entries")]
    pub prompt_entries: usize,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/moodjournal/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub reminders: RemindersConfig,
    #[serde(default)]
    pub insights: InsightsConfig,
    #[serde(default)]
    pub summary: SummaryConfig,
}

// Default functions
fn default_reminder_hour() -> u8 {
    10
}
fn default_inactivity_days() -> i64 {
    3
}
fn default_top_activities() -> usize {
    5
}
fn default_provider() -> String {
    "openai".into()
}
fn default_openai_url() -> String {
    "https://api.openai.com".into()
}
fn default_openai_model() -> String {
    "gpt-3.5-turbo".into()
}
fn default_huggingface_url() -> String {
    "https://api-inference.huggingface.co".into()
}
fn default_huggingface_model() -> String {
    "mistralai/Mixtral-8x7B-Instruct-v0.1".into()
}
fn default_max_tokens() -> u32 {
    300
}
fn default_temperature() -> f64 {
    0.7
}
fn default_prompt_entries() -> usize {
    14
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            photos_dir: None,
        }
    }
}

impl Default for RemindersConfig {
    fn default() -> Self {
        Self {
            default_hour: default_reminder_hour(),
            default_minute: 0,
            inactivity_days: default_inactivity_days(),
        }
    }
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            top_activities: default_top_activities(),
        }
    }
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            openai_base_url: default_openai_url(),
            openai_model: default_openai_model(),
            huggingface_base_url: default_huggingface_url(),
            huggingface_model: default_huggingface_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            prompt_entries: default_prompt_entries(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    // Optional paths serialize as null until set.
                    serde_json::Value::Null => serde_json::Value::String(value.into()),
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    serde_json::Value::String(_) => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save()?;
                tracing::info!(path = %path.display(), "wrote default configuration");
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
        }
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "using default configuration");
            Self::default()
        })
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without persisting it.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit
    /// the field's type.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Set a config value by key and save. Returns error if key is unknown.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.apply(key, value)?;
        self.save()
    }

    /// Resolved database path.
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.storage.database_path {
            Some(p) => Ok(PathBuf::from(p)),
            None => Ok(data_dir()?.join("moodjournal.db")),
        }
    }

    /// Resolved photo directory.
    pub fn photos_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.storage.photos_dir {
            Some(p) => Ok(PathBuf::from(p)),
            None => Ok(data_dir()?.join("journal_photos")),
        }
    }
}
