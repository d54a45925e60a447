mod config;
pub mod database;
pub mod photos;

pub use config::{Config, InsightsConfig, RemindersConfig, StorageConfig, SummaryConfig};
pub use database::Database;
pub use photos::PhotoStore;

use std::path::PathBuf;

use crate::error::ConfigError;

/// Store keys for the persisted documents.
pub mod keys {
    pub const ENTRIES: &str = "entries";
    pub const GOALS: &str = "goals";
    pub const CUSTOM_ACTIVITIES: &str = "custom_activities";
    pub const SECURITY_SETTINGS: &str = "security_settings";
    pub const APP_LOCK_TIMESTAMP: &str = "app_lock_timestamp";
    pub const APP_PIN: &str = "app_pin";
    pub const SCHEDULED_NOTIFICATIONS: &str = "scheduled_notifications";
}

/// Returns `~/.config/moodjournal[-dev]/` based on MOODJOURNAL_ENV.
///
/// Set MOODJOURNAL_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("MOODJOURNAL_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("moodjournal-dev")
    } else {
        base_dir.join("moodjournal")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
