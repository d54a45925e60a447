//! Core error types for moodjournal-core.
//!
//! Storage reads that fail are logged and degrade to empty results inside
//! the repositories, so most of these variants only surface from explicit
//! write paths.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for moodjournal-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Persisted store errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Rejected input
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Notification service errors
    #[error("Notification error: {0}")]
    Notification(#[from] NotificationError),

    /// Summary provider errors
    #[error("Summary error: {0}")]
    Summary(#[from] SummaryError),

    /// IO errors (photo copies, directories)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Key-value store errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the database file
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked by another process
    #[error("Database is locked")]
    Locked,

    /// A stored document could not be decoded
    #[error("Stored document '{key}' is corrupt: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Could not determine or create the data directory
    #[error("Data directory unavailable: {0}")]
    DataDir(String),

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Validation errors.
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    /// An entry carries neither a legacy mood nor a mood list
    #[error("Entry has no mood")]
    MissingMood,

    /// More than three moods on one entry
    #[error("Too many moods: {count} (at most {max})")]
    TooManyMoods { count: usize, max: usize },

    /// Mood intensity outside 1..=5
    #[error("Intensity {intensity} for '{mood}' is outside 1..=5")]
    IntensityOutOfRange { mood: String, intensity: u8 },

    /// Reminder hour/minute out of range
    #[error("Invalid reminder time {hour:02}:{minute:02}")]
    InvalidReminderTime { hour: u8, minute: u8 },

    /// Unparseable date or date-time
    #[error("Invalid date '{0}'")]
    InvalidDate(String),

    /// Unknown enumeration value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Notification service errors.
#[derive(Error, Debug)]
pub enum NotificationError {
    /// The service refused or failed to schedule a request
    #[error("Failed to schedule '{identifier}': {message}")]
    ScheduleFailed { identifier: String, message: String },

    /// The service failed to cancel a request
    #[error("Failed to cancel '{identifier}': {message}")]
    CancelFailed { identifier: String, message: String },

    /// Scheduled requests could not be listed
    #[error("Failed to query scheduled notifications: {0}")]
    QueryFailed(String),
}

/// Text-generation provider errors.
#[derive(Error, Debug)]
pub enum SummaryError {
    /// No API key in the keyring or environment
    #[error("No API key configured for {provider}")]
    MissingApiKey { provider: String },

    /// Transport failure
    #[error("Request to {provider} failed: {source}")]
    Http {
        provider: String,
        #[source]
        source: reqwest::Error,
    },

    /// Response body was not JSON
    #[error("Failed to parse {provider} response: {message}")]
    InvalidResponse { provider: String, message: String },

    /// Non-success status
    #[error("{provider} error: {message}")]
    Api { provider: String, message: String },

    /// Successful response without generated text
    #[error("{provider} error: No summary returned.")]
    Empty { provider: String },
}

// Helper implementations for converting from other error types

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked
                    || e.code == rusqlite::ErrorCode::DatabaseBusy
                {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Storage(StorageError::from(err))
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_are_readable() {
        let err = ValidationError::TooManyMoods { count: 4, max: 3 };
        assert_eq!(err.to_string(), "Too many moods: 4 (at most 3)");

        let err = ValidationError::InvalidReminderTime { hour: 7, minute: 5 };
        assert_eq!(err.to_string(), "Invalid reminder time 07:05");
    }

    #[test]
    fn core_error_wraps_storage() {
        let err: CoreError = StorageError::Locked.into();
        assert_eq!(err.to_string(), "Storage error: Database is locked");
    }

    #[test]
    fn non_sqlite_failures_become_query_failed() {
        let err = StorageError::from(rusqlite::Error::QueryReturnedNoRows);
        assert!(matches!(err, StorageError::QueryFailed(_)));
    }
}
