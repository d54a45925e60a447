//! # Moodjournal Core Library
//!
//! This library provides the core logic for a personal mood journal. It is
//! CLI-first: every operation is reachable from the `moodjournal` binary,
//! which is a thin shell over this crate.
//!
//! ## Architecture
//!
//! - **Storage**: a SQLite key-value table holding JSON documents, an
//!   app-owned photo directory, and TOML configuration
//! - **Repositories**: whole-list read-modify-write over entries, custom
//!   activities and goals (last write wins)
//! - **Streaks and insights**: pure functions over the entry list
//! - **Reminders**: goal reminder planning behind a notification service trait
//! - **Security**: PIN/biometric app lock as an explicit state object
//!
//! ## Key Components
//!
//! - [`Database`]: persisted document store
//! - [`EntryRepository`] / [`GoalRepository`]: CRUD over the documents
//! - [`compute_streak`]: consecutive-day positive-mood streak
//! - [`ReminderScheduler`]: goal reminders over a [`NotificationService`]
//! - [`SecurityGate`]: LOCKED/UNLOCKED session state
//! - [`Config`]: application configuration management

pub mod catalog;
pub mod error;
pub mod goals;
pub mod insights;
pub mod journal;
pub mod notifications;
pub mod security;
pub mod storage;
pub mod streak;
pub mod summary;
pub mod timestamp;

pub use catalog::{Mood, MoodCategory};
pub use error::{
    ConfigError, CoreError, NotificationError, StorageError, SummaryError, ValidationError,
};
pub use goals::{Goal, GoalCategory, GoalRepository, ReminderTime};
pub use journal::{CustomActivity, EntryRepository, JournalEntry, Location, MoodData};
pub use notifications::{
    KvNotificationQueue, NotificationRequest, NotificationService, ReminderScheduler, Trigger,
};
pub use security::{
    BiometricAuthenticator, LockState, NoBiometric, SecurityGate, SecuritySettings, SecurityStore,
};
pub use storage::{Config, Database, PhotoStore};
pub use streak::{compute_streak, Streak};
pub use summary::{SummaryClient, SummaryProvider};
