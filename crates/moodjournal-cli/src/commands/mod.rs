pub mod activity;
pub mod config;
pub mod entry;
pub mod goal;
pub mod insights;
pub mod reminders;
pub mod security;
pub mod streak;
pub mod summary;
