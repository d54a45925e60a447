//! Shared per-invocation state: configuration, the store and the lock.

use moodjournal_core::{
    Config, Database, EntryRepository, GoalRepository, KvNotificationQueue, NoBiometric,
    PhotoStore, ReminderScheduler, ReminderTime, SecurityGate,
};

pub const PIN_ENV: &str = "MOODJOURNAL_PIN";

pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

pub struct AppContext {
    pub config: Config,
    pub db: Database,
}

impl AppContext {
    pub fn open() -> CliResult<Self> {
        let config = Config::load()?;
        let db = Database::open_at(&config.database_path()?)?;
        Ok(Self { config, db })
    }

    /// Open and fail unless the app lock is open.
    pub fn open_unlocked() -> CliResult<Self> {
        let ctx = Self::open()?;
        ctx.ensure_unlocked()?;
        Ok(ctx)
    }

    pub fn gate(&self) -> SecurityGate<'_, NoBiometric> {
        SecurityGate::start(&self.db, NoBiometric)
    }

    /// Fail unless the lock is open. A PIN in `MOODJOURNAL_PIN` gets one
    /// unlock attempt first.
    pub fn ensure_unlocked(&self) -> CliResult {
        let mut gate = self.gate();
        if !gate.is_locked() {
            return Ok(());
        }
        if let Ok(pin) = std::env::var(PIN_ENV) {
            if gate.unlock(Some(pin.trim())) {
                return Ok(());
            }
            return Err(format!("journal is locked; the PIN in {PIN_ENV} was rejected").into());
        }
        Err("journal is locked; run `moodjournal security unlock --pin <PIN>`".into())
    }

    pub fn entries(&self) -> CliResult<EntryRepository<'_>> {
        let photos = PhotoStore::new(self.config.photos_dir()?);
        Ok(EntryRepository::new(&self.db, photos))
    }

    pub fn goals(&self) -> GoalRepository<'_> {
        let reminders = &self.config.reminders;
        let default = ReminderTime::new(reminders.default_hour, reminders.default_minute)
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "invalid reminder default in config; using 10:00");
                ReminderTime::default()
            });
        GoalRepository::new(&self.db).with_default_reminder(default)
    }

    pub fn scheduler(&self) -> ReminderScheduler<KvNotificationQueue<'_>> {
        ReminderScheduler::new(KvNotificationQueue::new(&self.db))
            .with_inactivity_days(self.config.reminders.inactivity_days)
    }
}

/// Split a comma-separated list, dropping blanks.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
