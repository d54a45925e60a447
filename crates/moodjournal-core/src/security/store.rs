//! Security settings, PIN and last-unlock timestamp in the store.

use chrono::{DateTime, Utc};

use super::pin::{hash_pin, is_digest, verify_digest, MIN_PIN_LENGTH};
use super::SecuritySettings;
use crate::error::{CoreError, ValidationError};
use crate::storage::{keys, Database};

pub struct SecurityStore<'a> {
    db: &'a Database,
}

impl<'a> SecurityStore<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Current settings; read failures yield the disabled default.
    pub fn settings(&self) -> SecuritySettings {
        match self.db.load_json(keys::SECURITY_SETTINGS) {
            Ok(Some(settings)) => settings,
            Ok(None) => SecuritySettings::default(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read security settings; using defaults");
                SecuritySettings::default()
            }
        }
    }

    pub fn save_settings(&self, settings: &SecuritySettings) -> Result<(), CoreError> {
        self.db.store_json(keys::SECURITY_SETTINGS, settings)
    }

    /// Store a digest of `pin`, replacing any previous PIN.
    pub fn set_pin(&self, pin: &str) -> Result<(), CoreError> {
        if pin.chars().count() < MIN_PIN_LENGTH {
            return Err(ValidationError::InvalidValue {
                field: "pin".into(),
                message: format!("PIN must be at least {MIN_PIN_LENGTH} digits long"),
            }
            .into());
        }
        self.db.kv_set(keys::APP_PIN, &hash_pin(pin)?)?;
        Ok(())
    }

    pub fn has_pin(&self) -> bool {
        matches!(self.db.kv_get(keys::APP_PIN), Ok(Some(_)))
    }

    /// Check `pin` against the stored value.
    ///
    /// A plaintext value left by an older client is compared directly and,
    /// on a match, replaced by a digest. Read failures count as a mismatch.
    pub fn verify_pin(&self, pin: &str) -> bool {
        let stored = match self.db.kv_get(keys::APP_PIN) {
            Ok(Some(stored)) => stored,
            Ok(None) => return false,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read PIN");
                return false;
            }
        };

        if is_digest(&stored) {
            return verify_digest(&stored, pin);
        }
        if stored != pin {
            return false;
        }
        let upgraded = hash_pin(pin)
            .and_then(|digest| self.db.kv_set(keys::APP_PIN, &digest).map_err(CoreError::from));
        match upgraded {
            Ok(()) => tracing::info!("upgraded stored PIN to a salted digest"),
            Err(e) => tracing::warn!(error = %e, "failed to upgrade stored PIN"),
        }
        true
    }

    /// Set a PIN and turn on PIN locking.
    pub fn enable_pin(&self, pin: &str) -> Result<SecuritySettings, CoreError> {
        self.set_pin(pin)?;
        let mut settings = self.settings();
        settings.use_pin = true;
        settings.is_enabled = true;
        self.save_settings(&settings)?;
        Ok(settings)
    }

    /// Turn off PIN locking. The lock as a whole is disabled unless
    /// biometrics remain on.
    pub fn disable_pin(&self) -> Result<SecuritySettings, CoreError> {
        let mut settings = self.settings();
        settings.use_pin = false;
        if !settings.use_biometric {
            settings.is_enabled = false;
        }
        self.save_settings(&settings)?;
        Ok(settings)
    }

    pub fn set_lock_timeout(&self, minutes: u32) -> Result<SecuritySettings, CoreError> {
        let mut settings = self.settings();
        settings.lock_timeout = minutes;
        self.save_settings(&settings)?;
        Ok(settings)
    }

    /// Last successful unlock in epoch milliseconds.
    pub fn last_unlock(&self) -> Option<i64> {
        match self.db.kv_get(keys::APP_LOCK_TIMESTAMP) {
            Ok(Some(raw)) => raw.trim().parse().ok(),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read unlock timestamp");
                None
            }
        }
    }

    /// Record an unlock. Failures are logged; the unlock still counts.
    pub fn record_unlock(&self, at: DateTime<Utc>) {
        let stamp = at.timestamp_millis().to_string();
        if let Err(e) = self.db.kv_set(keys::APP_LOCK_TIMESTAMP, &stamp) {
            tracing::error!(error = %e, "failed to record unlock time");
        }
    }

    /// Forget the last unlock so the next start is locked.
    pub fn clear_last_unlock(&self) -> Result<(), CoreError> {
        self.db.kv_delete(keys::APP_LOCK_TIMESTAMP)?;
        Ok(())
    }

    /// Whether a start at `now` must authenticate.
    ///
    /// Disabled locks never do. Enabled locks do when there is no unlock
    /// on record or the timeout has elapsed. A timestamp that cannot be
    /// read or parsed does not require authentication.
    pub fn should_require_auth(&self, now: DateTime<Utc>) -> bool {
        let settings = self.settings();
        if !settings.is_enabled {
            return false;
        }
        let raw = match self.db.kv_get(keys::APP_LOCK_TIMESTAMP) {
            Ok(Some(raw)) => raw,
            Ok(None) => return true,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read unlock timestamp");
                return false;
            }
        };
        let Ok(last) = raw.trim().parse::<i64>() else {
            tracing::warn!(value = %raw, "unparseable unlock timestamp");
            return false;
        };
        let elapsed = now.timestamp_millis() - last;
        elapsed >= i64::from(settings.lock_timeout) * 60 * 1000
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn enabled(timeout: u32) -> SecuritySettings {
        SecuritySettings {
            is_enabled: true,
            use_biometric: false,
            use_pin: true,
            lock_timeout: timeout,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn missing_or_corrupt_settings_read_disabled() {
        let db = Database::open_memory().unwrap();
        let store = SecurityStore::new(&db);
        assert_eq!(store.settings(), SecuritySettings::default());

        db.kv_set(keys::SECURITY_SETTINGS, "{oops").unwrap();
        assert_eq!(store.settings(), SecuritySettings::default());
    }

    #[test]
    fn disabled_never_requires_auth() {
        let db = Database::open_memory().unwrap();
        let store = SecurityStore::new(&db);
        assert!(!store.should_require_auth(now()));
        store.record_unlock(now() - Duration::days(365));
        assert!(!store.should_require_auth(now()));
    }

    #[test]
    fn enabled_without_unlock_requires_auth() {
        let db = Database::open_memory().unwrap();
        let store = SecurityStore::new(&db);
        store.save_settings(&enabled(5)).unwrap();
        assert!(store.should_require_auth(now()));
    }

    #[test]
    fn timeout_window() {
        let db = Database::open_memory().unwrap();
        let store = SecurityStore::new(&db);
        store.save_settings(&enabled(5)).unwrap();

        store.record_unlock(now() - Duration::minutes(4));
        assert!(!store.should_require_auth(now()));
        store.record_unlock(now() - Duration::minutes(5));
        assert!(store.should_require_auth(now()));

        store.save_settings(&enabled(0)).unwrap();
        store.record_unlock(now());
        assert!(store.should_require_auth(now()));
    }

    #[test]
    fn clear_last_unlock_relocks() {
        let db = Database::open_memory().unwrap();
        let store = SecurityStore::new(&db);
        store.save_settings(&enabled(60)).unwrap();
        store.record_unlock(now());
        assert!(!store.should_require_auth(now()));
        store.clear_last_unlock().unwrap();
        assert!(store.last_unlock().is_none());
        assert!(store.should_require_auth(now()));
    }

    #[test]
    fn pin_is_stored_hashed() {
        let db = Database::open_memory().unwrap();
        let store = SecurityStore::new(&db);
        store.set_pin("2468").unwrap();

        let raw = db.kv_get(keys::APP_PIN).unwrap().unwrap();
        assert!(!raw.contains("2468"));
        assert!(store.verify_pin("2468"));
        assert!(!store.verify_pin("1357"));
    }

    #[test]
    fn short_pin_is_rejected() {
        let db = Database::open_memory().unwrap();
        let store = SecurityStore::new(&db);
        assert!(matches!(
            store.set_pin("12"),
            Err(CoreError::Validation(ValidationError::InvalidValue { .. }))
        ));
        assert!(!store.has_pin());
    }

    #[test]
    fn legacy_plaintext_pin_is_upgraded() {
        let db = Database::open_memory().unwrap();
        db.kv_set(keys::APP_PIN, "1234").unwrap();
        let store = SecurityStore::new(&db);

        assert!(!store.verify_pin("0000"));
        assert_eq!(db.kv_get(keys::APP_PIN).unwrap().as_deref(), Some("1234"));

        assert!(store.verify_pin("1234"));
        let raw = db.kv_get(keys::APP_PIN).unwrap().unwrap();
        assert!(raw.starts_with("sha256$"));
        assert!(store.verify_pin("1234"));
    }

    #[test]
    fn disabling_pin_keeps_lock_when_biometric_on() {
        let db = Database::open_memory().unwrap();
        let store = SecurityStore::new(&db);
        store.enable_pin("1234").unwrap();

        let mut settings = store.settings();
        settings.use_biometric = true;
        store.save_settings(&settings).unwrap();
        assert!(store.disable_pin().unwrap().is_enabled);

        settings.use_biometric = false;
        settings.use_pin = true;
        store.save_settings(&settings).unwrap();
        assert!(!store.disable_pin().unwrap().is_enabled);
    }
}
