//! Lock state machine.
//!
//! ```text
//!   start ──(enabled and timed out / never unlocked)──> LOCKED
//!   start ──(otherwise)─────────────────────────────> UNLOCKED
//!   LOCKED ──unlock(pin?) ok──> UNLOCKED
//!   UNLOCKED ──lock()──> LOCKED
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::biometric::{BiometricAuthenticator, BiometricPrompt};
use super::store::SecurityStore;
use crate::storage::Database;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LockState {
    Locked,
    Unlocked,
}

/// Session lock owned by the host and passed to whatever needs it.
pub struct SecurityGate<'a, B> {
    store: SecurityStore<'a>,
    biometric: B,
    prompt: BiometricPrompt,
    state: LockState,
}

impl<'a, B: BiometricAuthenticator> SecurityGate<'a, B> {
    /// Start the session, deciding the initial state from the stored
    /// settings and last unlock.
    pub fn start(db: &'a Database, biometric: B) -> Self {
        Self::start_at(db, biometric, Utc::now())
    }

    pub fn start_at(db: &'a Database, biometric: B, now: DateTime<Utc>) -> Self {
        let mut gate = Self {
            store: SecurityStore::new(db),
            biometric,
            prompt: BiometricPrompt::default(),
            state: LockState::Locked,
        };
        gate.check_auth_status_at(now);
        gate
    }

    pub fn with_prompt(mut self, prompt: BiometricPrompt) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn store(&self) -> &SecurityStore<'a> {
        &self.store
    }

    pub fn state(&self) -> LockState {
        self.state
    }

    pub fn is_locked(&self) -> bool {
        self.state == LockState::Locked
    }

    /// Re-evaluate the lock against the stored settings.
    pub fn check_auth_status_at(&mut self, now: DateTime<Utc>) -> LockState {
        self.state = if self.store.should_require_auth(now) {
            LockState::Locked
        } else {
            LockState::Unlocked
        };
        self.state
    }

    pub fn unlock(&mut self, pin: Option<&str>) -> bool {
        self.unlock_at(pin, Utc::now())
    }

    /// One unlock attempt.
    ///
    /// A disabled lock always opens. Otherwise biometrics are tried first
    /// when enabled and the hardware is available, then the PIN if one was supplied and PIN unlock is
    /// enabled. Success records the unlock time.
    pub fn unlock_at(&mut self, pin: Option<&str>, now: DateTime<Utc>) -> bool {
        let settings = self.store.settings();
        if !settings.is_enabled {
            self.state = LockState::Unlocked;
            return true;
        }

        let mut authenticated = false;
        if settings.use_biometric && self.biometric.is_available() {
            authenticated = self.biometric.authenticate(&self.prompt);
        }
        if !authenticated && settings.use_pin {
            if let Some(pin) = pin {
                authenticated = self.store.verify_pin(pin);
            }
        }

        if !authenticated {
            tracing::info!("unlock attempt failed");
            return false;
        }
        self.store.record_unlock(now);
        self.state = LockState::Unlocked;
        true
    }

    pub fn lock(&mut self) {
        self.state = LockState::Locked;
    }
}
