//! App lock: settings, PIN storage, biometric seam and the lock state
//! machine.

mod biometric;
mod gate;
mod pin;
mod store;

pub use biometric::{BiometricAuthenticator, BiometricPrompt, NoBiometric};
pub use gate::{LockState, SecurityGate};
pub use pin::{hash_pin, verify_digest, MIN_PIN_LENGTH};
pub use store::SecurityStore;

use serde::{Deserialize, Serialize};

/// Persisted lock settings. Missing or unreadable settings read as the
/// all-disabled default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecuritySettings {
    pub is_enabled: bool,
    pub use_biometric: bool,
    pub use_pin: bool,
    /// Minutes before the app locks again. 0 locks on every start.
    pub lock_timeout: u32,
}
