//! Salted PIN digests.
//!
//! Stored form: `sha256$<salt-hex>$<digest-hex>` where the digest covers
//! the salt bytes followed by the PIN.

use sha2::{Digest, Sha256};

use crate::error::CoreError;

pub const MIN_PIN_LENGTH: usize = 4;

const SCHEME: &str = "sha256";
const SALT_LEN: usize = 16;

fn digest(salt: &[u8], pin: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(pin.as_bytes());
    hex::encode(hasher.finalize())
}

/// Hash `pin` with a fresh random salt.
pub fn hash_pin(pin: &str) -> Result<String, CoreError> {
    let mut salt = [0u8; SALT_LEN];
    getrandom::getrandom(&mut salt)
        .map_err(|e| CoreError::Custom(format!("failed to generate PIN salt: {e}")))?;
    Ok(format!("{SCHEME}${}${}", hex::encode(salt), digest(&salt, pin)))
}

/// Whether `stored` is a digest produced by [`hash_pin`].
pub fn is_digest(stored: &str) -> bool {
    stored.starts_with("sha256$")
}

/// Check `pin` against a stored digest. Malformed digests never match.
pub fn verify_digest(stored: &str, pin: &str) -> bool {
    let mut parts = stored.splitn(3, '$');
    let (Some(SCHEME), Some(salt_hex), Some(expected)) = (parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    let Ok(salt) = hex::decode(salt_hex) else {
        return false;
    };
    let actual = digest(&salt, pin);
    // Compare every byte regardless of where the first mismatch is.
    actual.len() == expected.len()
        && actual
            .bytes()
            .zip(expected.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}
