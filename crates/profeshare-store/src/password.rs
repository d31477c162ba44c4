//! Password hashing with PBKDF2-HMAC-SHA256 (ring).
//!
//! Stored form: `base64(salt):base64(hash)`.

use std::num::NonZeroU32;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};

use crate::error::{StoreError, StoreResult};

/// OWASP 2023 recommendation for PBKDF2-HMAC-SHA256.
const ITERATIONS: NonZeroU32 = NonZeroU32::new(600_000).unwrap();

const SALT_LEN: usize = 32;
const KEY_LEN: usize = 32;

static ALGORITHM: pbkdf2::Algorithm = pbkdf2::PBKDF2_HMAC_SHA256;

/// Hash `password` with a fresh random salt.
pub(crate) fn hash(password: &str) -> StoreResult<String> {
    let mut salt = [0u8; SALT_LEN];
    SystemRandom::new()
        .fill(&mut salt)
        .map_err(|_| StoreError::InvalidArgument("failed to generate random salt".into()))?;

    let mut derived = [0u8; KEY_LEN];
    pbkdf2::derive(ALGORITHM, ITERATIONS, &salt, password.as_bytes(), &mut derived);

    Ok(format!("{}:{}", BASE64.encode(salt), BASE64.encode(derived)))
}

/// Check `password` against a stored `salt:hash` string in constant time.
pub(crate) fn verify(password: &str, stored: &str) -> StoreResult<bool> {
    let (salt, expected) = stored
        .split_once(':')
        .ok_or_else(|| StoreError::InvalidArgument("malformed password hash".into()))?;

    let salt = BASE64
        .decode(salt)
        .map_err(|e| StoreError::InvalidArgument(format!("invalid salt encoding: {e}")))?;
    let expected = BASE64
        .decode(expected)
        .map_err(|e| StoreError::InvalidArgument(format!("invalid hash encoding: {e}")))?;

    Ok(pbkdf2::verify(ALGORITHM, ITERATIONS, &salt, password.as_bytes(), &expected).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_password_gets_distinct_salts() {
        let first = hash("hunter2").unwrap();
        let second = hash("hunter2").unwrap();
        assert_ne!(first, second);
        assert!(verify("hunter2", &first).unwrap());
        assert!(verify("hunter2", &second).unwrap());
    }

    #[test]
    fn wrong_password_is_rejected() {
        let stored = hash("correct horse").unwrap();
        assert!(!verify("battery staple", &stored).unwrap());
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(verify("pw", "no-separator").is_err());
        assert!(verify("pw", "!!!:???").is_err());
    }
}
