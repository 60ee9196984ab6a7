use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};

use crate::error::BridgeError;

/// Length of nonces produced by [`random_nonce`] when the caller has no preference.
pub const DEFAULT_NONCE_LENGTH: u32 = 32;

const NONCE_CHARSET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVXYZabcdefghijklmnopqrstuvwxyz-._";

/// Generates a random nonce of `length` characters from a URL-safe charset.
///
/// Randomness comes from the operating system. Each character is picked by
/// reducing a random byte modulo the charset size.
///
/// # Errors
/// Returns [`BridgeError::InvalidInput`] if `length` is zero.
#[uniffi::export]
pub fn random_nonce(length: u32) -> Result<String, BridgeError> {
    if length == 0 {
        return Err(BridgeError::InvalidInput {
            attribute: "length",
            reason: "must be greater than zero".to_string(),
        });
    }

    let mut bytes = vec![0u8; length as usize];
    OsRng.fill_bytes(&mut bytes);

    Ok(bytes
        .into_iter()
        .map(|byte| char::from(NONCE_CHARSET[usize::from(byte) % NONCE_CHARSET.len()]))
        .collect())
}

/// Hashes `content` with SHA-256 and returns the digest as upper-case hex.
///
/// This is the form in which a nonce goes into a sign-in request; the raw
/// nonce stays with the caller.
///
/// # Errors
/// Returns [`BridgeError::InvalidInput`] if `content` is empty.
#[uniffi::export]
pub fn sha256_hex(content: &str) -> Result<String, BridgeError> {
    if content.is_empty() {
        return Err(BridgeError::InvalidInput {
            attribute: "content",
            reason: "cannot be empty".to_string(),
        });
    }

    Ok(hex::encode_upper(Sha256::digest(content.as_bytes())))
}
