//! Password-based key derivation.
//!
//! PBKDF2-HMAC-SHA256 turns the low-entropy URL-fragment password plus a
//! random salt into a 256-bit AES key. Derivation is fully deterministic so
//! that any conforming implementation - this crate, the wasm build, or a
//! browser's WebCrypto - produces the identical key from identical inputs.

use std::num::NonZeroU32;

use ring::pbkdf2;

/// Derived key length in bytes (AES-256).
pub const KEY_LEN: usize = 32;

/// Salt length in bytes.
pub const SALT_LEN: usize = 16;

/// Default PBKDF2 iteration count.
pub const DEFAULT_ITERATIONS: NonZeroU32 = match NonZeroU32::new(10_000) {
    Some(n) => n,
    None => unreachable!(),
};

/// Derive a 256-bit key from a password and salt.
///
/// An empty password is accepted; admitting weak keys is a policy question
/// for callers, not for the derivation itself.
pub fn derive(password: &str, salt: &[u8; SALT_LEN], iterations: NonZeroU32) -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        iterations,
        salt,
        password.as_bytes(),
        &mut key,
    );
    key
}
