//! Authenticated encryption with AES-256-GCM.
//!
//! A 96-bit IV and a derived 256-bit key seal one message; the 16-byte tag
//! is appended to the ciphertext. No associated data is used. Tag
//! verification failure never yields partial plaintext.

use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM};

use crate::error::{Error, Result};
use crate::kdf::KEY_LEN;

/// IV length in bytes (96-bit GCM nonce).
pub const IV_LEN: usize = 12;

/// GCM authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// Encrypt `plaintext` under `key` and `iv`, appending the tag.
///
/// The caller must never reuse an (key, iv) pair; the protocol layer draws a
/// fresh iv for every call.
pub fn seal(plaintext: &[u8], key: &[u8; KEY_LEN], iv: &[u8; IV_LEN]) -> Vec<u8> {
    let Ok(unbound) = UnboundKey::new(&AES_256_GCM, key) else {
        unreachable!("AES-256-GCM accepts every 32-byte key");
    };
    let sealing_key = LessSafeKey::new(unbound);
    let nonce = Nonce::assume_unique_for_key(*iv);

    let mut in_out = plaintext.to_vec();
    let Ok(()) = sealing_key.seal_in_place_append_tag(nonce, Aad::empty(), &mut in_out) else {
        unreachable!("AES-256-GCM sealing cannot fail for in-memory buffers");
    };
    in_out
}

/// Decrypt `ciphertext_with_tag` under `key` and `iv`.
///
/// # Errors
///
/// `AuthenticationFailure` when the tag does not verify or the buffer is
/// structurally impossible (shorter than the tag). The cause is deliberately
/// not distinguished.
pub fn open(
    ciphertext_with_tag: &[u8],
    key: &[u8; KEY_LEN],
    iv: &[u8; IV_LEN],
) -> Result<Vec<u8>> {
    if ciphertext_with_tag.len() < TAG_LEN {
        return Err(Error::AuthenticationFailure);
    }

    let unbound = UnboundKey::new(&AES_256_GCM, key).map_err(|_| Error::AuthenticationFailure)?;
    let opening_key = LessSafeKey::new(unbound);
    let nonce = Nonce::assume_unique_for_key(*iv);

    let mut in_out = ciphertext_with_tag.to_vec();
    let plaintext = opening_key
        .open_in_place(nonce, Aad::empty(), &mut in_out)
        .map_err(|_| Error::AuthenticationFailure)?;

    Ok(plaintext.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: [u8; KEY_LEN] = [0x42; KEY_LEN];
    const IV: [u8; IV_LEN] = [0x24; IV_LEN];

    #[test]
    fn seal_open_roundtrip() {
        let sealed = seal(b"attack at dawn", &KEY, &IV);
        let opened = open(&sealed, &KEY, &IV).unwrap();
        assert_eq!(opened, b"attack at dawn");
    }

    #[test]
    fn sealed_length_is_plaintext_plus_tag() {
        let sealed = seal(b"xyz", &KEY, &IV);
        assert_eq!(sealed.len(), 3 + TAG_LEN);
    }

    #[test]
    fn empty_plaintext_roundtrip() {
        let sealed = seal(b"", &KEY, &IV);
        assert_eq!(sealed.len(), TAG_LEN);
        assert_eq!(open(&sealed, &KEY, &IV).unwrap(), b"");
    }

    #[test]
    fn wrong_key_rejected() {
        let sealed = seal(b"attack at dawn", &KEY, &IV);
        let wrong = [0x43; KEY_LEN];
        assert_eq!(
            open(&sealed, &wrong, &IV),
            Err(Error::AuthenticationFailure)
        );
    }

    #[test]
    fn wrong_iv_rejected() {
        let sealed = seal(b"attack at dawn", &KEY, &IV);
        let wrong = [0x25; IV_LEN];
        assert_eq!(
            open(&sealed, &KEY, &wrong),
            Err(Error::AuthenticationFailure)
        );
    }

    #[test]
    fn every_flipped_bit_rejected() {
        let sealed = seal(b"short", &KEY, &IV);
        for byte in 0..sealed.len() {
            let mut tampered = sealed.clone();
            tampered[byte] ^= 0x01;
            assert_eq!(
                open(&tampered, &KEY, &IV),
                Err(Error::AuthenticationFailure),
                "flip in byte {} went undetected",
                byte
            );
        }
    }

    #[test]
    fn too_short_buffer_rejected() {
        assert_eq!(
            open(&[0u8; TAG_LEN - 1], &KEY, &IV),
            Err(Error::AuthenticationFailure)
        );
    }
}
