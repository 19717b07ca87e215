//! The encryption protocol a sender and recipient each run locally.
//!
//! `encrypt` and `decrypt` are stateless and independent per call: fresh
//! salt and iv are drawn from the OS secure random source on every
//! encryption, the key is derived, the cipher runs, and nothing but the
//! envelope survives the call. Derived keys are wiped before returning.

use ring::rand::{SecureRandom, SystemRandom};
use zeroize::Zeroize;

use crate::cipher::{self, IV_LEN};
use crate::envelope::Envelope;
use crate::error::{Error, Result};
use crate::kdf::{self, DEFAULT_ITERATIONS, SALT_LEN};

/// Encrypt `plaintext` under `password`, producing a transportable envelope.
///
/// Salt (16 bytes) and iv (12 bytes) are freshly random per call, so a
/// (key, iv) pair can never repeat by construction.
///
/// # Errors
///
/// `Rng` if the system random source fails.
pub fn encrypt(plaintext: &str, password: &str) -> Result<Envelope> {
    let rng = SystemRandom::new();

    let mut salt = [0u8; SALT_LEN];
    rng.fill(&mut salt).map_err(|_| Error::Rng)?;
    let mut iv = [0u8; IV_LEN];
    rng.fill(&mut iv).map_err(|_| Error::Rng)?;

    let mut key = kdf::derive(password, &salt, DEFAULT_ITERATIONS);
    let ciphertext = cipher::seal(plaintext.as_bytes(), &key, &iv);
    key.zeroize();

    Ok(Envelope::new(&ciphertext, &iv, &salt))
}

/// Decrypt an envelope with `password`, recovering the original text.
///
/// # Errors
///
/// `MalformedEnvelope` if the envelope fails structural validation,
/// `AuthenticationFailure` if the tag does not verify (wrong password,
/// corruption, tampering), `InvalidEncoding` if the plaintext is not UTF-8.
/// Any failure aborts the whole operation; no partial plaintext escapes.
pub fn decrypt(envelope: &Envelope, password: &str) -> Result<String> {
    let (ciphertext, iv, salt) = envelope.decode()?;

    let mut key = kdf::derive(password, &salt, DEFAULT_ITERATIONS);
    let opened = cipher::open(&ciphertext, &key, &iv);
    key.zeroize();

    String::from_utf8(opened?).map_err(|_| Error::InvalidEncoding)
}
