//! WebAssembly bindings for the Cinder cryptographic core.
//!
//! This crate exposes the encryption protocol to JavaScript so the browser
//! runs exactly the same code path as any other client: encrypt before
//! submitting, decrypt after fetching. The password stays in the page and
//! the URL fragment; it is never part of any request.

use wasm_bindgen::prelude::*;

use cinder_core::Envelope;

/// Encrypt plaintext under a password.
///
/// # Arguments
/// * `plaintext` - Message text to protect
/// * `password` - Key carried out-of-band in the URL fragment
///
/// # Returns
/// Envelope JSON text, ready to submit as opaque content.
#[wasm_bindgen]
pub fn encrypt(plaintext: &str, password: &str) -> Result<String, JsError> {
    let envelope = cinder_core::encrypt(plaintext, password)
        .map_err(|e| JsError::new(&e.to_string()))?;
    Ok(envelope.to_json())
}

/// Decrypt fetched envelope text with a password.
///
/// Every failure - malformed envelope, wrong password, tampered
/// ciphertext, bad encoding - surfaces as the same generic error, so the
/// page cannot become a decryption oracle.
#[wasm_bindgen]
pub fn decrypt(envelope_json: &str, password: &str) -> Result<String, JsError> {
    let envelope =
        Envelope::from_json(envelope_json).map_err(|_| JsError::new("could not decrypt"))?;
    cinder_core::decrypt(&envelope, password).map_err(|_| JsError::new("could not decrypt"))
}

/// Build the share URL: `<origin>/<identifier>#<password>`.
///
/// The fragment is the only channel carrying the password; browsers do not
/// send it with requests.
#[wasm_bindgen]
pub fn secret_url(origin: &str, identifier: &str, password: &str) -> String {
    format!("{}/{}#{}", origin.trim_end_matches('/'), identifier, password)
}
