//! Envelope framing: base64 text encoding of (ciphertext, iv, salt).
//!
//! The envelope is what actually travels: the sender submits its JSON text
//! to the server, the server stores it opaquely, and the recipient decodes
//! it locally. Structure is validated before any field reaches the cipher,
//! so malformed buffers never hit the platform crypto primitives.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::cipher::{IV_LEN, TAG_LEN};
use crate::error::{Error, Result};
use crate::kdf::SALT_LEN;

/// One encrypted message in transportable form.
///
/// Each field is independently standard-base64 encoded. The salt and iv are
/// server-visible by design; confidentiality rests entirely on the password
/// that never leaves the URL fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Base64 ciphertext with the 16-byte GCM tag appended.
    pub ciphertext: String,

    /// Base64 of the 12-byte IV.
    pub iv: String,

    /// Base64 of the 16-byte KDF salt.
    pub salt: String,
}

impl Envelope {
    /// Frame raw cipher output into an envelope.
    pub fn new(ciphertext: &[u8], iv: &[u8; IV_LEN], salt: &[u8; SALT_LEN]) -> Self {
        Self {
            ciphertext: STANDARD.encode(ciphertext),
            iv: STANDARD.encode(iv),
            salt: STANDARD.encode(salt),
        }
    }

    /// Decode all three fields back to bytes, validating lengths.
    ///
    /// # Errors
    ///
    /// `MalformedEnvelope` if any field is not valid base64, the iv is not
    /// 12 bytes, the salt is not 16 bytes, or the ciphertext is shorter
    /// than the authentication tag.
    pub fn decode(&self) -> Result<(Vec<u8>, [u8; IV_LEN], [u8; SALT_LEN])> {
        let ciphertext = STANDARD
            .decode(&self.ciphertext)
            .map_err(|_| Error::MalformedEnvelope("ciphertext is not valid base64"))?;
        if ciphertext.len() < TAG_LEN {
            return Err(Error::MalformedEnvelope(
                "ciphertext shorter than the authentication tag",
            ));
        }

        let iv: [u8; IV_LEN] = STANDARD
            .decode(&self.iv)
            .map_err(|_| Error::MalformedEnvelope("iv is not valid base64"))?
            .try_into()
            .map_err(|_| Error::MalformedEnvelope("iv must decode to 12 bytes"))?;

        let salt: [u8; SALT_LEN] = STANDARD
            .decode(&self.salt)
            .map_err(|_| Error::MalformedEnvelope("salt is not valid base64"))?
            .try_into()
            .map_err(|_| Error::MalformedEnvelope("salt must decode to 16 bytes"))?;

        Ok((ciphertext, iv, salt))
    }

    /// Serialize to the JSON text stored and transported by the server.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Parse an envelope from its JSON text.
    ///
    /// # Errors
    ///
    /// `MalformedEnvelope` if the text is not a valid envelope object.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|_| Error::MalformedEnvelope("invalid envelope JSON"))
    }
}
