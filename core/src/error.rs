//! Error types for cinder-core.
//!
//! The enumeration is closed on purpose: callers match on kinds, not on
//! message strings, and user-facing layers collapse all decryption-side
//! failures into one generic message.

/// Result type alias for cinder-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while framing, encrypting, or decrypting a message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// An envelope field is not valid base64 or decodes to the wrong length.
    ///
    /// Raised during structural validation, before any cipher operation runs.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(&'static str),

    /// The authentication tag did not verify.
    ///
    /// Wrong password, corrupted ciphertext, and tampering all land here.
    /// The variant is intentionally uninformative: distinguishing the exact
    /// cause would hand an oracle to an attacker.
    #[error("authentication failed")]
    AuthenticationFailure,

    /// Decrypted bytes are not valid UTF-8.
    #[error("decrypted payload is not valid UTF-8")]
    InvalidEncoding,

    /// The system's secure random source failed.
    #[error("secure random source unavailable")]
    Rng,
}
