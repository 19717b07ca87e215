//! Cinder Core - cryptographic envelope scheme for one-time messages.
//!
//! This library is the half of Cinder that runs on the sender's and the
//! recipient's own devices:
//! - Password-based key derivation (PBKDF2-HMAC-SHA256, 10 000 iterations)
//! - Authenticated encryption (AES-256-GCM, 96-bit IV, appended tag)
//! - Base64 envelope framing of (ciphertext, iv, salt)
//!
//! # Security Properties
//!
//! - The password never reaches the server: it travels only in the URL
//!   fragment, which conforming clients do not transmit
//! - Salt and iv are freshly random per encryption; a (key, iv) pair cannot
//!   repeat by construction
//! - Decryption is all-or-nothing: any failure aborts with no partial
//!   plaintext, and the failure cause is not distinguished to callers
//! - Derived keys exist only in locally-scoped buffers and are wiped
//!
//! # Constraints
//!
//! This library intentionally does NOT:
//! - Access the network
//! - Perform file I/O
//! - Store data persistently
//! - Log anything
//!
//! # Example: sender to recipient
//!
//! ```
//! use cinder_core::{decrypt, encrypt, Envelope};
//!
//! // Sender side: encrypt locally, submit only the envelope text.
//! let envelope = encrypt("meet me at the fountain", "jade-otter-42").unwrap();
//! let stored_text = envelope.to_json();
//!
//! // The password rides the URL fragment: <origin>/<identifier>#jade-otter-42
//!
//! // Recipient side: fetch the text, decrypt locally.
//! let fetched = Envelope::from_json(&stored_text).unwrap();
//! let plaintext = decrypt(&fetched, "jade-otter-42").unwrap();
//! assert_eq!(plaintext, "meet me at the fountain");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cipher;
pub mod envelope;
pub mod error;
pub mod kdf;
pub mod protocol;

pub use envelope::Envelope;
pub use error::{Error, Result};
pub use protocol::{decrypt, encrypt};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
