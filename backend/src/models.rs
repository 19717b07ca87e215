//! Data models for the Cinder backend.
//!
//! The server stores only opaque envelope text. No plaintext, no user
//! identity, no decryption material ever appears in these types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Fixed literal written over `content` when a message is consumed.
///
/// The exact bytes matter for interoperability: every implementation must
/// produce this string so stored data reads identically across them.
pub const CONSUMED_SENTINEL: &str = "0xDEADBEEF";

/// One stored message record.
///
/// `id` is the internal primary key and never leaves the server;
/// `identifier` is the short public token embedded in the share URL.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageRecord {
    /// Internal primary key, not exposed externally
    pub id: Uuid,

    /// Public URL-safe identifier ("stub")
    pub identifier: String,

    /// Serialized envelope text (opaque to the backend); replaced by
    /// [`CONSUMED_SENTINEL`] on consumption
    pub content: String,

    /// When the record was created
    pub created_at: DateTime<Utc>,

    /// Last mutation time
    pub updated_at: DateTime<Utc>,

    /// Set exactly once, at the consuming read; immutable afterwards
    pub read_at: Option<DateTime<Utc>>,
}

/// Field name to violated rules, accumulated during validation.
pub type ValidationErrors = BTreeMap<&'static str, Vec<String>>;

// === API Request/Response Models ===

/// Create message request
#[derive(Debug, Deserialize)]
pub struct CreateMessageRequest {
    /// Serialized envelope text (opaque content)
    pub content: String,
}

/// Create message response
#[derive(Debug, Serialize)]
pub struct CreateMessageResponse {
    pub identifier: String,
}

/// Fetch (consuming read) response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchMessageResponse {
    /// Envelope text for the one true read, the sentinel afterwards
    pub content: String,
    /// Null exactly when this call performed the consume transition
    pub read_at: Option<DateTime<Utc>>,
}

/// Delete message response
#[derive(Debug, Serialize)]
pub struct DeleteMessageResponse {
    pub deleted: bool,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Generic error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

/// Validation failure response with field-level messages
#[derive(Debug, Serialize)]
pub struct ValidationErrorResponse {
    pub errors: ValidationErrors,
}
