//! Read-once message lifecycle: created, fetched, consumed, gone.
//!
//! A record is Pending until its first successful fetch, which atomically
//! replaces the content with the sentinel and stamps `read_at`. Under N
//! concurrent fetches of the same pending record, exactly one caller
//! receives the real content with a null prior `read_at`; everyone else
//! sees the sentinel. The store's compare-and-set carries that guarantee;
//! this layer never reads then writes separately.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::identifier::{
    self, AllocationError, MAX_IDENTIFIER_LENGTH, MIN_IDENTIFIER_LENGTH,
};
use crate::models::{MessageRecord, ValidationErrors, CONSUMED_SENTINEL};
use crate::store::{RecordStore, StoreError};

/// Minimum content length in characters.
pub const MIN_CONTENT_CHARS: usize = 1;

/// Maximum content length in characters.
pub const MAX_CONTENT_CHARS: usize = 10_000;

/// Creation attempts when inserts collide on the identifier.
const INSERT_ATTEMPTS: usize = 3;

/// Lifecycle errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    /// Input failed validation; every violated field rule is listed.
    #[error("validation failed")]
    Validation(ValidationErrors),

    /// No record with that identifier.
    #[error("no message with that identifier")]
    NotFound,

    /// Identifier allocation gave up. Transient; resubmission may succeed.
    #[error(transparent)]
    Allocation(#[from] AllocationError),

    /// The store refuses new records.
    #[error("record store at capacity")]
    AtCapacity,
}

/// Result of a consuming fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    /// Envelope text if this call consumed the record, sentinel otherwise
    pub content: String,

    /// `None` exactly when this call performed the consume transition
    pub read_at: Option<DateTime<Utc>>,
}

/// Validate a candidate record, accumulating every violated rule.
pub fn validate_record(identifier: &str, content: &str) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    let chars = content.chars().count();
    if chars < MIN_CONTENT_CHARS {
        errors
            .entry("content")
            .or_default()
            .push("must not be empty".to_string());
    }
    if chars > MAX_CONTENT_CHARS {
        errors
            .entry("content")
            .or_default()
            .push(format!("must be at most {MAX_CONTENT_CHARS} characters"));
    }

    if !(MIN_IDENTIFIER_LENGTH..=MAX_IDENTIFIER_LENGTH).contains(&identifier.len()) {
        errors.entry("identifier").or_default().push(format!(
            "length must be between {MIN_IDENTIFIER_LENGTH} and {MAX_IDENTIFIER_LENGTH} characters"
        ));
    }
    if !identifier.bytes().all(|b| b.is_ascii_alphanumeric()) {
        errors
            .entry("identifier")
            .or_default()
            .push("must contain only alphanumeric characters".to_string());
    }

    errors
}

/// The message lifecycle over an opaque record store.
#[derive(Clone)]
pub struct MessageService {
    store: Arc<dyn RecordStore>,
}

impl MessageService {
    /// Create a service over the given store
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Create a pending record with a fresh identifier.
    ///
    /// Validation precedes persistence and reports all violated rules. A
    /// duplicate-key rejection from the store re-enters allocation rather
    /// than failing the request.
    pub fn create(&self, content: &str) -> Result<MessageRecord, LifecycleError> {
        for attempt in 1..=INSERT_ATTEMPTS {
            let identifier = identifier::allocate(self.store.as_ref())?;

            let errors = validate_record(&identifier, content);
            if !errors.is_empty() {
                return Err(LifecycleError::Validation(errors));
            }

            match self.store.insert(&identifier, content) {
                Ok(record) => {
                    info!(identifier = %record.identifier, "Message created");
                    return Ok(record);
                }
                Err(StoreError::DuplicateKey) => {
                    debug!(attempt, "Identifier collided at insert, reallocating");
                }
                Err(StoreError::AtCapacity) => return Err(LifecycleError::AtCapacity),
            }
        }

        Err(LifecycleError::Allocation(AllocationError::Exhausted {
            attempts: INSERT_ATTEMPTS,
        }))
    }

    /// Fetch a record, consuming it if still pending.
    ///
    /// The one true read returns the original content with `read_at: None`;
    /// every later call returns the sentinel and the consumption timestamp,
    /// with no further side effects.
    pub fn fetch_and_consume(&self, identifier: &str) -> Result<FetchOutcome, LifecycleError> {
        let now = Utc::now();
        let (content, read_at) = self
            .store
            .compare_and_set_consumed(identifier, CONSUMED_SENTINEL, now)
            .ok_or(LifecycleError::NotFound)?;

        if read_at.is_none() {
            info!(identifier, "Message consumed");
        }

        Ok(FetchOutcome { content, read_at })
    }

    /// Remove a record entirely.
    pub fn delete(&self, identifier: &str) -> Result<(), LifecycleError> {
        if self.store.delete(identifier) {
            info!(identifier, "Message deleted");
            Ok(())
        } else {
            Err(LifecycleError::NotFound)
        }
    }
}
