//! Record store: the single shared mutable resource on the server.
//!
//! The trait is the minimum contract the read-once lifecycle needs; the
//! in-memory implementation keeps everything in RAM. No caching of records
//! happens outside the store - it is the source of truth for every
//! concurrent request.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

use crate::config::Config;
use crate::models::MessageRecord;

/// Store errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The identifier is already taken. Callers treat this as an
    /// allocation retry trigger, not a fatal error.
    #[error("identifier already exists")]
    DuplicateKey,

    /// The store refuses new records until some are consumed or deleted.
    #[error("record store at capacity")]
    AtCapacity,
}

/// Minimum operations the lifecycle layer requires from a record store.
///
/// `compare_and_set_consumed` is the atomic primitive the one-time-read
/// guarantee rests on: the content/read_at pair must change as one update.
pub trait RecordStore: Send + Sync {
    /// Insert a new pending record. Rejects duplicate identifiers;
    /// duplicate rejection is the final uniqueness authority.
    fn insert(&self, identifier: &str, content: &str) -> Result<MessageRecord, StoreError>;

    /// Look up a record without touching its state.
    fn find_by_identifier(&self, identifier: &str) -> Option<MessageRecord>;

    /// Which of the given candidates are already taken.
    fn find_existing_identifiers(&self, candidates: &[String]) -> HashSet<String>;

    /// Atomically consume a pending record.
    ///
    /// Returns `None` when no record exists. For a pending record: captures
    /// the original content, overwrites it with `sentinel`, sets
    /// `read_at = now`, and returns `(original_content, None)`. For an
    /// already-consumed record: returns `(current_content, Some(read_at))`
    /// without mutating anything.
    fn compare_and_set_consumed(
        &self,
        identifier: &str,
        sentinel: &str,
        now: DateTime<Utc>,
    ) -> Option<(String, Option<DateTime<Utc>>)>;

    /// Remove a record. Returns whether anything was removed.
    fn delete(&self, identifier: &str) -> bool;
}

/// Thread-safe in-memory store
#[derive(Clone)]
pub struct MemoryStore {
    /// Records keyed by public identifier
    records: Arc<DashMap<String, MessageRecord>>,

    /// Capacity ceiling from configuration
    max_records: usize,
}

impl MemoryStore {
    /// Create a new empty store
    pub fn new(config: &Config) -> Self {
        Self {
            records: Arc::new(DashMap::new()),
            max_records: config.max_records,
        }
    }

    /// Current number of stored records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordStore for MemoryStore {
    fn insert(&self, identifier: &str, content: &str) -> Result<MessageRecord, StoreError> {
        if self.records.len() >= self.max_records {
            return Err(StoreError::AtCapacity);
        }

        let now = Utc::now();
        let record = MessageRecord {
            id: Uuid::new_v4(),
            identifier: identifier.to_string(),
            content: content.to_string(),
            created_at: now,
            updated_at: now,
            read_at: None,
        };

        match self.records.entry(identifier.to_string()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateKey),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                debug!(identifier, "Stored message record");
                Ok(record)
            }
        }
    }

    fn find_by_identifier(&self, identifier: &str) -> Option<MessageRecord> {
        self.records.get(identifier).map(|entry| entry.value().clone())
    }

    fn find_existing_identifiers(&self, candidates: &[String]) -> HashSet<String> {
        candidates
            .iter()
            .filter(|candidate| self.records.contains_key(candidate.as_str()))
            .cloned()
            .collect()
    }

    fn compare_and_set_consumed(
        &self,
        identifier: &str,
        sentinel: &str,
        now: DateTime<Utc>,
    ) -> Option<(String, Option<DateTime<Utc>>)> {
        // The get_mut guard holds the map's entry lock for the whole
        // read-then-write, so content and read_at change as one update and
        // concurrent callers serialize here.
        let mut entry = self.records.get_mut(identifier)?;
        let record = entry.value_mut();

        if let Some(read_at) = record.read_at {
            return Some((record.content.clone(), Some(read_at)));
        }

        let original = std::mem::replace(&mut record.content, sentinel.to_string());
        record.read_at = Some(now);
        record.updated_at = now;
        debug!(identifier, "Consumed message record");
        Some((original, None))
    }

    fn delete(&self, identifier: &str) -> bool {
        let removed = self.records.remove(identifier).is_some();
        if removed {
            debug!(identifier, "Deleted message record");
        }
        removed
    }
}
