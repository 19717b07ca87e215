//! Public identifier allocation.
//!
//! Identifiers are short alphanumeric tokens drawn from a cryptographically
//! secure source. With 62^8 possible values, collisions against any
//! realistic table are negligible; the batch-and-retry loop exists
//! defensively. The store's duplicate-key rejection remains the final
//! uniqueness authority.

use ring::rand::{SecureRandom, SystemRandom};
use tracing::debug;

use crate::store::RecordStore;

/// 62-symbol identifier alphabet.
const ALPHABET: &[u8; 62] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Generated identifier length.
pub const IDENTIFIER_LENGTH: usize = 8;

/// Minimum accepted identifier length.
pub const MIN_IDENTIFIER_LENGTH: usize = 8;

/// Maximum accepted identifier length.
pub const MAX_IDENTIFIER_LENGTH: usize = 32;

/// Candidates generated per allocation round.
const BATCH_SIZE: usize = 5;

/// Allocation rounds before giving up.
const MAX_ATTEMPTS: usize = 3;

/// Allocation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AllocationError {
    /// Every candidate in every round was taken. Transient: the caller may
    /// simply retry the whole creation.
    #[error("identifier allocation exhausted after {attempts} attempts")]
    Exhausted {
        /// Rounds attempted before giving up.
        attempts: usize,
    },

    /// The system's secure random source failed.
    #[error("secure random source unavailable")]
    Rng,
}

/// Check the accepted identifier shape: 8-32 chars, `[A-Za-z0-9]` only.
pub fn is_valid_identifier(candidate: &str) -> bool {
    (MIN_IDENTIFIER_LENGTH..=MAX_IDENTIFIER_LENGTH).contains(&candidate.len())
        && candidate.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Allocate an identifier not currently present in the store.
///
/// Generates batches of random candidates, probes the store for which are
/// taken, and returns the first free one. The probe is best-effort, not a
/// lock: a concurrent insert can still collide, which surfaces as a
/// `DuplicateKey` at insert time and re-enters allocation there.
pub fn allocate(store: &dyn RecordStore) -> Result<String, AllocationError> {
    let rng = SystemRandom::new();

    for attempt in 1..=MAX_ATTEMPTS {
        let candidates = (0..BATCH_SIZE)
            .map(|_| random_identifier(&rng, IDENTIFIER_LENGTH))
            .collect::<Result<Vec<_>, _>>()?;

        let taken = store.find_existing_identifiers(&candidates);
        if let Some(free) = candidates.into_iter().find(|c| !taken.contains(c)) {
            return Ok(free);
        }

        debug!(attempt, "All identifier candidates taken, retrying");
    }

    Err(AllocationError::Exhausted {
        attempts: MAX_ATTEMPTS,
    })
}

/// Draw one random identifier of `length` alphanumeric characters.
///
/// Rejection sampling: bytes >= 248 are discarded so the modulo stays
/// uniform over the 62-symbol alphabet.
fn random_identifier(rng: &dyn SecureRandom, length: usize) -> Result<String, AllocationError> {
    const LIMIT: u8 = (u8::MAX / 62) * 62; // 248

    let mut out = String::with_capacity(length);
    let mut buf = [0u8; 16];
    while out.len() < length {
        rng.fill(&mut buf).map_err(|_| AllocationError::Rng)?;
        for &byte in &buf {
            if byte >= LIMIT {
                continue;
            }
            out.push(ALPHABET[(byte % 62) as usize] as char);
            if out.len() == length {
                break;
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::config::Config;
    use crate::store::MemoryStore;

    fn test_store() -> MemoryStore {
        MemoryStore::new(&Config {
            bind_addr: "127.0.0.1".into(),
            port: 0,
            max_records: 1000,
        })
    }

    #[test]
    fn allocated_identifier_matches_shape() {
        let store = test_store();
        let identifier = allocate(&store).unwrap();
        assert_eq!(identifier.len(), IDENTIFIER_LENGTH);
        assert!(is_valid_identifier(&identifier));
    }

    #[test]
    fn allocations_are_distinct() {
        let store = test_store();
        let mut seen = HashSet::new();
        for _ in 0..100 {
            let identifier = allocate(&store).unwrap();
            store.insert(&identifier, "x").unwrap();
            assert!(seen.insert(identifier), "allocator repeated an identifier");
        }
    }

    #[test]
    fn allocator_avoids_taken_identifiers() {
        let store = test_store();
        let taken = allocate(&store).unwrap();
        store.insert(&taken, "x").unwrap();

        for _ in 0..50 {
            assert_ne!(allocate(&store).unwrap(), taken);
        }
    }

    #[test]
    fn shape_accepts_bounds() {
        assert!(is_valid_identifier("abcDEF12")); // 8
        assert!(is_valid_identifier(&"a".repeat(32)));
    }

    #[test]
    fn shape_rejects_length_seven_and_thirty_three() {
        assert!(!is_valid_identifier(&"a".repeat(7)));
        assert!(!is_valid_identifier(&"a".repeat(33)));
    }

    #[test]
    fn shape_rejects_non_alphanumeric() {
        assert!(!is_valid_identifier("abc-EF12"));
        assert!(!is_valid_identifier("abc EF12"));
        assert!(!is_valid_identifier("abcdéf12"));
    }

    #[test]
    fn random_identifier_uses_full_alphabet_eventually() {
        let rng = SystemRandom::new();
        let mut seen = HashSet::new();
        for _ in 0..200 {
            for c in random_identifier(&rng, IDENTIFIER_LENGTH).unwrap().chars() {
                seen.insert(c);
            }
        }
        // 1600 draws over 62 symbols: all classes should appear.
        assert!(seen.iter().any(char::is_ascii_uppercase));
        assert!(seen.iter().any(char::is_ascii_lowercase));
        assert!(seen.iter().any(char::is_ascii_digit));
    }
}
