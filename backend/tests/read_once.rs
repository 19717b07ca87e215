//! Concurrency tests for the read-once consume transition.
//!
//! The invariant under test: of N simultaneous fetches of one pending
//! record, exactly one observes a null prior read timestamp and receives
//! the real content; all others receive the sentinel.

use std::sync::{Arc, Barrier};

use cinder_backend::lifecycle::{FetchOutcome, LifecycleError, MessageService};
use cinder_backend::models::CONSUMED_SENTINEL;
use cinder_backend::{Config, MemoryStore};

fn test_service() -> MessageService {
    let config = Config {
        bind_addr: "127.0.0.1".into(),
        port: 0,
        max_records: 10_000,
    };
    MessageService::new(Arc::new(MemoryStore::new(&config)))
}

/// Run `threads` simultaneous consuming fetches against one identifier.
fn race_consume(service: &MessageService, identifier: &str, threads: usize) -> Vec<FetchOutcome> {
    let barrier = Barrier::new(threads);

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let barrier = &barrier;
                scope.spawn(move || {
                    barrier.wait();
                    service.fetch_and_consume(identifier).unwrap()
                })
            })
            .collect();

        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
}

#[test]
fn exactly_one_concurrent_fetch_wins() {
    let service = test_service();
    let record = service.create("the-original-envelope").unwrap();

    let outcomes = race_consume(&service, &record.identifier, 16);

    let winners: Vec<_> = outcomes.iter().filter(|o| o.read_at.is_none()).collect();
    let losers: Vec<_> = outcomes.iter().filter(|o| o.read_at.is_some()).collect();

    assert_eq!(winners.len(), 1, "more than one caller got the real content");
    assert_eq!(winners[0].content, "the-original-envelope");

    assert_eq!(losers.len(), 15);
    for loser in losers {
        assert_eq!(loser.content, CONSUMED_SENTINEL);
    }
}

#[test]
fn exactly_once_holds_over_many_rounds() {
    let service = test_service();

    for round in 0..50 {
        let record = service.create("round-envelope").unwrap();
        let outcomes = race_consume(&service, &record.identifier, 8);

        let winners = outcomes.iter().filter(|o| o.read_at.is_none()).count();
        assert_eq!(winners, 1, "round {} leaked the content {} times", round, winners);
    }
}

#[test]
fn concurrent_creates_allocate_distinct_identifiers() {
    let service = test_service();
    let barrier = Barrier::new(16);

    let identifiers: Vec<String> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let service = &service;
                let barrier = &barrier;
                scope.spawn(move || {
                    barrier.wait();
                    service.create("x").unwrap().identifier
                })
            })
            .collect();

        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let unique: std::collections::HashSet<_> = identifiers.iter().collect();
    assert_eq!(unique.len(), identifiers.len());
}

#[test]
fn concurrent_delete_and_consume_never_half_update() {
    // Whichever wins, the loser sees NotFound or a consistent record;
    // there is no state where the content changed but read_at did not.
    let service = test_service();

    for _ in 0..50 {
        let record = service.create("contended-envelope").unwrap();
        let barrier = Barrier::new(2);

        let (consumed, deleted) = std::thread::scope(|scope| {
            let consume = {
                let service = &service;
                let barrier = &barrier;
                let identifier = &record.identifier;
                scope.spawn(move || {
                    barrier.wait();
                    service.fetch_and_consume(identifier)
                })
            };
            let delete = {
                let service = &service;
                let barrier = &barrier;
                let identifier = &record.identifier;
                scope.spawn(move || {
                    barrier.wait();
                    service.delete(identifier)
                })
            };
            (consume.join().unwrap(), delete.join().unwrap())
        });

        match consumed {
            Ok(outcome) => {
                // The consume won the race; it must be the one true read.
                assert_eq!(outcome.content, "contended-envelope");
                assert!(outcome.read_at.is_none());
            }
            Err(err) => assert_eq!(err, LifecycleError::NotFound),
        }
        match deleted {
            Ok(()) => {}
            Err(err) => assert_eq!(err, LifecycleError::NotFound),
        }
    }
}
