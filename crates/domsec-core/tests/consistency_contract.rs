//! Contract Test: Domain List / Detection Record Consistency
//!
//! Constraints verified:
//! - A domain is never listed without a detection record
//! - Failed record writes roll the domain list back
//! - Unreadable resources read as empty but block writes to the list
//! - Reads never rewrite a corrupt file
//! - A registration restores records lost to an unreadable results file
//! - Concurrent registrations do not lose updates
//!
//! If this test fails, the two persisted resources can drift apart.

mod common;

use common::*;
use domsec_core::{
    DomainRegistry, DomainStore, Error, FileDomainStore, FileStatusStore, MemoryDomainStore,
    MemoryStatusStore, StatusMap,
};
use std::path::Path;
use std::sync::Arc;

async fn file_registry(dir: &Path) -> DomainRegistry {
    DomainRegistry::new(
        Arc::new(FileDomainStore::new(dir.join("domains.json")).await.unwrap()),
        Arc::new(
            FileStatusStore::new(dir.join("security_results.json"))
                .await
                .unwrap(),
        ),
    )
}

#[tokio::test]
async fn failed_record_write_rolls_back_registration() {
    let domains = MemoryDomainStore::new();
    let registry = DomainRegistry::new(
        Arc::new(domains.clone()),
        Arc::new(ReadOnlyStatusStore::new(StatusMap::new())),
    );

    let err = registry.add("example.com").await.unwrap_err();

    assert!(matches!(err, Error::PersistenceUnavailable(_)));
    assert!(!err.is_user_error());
    assert!(registry.list().await.is_empty());
    // The list was created empty before the attempt
    assert!(domains.exists().await.unwrap());
}

#[tokio::test]
async fn rollback_keeps_earlier_domains() {
    let domains = MemoryDomainStore::with_domains(vec![domain("a.com")]);
    let registry = DomainRegistry::new(
        Arc::new(domains),
        Arc::new(ReadOnlyStatusStore::new(StatusMap::new())),
    );

    assert!(registry.add("b.org").await.is_err());
    assert_eq!(registry.list().await, vec![domain("a.com")]);
}

#[tokio::test]
async fn unreadable_domain_list_reads_empty_and_blocks_writes() {
    let store = Arc::new(CorruptDomainStore::new());
    let registry = DomainRegistry::new(store.clone(), Arc::new(MemoryStatusStore::new()));

    assert!(registry.list().await.is_empty());

    let err = registry.add("example.com").await.unwrap_err();
    assert!(matches!(err, Error::PersistenceUnavailable(_)));
    assert_eq!(store.put_call_count(), 0, "corrupt list must not be overwritten");
}

#[tokio::test]
async fn unreadable_results_read_empty_and_are_rebuilt_on_add() {
    let backing = MemoryStatusStore::new();
    let registry = DomainRegistry::new(
        Arc::new(MemoryDomainStore::new()),
        Arc::new(CorruptStatusStore::new(backing.clone())),
    );

    assert!(registry.statuses().await.is_empty());

    registry.add("example.com").await.unwrap();
    assert_eq!(backing.len().await, 1);
}

#[tokio::test]
async fn truncated_results_file_is_not_rewritten_by_reads() {
    let dir = tempfile::tempdir().unwrap();
    let registry = file_registry(dir.path()).await;
    registry.add("a.com").await.unwrap();
    registry.add("b.org").await.unwrap();

    // The detection job truncates before it dumps
    let results_path = dir.path().join("security_results.json");
    std::fs::write(&results_path, b"").unwrap();

    assert!(registry.statuses().await.is_empty());
    let listed = registry.list().await;
    assert_eq!(listed, vec![domain("a.com"), domain("b.org")]);
    assert!(std::fs::read(&results_path).unwrap().is_empty());
}

#[tokio::test]
async fn add_after_truncated_results_restores_every_record() {
    let dir = tempfile::tempdir().unwrap();
    let registry = file_registry(dir.path()).await;
    registry.add("a.com").await.unwrap();
    registry.add("b.org").await.unwrap();
    std::fs::write(dir.path().join("security_results.json"), b"").unwrap();

    registry.add("c.net").await.unwrap();

    let listed = registry.list().await;
    let recorded = registry.statuses().await;
    assert_eq!(listed.len(), 3);
    for d in &listed {
        assert!(recorded[d].is_pending(), "{} listed without a record", d);
    }
}

#[tokio::test]
async fn corrupt_domain_list_is_not_rewritten() {
    let dir = tempfile::tempdir().unwrap();
    let registry = file_registry(dir.path()).await;
    registry.add("a.com").await.unwrap();
    registry.add("b.org").await.unwrap();

    let list_path = dir.path().join("domains.json");
    std::fs::write(&list_path, b"{\"domains\": [").unwrap();

    assert!(registry.list().await.is_empty());
    let err = registry.add("b.org").await.unwrap_err();
    assert!(matches!(err, Error::PersistenceUnavailable(_)));

    assert_eq!(std::fs::read(&list_path).unwrap(), b"{\"domains\": [");
    assert_eq!(registry.statuses().await.len(), 2);
}

#[tokio::test]
async fn concurrent_registrations_do_not_lose_updates() {
    let (registry, domains, statuses) = memory_registry();
    let registry = Arc::new(registry);

    let handles: Vec<_> = (0..20)
        .map(|i| {
            let registry = Arc::clone(&registry);
            tokio::spawn(async move { registry.add(&format!("site{}.com", i)).await })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(domains.len().await, 20);
    assert_eq!(statuses.len().await, 20);

    let listed = registry.list().await;
    let recorded = registry.statuses().await;
    for d in &listed {
        assert!(recorded.contains_key(d), "{} listed without a record", d);
    }
}

#[tokio::test]
async fn concurrent_duplicates_register_exactly_once() {
    let (registry, _, _) = memory_registry();
    let registry = Arc::new(registry);

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let registry = Arc::clone(&registry);
            tokio::spawn(async move { registry.add("example.com").await })
        })
        .collect();

    let mut accepted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => accepted += 1,
            Err(e) => assert!(matches!(e, Error::AlreadyExists(_))),
        }
    }

    assert_eq!(accepted, 1);
    assert_eq!(registry.list().await.len(), 1);
}
