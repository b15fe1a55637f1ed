//! Contract Test: Detection Record Idempotency
//!
//! This test verifies that creating detection records never clobbers results
//! already written by the detection job.
//!
//! Constraints verified:
//! - ensure_entry creates a pending record only for unknown domains
//! - Repeated ensure_entry calls leave existing verdicts and timestamps alone
//! - Records written by the detection job in the legacy format survive merges
//!
//! If this test fails, registrations can erase real detection results.

mod common;

use common::*;
use domsec_core::{DetectionRecord, FileStatusStore, MemoryDomainStore, StatusStore, Verdict};
use domsec_core::{DomainRegistry, StatusMap};
use std::sync::Arc;

fn checked_record() -> DetectionRecord {
    DetectionRecord {
        google_status: Verdict::Clear,
        spamhaus_status: Verdict::Flagged,
        timestamp: "2025-03-01T09:30:00.000Z".to_string(),
    }
}

#[tokio::test]
async fn ensure_entry_twice_preserves_detected_status() {
    let (registry, _, statuses) = memory_registry();
    let target = domain("example.com");

    let mut map = StatusMap::new();
    map.insert(target.clone(), checked_record());
    statuses.put(&map).await.unwrap();

    assert!(!registry.ensure_entry(&target).await.unwrap());
    assert!(!registry.ensure_entry(&target).await.unwrap());

    let after = registry.statuses().await;
    assert_eq!(after[&target], checked_record());
    assert_eq!(after.len(), 1);
}

#[tokio::test]
async fn ensure_entry_creates_pending_once() {
    let (registry, _, _) = memory_registry();
    let target = domain("example.com");

    assert!(registry.ensure_entry(&target).await.unwrap());
    let first = registry.statuses().await[&target].clone();

    assert!(!registry.ensure_entry(&target).await.unwrap());
    let second = registry.statuses().await[&target].clone();

    assert!(first.is_pending());
    assert_eq!(first, second, "timestamp must not be refreshed");
}

#[tokio::test]
async fn ensure_entry_keeps_other_domains() {
    let (registry, _, statuses) = memory_registry();

    let mut map = StatusMap::new();
    map.insert(domain("old.com"), checked_record());
    statuses.put(&map).await.unwrap();

    registry.ensure_entry(&domain("new.com")).await.unwrap();

    let after = registry.statuses().await;
    assert_eq!(after.len(), 2);
    assert_eq!(after[&domain("old.com")], checked_record());
    assert!(after[&domain("new.com")].is_pending());
}

#[tokio::test]
async fn registration_merges_into_job_written_results_file() {
    let dir = tempfile::tempdir().unwrap();
    let results_path = dir.path().join("security_results.json");

    // Results written by the detection job, including a label we don't know
    tokio::fs::write(
        &results_path,
        r#"{
    "old.com": {
        "google_status": "绿色",
        "spamhaus_status": "紫色",
        "timestamp": "2024-11-02 08:15:00"
    },
    "odd.com": {
        "google_status": "grey",
        "spamhaus_status": "yellow",
        "timestamp": "2024-11-02 08:15:00"
    }
}"#,
    )
    .await
    .unwrap();

    let statuses = FileStatusStore::new(&results_path).await.unwrap();
    let registry = DomainRegistry::new(Arc::new(MemoryDomainStore::new()), Arc::new(statuses));

    registry.add("new.com").await.unwrap();

    let reread = FileStatusStore::new(&results_path).await.unwrap();
    let after = reread.get().await.unwrap();
    assert_eq!(after.len(), 3);
    assert_eq!(after[&domain("old.com")].google_status, Verdict::Clear);
    assert_eq!(after[&domain("old.com")].timestamp, "2024-11-02 08:15:00");
    assert_eq!(
        after[&domain("odd.com")].google_status,
        Verdict::Other("grey".to_string())
    );
    assert!(after[&domain("new.com")].is_pending());
}
