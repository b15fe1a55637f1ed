//! Test doubles and common utilities for contract tests
//!
//! This module provides minimal test doubles that let the contract tests
//! inject storage failures and scripted probe behavior.

#![allow(dead_code)]

use async_trait::async_trait;
use domsec_core::{
    Domain, DomainRegistry, DomainStore, Error, MemoryDomainStore, MemoryStatusStore, ProbeTarget,
    ReachabilityProbe, StatusMap, StatusStore,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Registry over fresh memory stores, plus handles to inspect them
pub fn memory_registry() -> (DomainRegistry, MemoryDomainStore, MemoryStatusStore) {
    let domains = MemoryDomainStore::new();
    let statuses = MemoryStatusStore::new();
    let registry = DomainRegistry::new(Arc::new(domains.clone()), Arc::new(statuses.clone()));
    (registry, domains, statuses)
}

pub fn domain(name: &str) -> Domain {
    Domain::parse(name).expect("test domain is valid")
}

/// A domain store whose resource exists but can never be read
pub struct CorruptDomainStore {
    put_call_count: AtomicUsize,
}

impl CorruptDomainStore {
    pub fn new() -> Self {
        Self {
            put_call_count: AtomicUsize::new(0),
        }
    }

    /// Get the number of times put() was called
    pub fn put_call_count(&self) -> usize {
        self.put_call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DomainStore for CorruptDomainStore {
    async fn get(&self) -> Result<Vec<Domain>, Error> {
        Err(Error::persistence("domains.json is corrupted"))
    }

    async fn put(&self, _domains: &[Domain]) -> Result<(), Error> {
        self.put_call_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn exists(&self) -> Result<bool, Error> {
        Ok(true)
    }
}

/// A status store that reads as `initial` and rejects every write
pub struct ReadOnlyStatusStore {
    initial: StatusMap,
}

impl ReadOnlyStatusStore {
    pub fn new(initial: StatusMap) -> Self {
        Self { initial }
    }
}

#[async_trait]
impl StatusStore for ReadOnlyStatusStore {
    async fn get(&self) -> Result<StatusMap, Error> {
        Ok(self.initial.clone())
    }

    async fn put(&self, _statuses: &StatusMap) -> Result<(), Error> {
        Err(Error::persistence("results file is read-only"))
    }
}

/// A status store whose resource exists but can never be read
pub struct CorruptStatusStore {
    inner: MemoryStatusStore,
}

impl CorruptStatusStore {
    pub fn new(inner: MemoryStatusStore) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl StatusStore for CorruptStatusStore {
    async fn get(&self) -> Result<StatusMap, Error> {
        Err(Error::persistence("security_results.json is corrupted"))
    }

    async fn put(&self, statuses: &StatusMap) -> Result<(), Error> {
        self.inner.put(statuses).await
    }
}

/// Behavior of one probe target
#[derive(Debug, Clone, Copy)]
pub enum ProbeBehavior {
    /// Answer with success
    Reachable,
    /// Fail immediately
    Refused,
    /// Never answer
    Hang,
    /// Panic inside the check
    Panic,
}

/// A probe with scripted behavior per target
pub struct ScriptedProbe {
    google: ProbeBehavior,
    spamhaus: ProbeBehavior,
    check_call_count: AtomicUsize,
}

impl ScriptedProbe {
    pub fn new(google: ProbeBehavior, spamhaus: ProbeBehavior) -> Self {
        Self {
            google,
            spamhaus,
            check_call_count: AtomicUsize::new(0),
        }
    }

    /// Get the number of times check() was called
    pub fn check_call_count(&self) -> usize {
        self.check_call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReachabilityProbe for ScriptedProbe {
    async fn check(&self, target: ProbeTarget) -> Result<(), Error> {
        self.check_call_count.fetch_add(1, Ordering::SeqCst);
        let behavior = match target {
            ProbeTarget::Google => self.google,
            ProbeTarget::Spamhaus => self.spamhaus,
        };
        match behavior {
            ProbeBehavior::Reachable => Ok(()),
            ProbeBehavior::Refused => Err(Error::probe_unreachable(format!(
                "{}: connection refused",
                target.name()
            ))),
            ProbeBehavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(())
            }
            ProbeBehavior::Panic => panic!("probe exploded"),
        }
    }
}
