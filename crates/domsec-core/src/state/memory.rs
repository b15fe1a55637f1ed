// # Memory Stores
//
// In-memory implementations of DomainStore and StatusStore.
//
// ## Purpose
//
// Fast, non-persistent stores for tests and throwaway dashboards.
//
// ## Crash Behavior
//
// - All registered domains and records are lost on restart
// - No recovery possible (state is in-memory only)

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::Error;
use crate::domain::Domain;
use crate::status::StatusMap;
use crate::traits::{DomainStore, StatusStore};

/// In-memory domain list store
///
/// `exists()` reports `false` until the first `put`, mirroring a missing file.
#[derive(Debug, Clone, Default)]
pub struct MemoryDomainStore {
    inner: Arc<RwLock<Option<Vec<Domain>>>>,
}

impl MemoryDomainStore {
    /// Create a new empty (absent) store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `domains`
    pub fn with_domains(domains: Vec<Domain>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(domains))),
        }
    }

    /// Get the number of domains in the store
    pub async fn len(&self) -> usize {
        self.inner.read().await.as_ref().map_or(0, Vec::len)
    }

    /// Check if the store is empty
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl DomainStore for MemoryDomainStore {
    async fn get(&self) -> Result<Vec<Domain>, Error> {
        Ok(self.inner.read().await.clone().unwrap_or_default())
    }

    async fn put(&self, domains: &[Domain]) -> Result<(), Error> {
        *self.inner.write().await = Some(domains.to_vec());
        Ok(())
    }

    async fn exists(&self) -> Result<bool, Error> {
        Ok(self.inner.read().await.is_some())
    }
}

/// In-memory detection results store
#[derive(Debug, Clone, Default)]
pub struct MemoryStatusStore {
    inner: Arc<RwLock<StatusMap>>,
}

impl MemoryStatusStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `statuses`
    pub fn with_statuses(statuses: StatusMap) -> Self {
        Self {
            inner: Arc::new(RwLock::new(statuses)),
        }
    }

    /// Get the number of records in the store
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Check if the store is empty
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[async_trait]
impl StatusStore for MemoryStatusStore {
    async fn get(&self) -> Result<StatusMap, Error> {
        Ok(self.inner.read().await.clone())
    }

    async fn put(&self, statuses: &StatusMap) -> Result<(), Error> {
        *self.inner.write().await = statuses.clone();
        Ok(())
    }
}
