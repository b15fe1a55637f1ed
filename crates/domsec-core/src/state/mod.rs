// # Store Implementations
//
// This module provides implementations of the DomainStore and StatusStore
// traits for different persistence strategies.

pub mod file;
pub mod memory;

pub use file::{FileDomainStore, FileStatusStore};
pub use memory::{MemoryDomainStore, MemoryStatusStore};

use std::sync::Arc;

use crate::Error;
use crate::config::StorageConfig;
use crate::traits::{DomainStore, StatusStore};

/// Both persisted resources, opened from configuration
pub struct Stores {
    pub domains: Arc<dyn DomainStore>,
    pub statuses: Arc<dyn StatusStore>,
}

impl Stores {
    /// Open the stores described by `config`
    pub async fn open(config: &StorageConfig) -> Result<Self, Error> {
        match config {
            StorageConfig::File {
                domains_path,
                results_path,
            } => Ok(Self {
                domains: Arc::new(FileDomainStore::new(domains_path).await?),
                statuses: Arc::new(FileStatusStore::new(results_path).await?),
            }),
            StorageConfig::Memory => Ok(Self {
                domains: Arc::new(MemoryDomainStore::new()),
                statuses: Arc::new(MemoryStatusStore::new()),
            }),
        }
    }
}
