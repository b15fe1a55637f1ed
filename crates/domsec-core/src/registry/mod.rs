//! Domain registration
//!
//! The [`DomainRegistry`] owns the lifecycle of a tracked domain: it validates
//! candidates, keeps the ordered domain list, and guarantees that every listed
//! domain has a detection record.
//!
//! ## Registration
//!
//! ```text
//! add("example.com")
//!   │
//!   ├─ Domain::parse            → InvalidFormat
//!   │
//!   ├─ lock writer ──────────────────────────────────────────┐
//!   │   ├─ create empty list if the resource is absent        │
//!   │   ├─ read list             → PersistenceUnavailable     │
//!   │   ├─ duplicate check       → AlreadyExists              │
//!   │   ├─ write list + new domain                            │
//!   │   ├─ read-merge-write pending records for every listed  │
//!   │   │  domain that has none                               │
//!   │   └─ on record failure: write previous list back        │
//!   └─ unlock ───────────────────────────────────────────────┘
//! ```
//!
//! The writer lock serializes registrations inside this process. The
//! detection job writes the results file from another process; its writes
//! are last-writer-wins against ours.
//!
//! ## Reads
//!
//! [`DomainRegistry::list`] and [`DomainRegistry::statuses`] never fail.
//! A missing or unreadable resource reads as empty; unreadable resources are
//! logged by the store.

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::domain::Domain;
use crate::error::{Error, Result};
use crate::state::Stores;
use crate::status::{StatusMap, merge_pending};
use crate::traits::{DomainStore, StatusStore};

/// Registry of tracked domains and their detection records
pub struct DomainRegistry {
    domains: Arc<dyn DomainStore>,
    statuses: Arc<dyn StatusStore>,
    /// Held for the whole read-modify-write cycle of either resource
    write_lock: Mutex<()>,
}

impl DomainRegistry {
    /// Create a registry over the two stores
    pub fn new(domains: Arc<dyn DomainStore>, statuses: Arc<dyn StatusStore>) -> Self {
        Self {
            domains,
            statuses,
            write_lock: Mutex::new(()),
        }
    }

    /// Create a registry from opened stores
    pub fn from_stores(stores: Stores) -> Self {
        Self::new(stores.domains, stores.statuses)
    }

    /// All registered domains in insertion order
    ///
    /// Returns an empty list if the resource is missing or unreadable.
    pub async fn list(&self) -> Vec<Domain> {
        match self.domains.get().await {
            Ok(domains) => domains,
            Err(e) => {
                warn!("Domain list unavailable, reporting empty list: {}", e);
                Vec::new()
            }
        }
    }

    /// Latest detection record of every tracked domain
    ///
    /// Returns an empty mapping if the resource is missing or unreadable.
    pub async fn statuses(&self) -> StatusMap {
        match self.statuses.get().await {
            Ok(statuses) => statuses,
            Err(e) => {
                warn!("Detection results unavailable, reporting empty mapping: {}", e);
                StatusMap::new()
            }
        }
    }

    /// Register `candidate` and create its pending detection record
    ///
    /// # Errors
    ///
    /// - `Error::InvalidFormat`: `candidate` fails the hostname grammar
    /// - `Error::AlreadyExists`: `candidate` is already registered (exact match)
    /// - `Error::PersistenceUnavailable`: a resource could not be read or written;
    ///   the domain list is left as it was
    pub async fn add(&self, candidate: &str) -> Result<Domain> {
        let domain = Domain::parse(candidate)?;

        let _guard = self.write_lock.lock().await;

        if !self.domains.exists().await? {
            info!("Domain list does not exist yet, creating it");
            self.domains.put(&[]).await?;
        }

        let mut domains = self.domains.get().await?;
        if domains.contains(&domain) {
            debug!("Rejected duplicate domain {}", domain);
            return Err(Error::already_exists(domain.into_inner()));
        }

        let previous = domains.clone();
        domains.push(domain.clone());
        self.domains.put(&domains).await?;

        if let Err(e) = self.merge_pending_locked(&domains).await {
            error!(
                "Failed to create detection record for {}: {}. Rolling back registration.",
                domain, e
            );
            if let Err(rollback_err) = self.domains.put(&previous).await {
                error!(
                    "Rollback of domain list failed, {} is listed without a record: {}",
                    domain, rollback_err
                );
            }
            return Err(e);
        }

        info!("Registered domain {} ({} total)", domain, domains.len());
        Ok(domain)
    }

    /// Create a pending detection record for `domain` if it has none
    ///
    /// Idempotent: an existing record keeps its verdicts and timestamp.
    ///
    /// # Returns
    ///
    /// - `Ok(true)`: A pending record was written
    /// - `Ok(false)`: A record already existed, nothing was written
    pub async fn ensure_entry(&self, domain: &Domain) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        self.ensure_entry_locked(domain).await
    }

    /// Create pending records for listed domains that have none
    ///
    /// Heals registrations interrupted before their record was written, and
    /// domains added to the list file by hand. Returns the number of records
    /// created.
    pub async fn reconcile(&self) -> Result<usize> {
        let _guard = self.write_lock.lock().await;

        let domains = self.domains.get().await?;
        let created = self.merge_pending_locked(&domains).await?;
        if created > 0 {
            info!("Created {} missing detection record(s)", created);
        }
        Ok(created)
    }

    /// Write pending records for those of `domains` that have none
    ///
    /// Also heals records lost to an unreadable results file, which merges
    /// as empty.
    async fn merge_pending_locked(&self, domains: &[Domain]) -> Result<usize> {
        let mut statuses = self.read_statuses_for_merge().await;

        let now = Utc::now();
        let created = domains
            .iter()
            .filter(|domain| merge_pending(&mut statuses, domain, now))
            .count();

        if created > 0 {
            self.statuses.put(&statuses).await?;
        }
        Ok(created)
    }

    async fn ensure_entry_locked(&self, domain: &Domain) -> Result<bool> {
        let mut statuses = self.read_statuses_for_merge().await;
        if !merge_pending(&mut statuses, domain, Utc::now()) {
            debug!("Detection record for {} already present", domain);
            return Ok(false);
        }
        self.statuses.put(&statuses).await?;
        Ok(true)
    }

    /// Current mapping for a merge; an unreadable resource merges as empty
    async fn read_statuses_for_merge(&self) -> StatusMap {
        match self.statuses.get().await {
            Ok(statuses) => statuses,
            Err(e) => {
                warn!("Detection results unreadable, rebuilding from empty: {}", e);
                StatusMap::new()
            }
        }
    }
}
