// # Domain Store Trait
//
// Persistence port for the ordered list of registered domains.
//
// ## Purpose
//
// The domain store holds exactly one resource: the list of domains in the
// order they were registered. It knows nothing about validation, duplicates
// or detection records; those rules live in `DomainRegistry`.
//
// ## Read semantics
//
// - Resource absent: `Ok(empty)` (the expected first-run state)
// - Resource present but unreadable: `Err(Error::PersistenceUnavailable)`
//
// Callers on read paths collapse the error to an empty list; write paths
// refuse to proceed so a corrupt list is never silently overwritten.
//
// ## Implementations
//
// - `FileDomainStore`: JSON file, atomic writes, backup copy
// - `MemoryDomainStore`: process-local, for tests and ephemeral runs

use async_trait::async_trait;

use crate::Error;
use crate::domain::Domain;

/// Trait for domain list persistence
///
/// `put` replaces the whole list. There is no append or partial update.
///
/// # Thread Safety
///
/// Implementations must be safe to call from multiple tasks. They are not
/// required to serialize read-modify-write cycles; `DomainRegistry` holds a
/// writer lock for that.
#[async_trait]
pub trait DomainStore: Send + Sync {
    /// Read the full list in insertion order
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<Domain>)`: The persisted list, empty if the resource is absent
    /// - `Err(Error)`: The resource exists but could not be read or parsed
    async fn get(&self) -> Result<Vec<Domain>, Error>;

    /// Replace the full list
    async fn put(&self, domains: &[Domain]) -> Result<(), Error>;

    /// Whether the persisted resource exists yet
    async fn exists(&self) -> Result<bool, Error>;
}
