// # Status Store Trait
//
// Persistence port for the mapping of domain to latest detection record.
//
// ## Purpose
//
// The status store is shared with the detection job, which runs in another
// process and rewrites records as results come in. Because of that, every
// mutation is a full read-merge-write against the persisted resource:
//
// 1. `get()` the whole mapping (never a cached copy)
// 2. change one key
// 3. `put()` the whole mapping back
//
// ## Read semantics
//
// Same as `DomainStore`: absent → `Ok(empty)`, present but unreadable →
// `Err(Error::PersistenceUnavailable)`.

use async_trait::async_trait;

use crate::Error;
use crate::status::StatusMap;

/// Trait for detection record persistence
///
/// # Thread Safety
///
/// All methods must be safe to call concurrently from multiple tasks.
#[async_trait]
pub trait StatusStore: Send + Sync {
    /// Read the full mapping
    ///
    /// # Returns
    ///
    /// - `Ok(StatusMap)`: The persisted mapping, empty if the resource is absent
    /// - `Err(Error)`: The resource exists but could not be read or parsed
    async fn get(&self) -> Result<StatusMap, Error>;

    /// Replace the full mapping
    async fn put(&self, statuses: &StatusMap) -> Result<(), Error>;
}
