// # domsec-core
//
// Core library for the domain security dashboard.
//
// ## Architecture Overview
//
// This library provides the record lifecycle behind the dashboard:
// - **Domain**: Validated hostname, the unit of registration
// - **DetectionRecord**: Latest Google / Spamhaus verdicts for one domain
// - **DomainStore** / **StatusStore**: Traits for the two persisted resources
// - **DomainRegistry**: Registration, fail-soft reads, record reconciliation
// - **ReachabilityProbe**: Trait for one-shot checks of the reputation services
//
// ## Design Principles
//
// 1. **Injected Stores**: Handlers never touch file paths; stores are traits
// 2. **Full Rewrites**: Every mutation reads, merges and rewrites a whole resource
// 3. **Fail-Soft Reads**: Missing or unreadable data reads as empty
// 4. **Lockstep Resources**: A listed domain always has a detection record

pub mod config;
pub mod connectivity;
pub mod domain;
pub mod error;
pub mod registry;
pub mod state;
pub mod status;
pub mod traits;

// Re-export core types for convenience
pub use config::{DashboardConfig, PollConfig, ProbeConfig, ServerConfig, StorageConfig};
pub use connectivity::check_connections;
pub use domain::Domain;
pub use error::{Error, Result};
pub use registry::DomainRegistry;
pub use state::{FileDomainStore, FileStatusStore, MemoryDomainStore, MemoryStatusStore, Stores};
pub use status::{DetectionRecord, StatusMap, Verdict};
pub use traits::{
    ConnectionStatus, DomainStore, LinkState, ProbeTarget, ReachabilityProbe, StatusStore,
};
