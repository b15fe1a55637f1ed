//! Core traits for the dashboard
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`DomainStore`]: Persistence of the ordered domain list
//! - [`StatusStore`]: Persistence of the domain → detection record mapping
//! - [`ReachabilityProbe`]: One-shot checks against the reputation services

pub mod domain_store;
pub mod reachability;
pub mod status_store;

pub use domain_store::DomainStore;
pub use reachability::{ConnectionStatus, LinkState, ProbeTarget, ReachabilityProbe};
pub use status_store::StatusStore;
