use std::sync::Arc;
use std::time::Duration;

use domsec_core::{DomainRegistry, ReachabilityProbe};

/// Shared application state for the HTTP API.
///
/// Passed to Axum handlers via `State(Arc<AppState>)`.
pub struct AppState {
    pub registry: Arc<DomainRegistry>,
    pub probe: Arc<dyn ReachabilityProbe>,
    /// Upper bound on each reachability check
    pub probe_timeout: Duration,
}

impl AppState {
    pub fn new(
        registry: Arc<DomainRegistry>,
        probe: Arc<dyn ReachabilityProbe>,
        probe_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            probe,
            probe_timeout,
        }
    }
}
