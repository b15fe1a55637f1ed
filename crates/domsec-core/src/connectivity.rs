//! Connection status of the reputation services
//!
//! [`check_connections`] probes both targets concurrently, each under its own
//! timeout, and folds the outcome into a [`ConnectionStatus`]. It never fails:
//! a slow or broken target only degrades its own field, and an internal
//! failure of the check degrades both fields to `error`.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

use crate::traits::{ConnectionStatus, LinkState, ProbeTarget, ReachabilityProbe};

/// Probe both targets and report their reachability
pub async fn check_connections(
    probe: Arc<dyn ReachabilityProbe>,
    timeout: Duration,
) -> ConnectionStatus {
    let google = tokio::spawn(check_target(
        Arc::clone(&probe),
        ProbeTarget::Google,
        timeout,
    ));
    let spamhaus = tokio::spawn(check_target(probe, ProbeTarget::Spamhaus, timeout));

    match tokio::join!(google, spamhaus) {
        (Ok(google), Ok(spamhaus)) => ConnectionStatus { google, spamhaus },
        (google, spamhaus) => {
            for failure in [google.err(), spamhaus.err()].into_iter().flatten() {
                error!("Connection check task failed: {}", failure);
            }
            ConnectionStatus::ERROR
        }
    }
}

async fn check_target(
    probe: Arc<dyn ReachabilityProbe>,
    target: ProbeTarget,
    timeout: Duration,
) -> LinkState {
    match tokio::time::timeout(timeout, probe.check(target)).await {
        Ok(Ok(())) => {
            debug!("{} reachable", target.name());
            LinkState::Ok
        }
        Ok(Err(e)) => {
            warn!("{} connection check failed: {}", target.name(), e);
            LinkState::Unreachable
        }
        Err(_) => {
            warn!(
                "{} connection check timed out after {:?}",
                target.name(),
                timeout
            );
            LinkState::Unreachable
        }
    }
}
