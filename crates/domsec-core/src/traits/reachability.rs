// # Reachability Probe Trait
//
// Defines the interface for one-shot reachability checks against the two
// third-party reputation services.
//
// ## Semantics
//
// A probe answers one question: did the service answer with a success status?
// It does not interpret the response body, does not retry, and does not know
// anything about registered domains. Any transport failure, timeout or
// non-success status is reported as `Error::ProbeUnreachable`.
//
// ## Implementations
//
// - HTTP (reqwest): `domsec-probe-http` crate

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Fixed Google Safe Browsing transparency report lookup
pub const GOOGLE_TARGET_URL: &str =
    "https://transparencyreport.google.com/safe-browsing/search?url=example.com";

/// Fixed Spamhaus domain lookup
pub const SPAMHAUS_TARGET_URL: &str = "https://check.spamhaus.org/listed/?domain=example.com";

/// The two services the dashboard depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeTarget {
    Google,
    Spamhaus,
}

impl ProbeTarget {
    /// Both targets, in display order
    pub const ALL: [ProbeTarget; 2] = [ProbeTarget::Google, ProbeTarget::Spamhaus];

    /// Hardcoded URL probed for this target
    pub fn default_url(self) -> &'static str {
        match self {
            ProbeTarget::Google => GOOGLE_TARGET_URL,
            ProbeTarget::Spamhaus => SPAMHAUS_TARGET_URL,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ProbeTarget::Google => "google",
            ProbeTarget::Spamhaus => "spamhaus",
        }
    }
}

/// State of one connection indicator as reported over the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkState {
    /// No result yet (client-side sentinel before the first response)
    Checking,
    /// Target answered with a success status
    Ok,
    /// Transport failure, timeout or non-success status
    Unreachable,
    /// The check itself failed internally
    Error,
}

impl LinkState {
    /// Wire name, as serialized
    pub fn as_str(self) -> &'static str {
        match self {
            LinkState::Checking => "checking",
            LinkState::Ok => "ok",
            LinkState::Unreachable => "unreachable",
            LinkState::Error => "error",
        }
    }
}

/// Ephemeral reachability snapshot of both targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStatus {
    pub google: LinkState,
    pub spamhaus: LinkState,
}

impl ConnectionStatus {
    /// Sentinel shown before the first probe result arrives
    pub const CHECKING: ConnectionStatus = ConnectionStatus {
        google: LinkState::Checking,
        spamhaus: LinkState::Checking,
    };

    /// Both fields degraded to the error marker
    pub const ERROR: ConnectionStatus = ConnectionStatus {
        google: LinkState::Error,
        spamhaus: LinkState::Error,
    };

    /// State of a single target
    pub fn get(&self, target: ProbeTarget) -> LinkState {
        match target {
            ProbeTarget::Google => self.google,
            ProbeTarget::Spamhaus => self.spamhaus,
        }
    }
}

impl Default for ConnectionStatus {
    fn default() -> Self {
        Self::CHECKING
    }
}

/// Trait for reachability probe implementations
///
/// Implementations must be thread-safe; both targets are checked
/// concurrently on every request.
#[async_trait]
pub trait ReachabilityProbe: Send + Sync {
    /// Issue one request to `target`
    ///
    /// # Returns
    ///
    /// - `Ok(())`: A response with a success status was received
    /// - `Err(Error::ProbeUnreachable)`: Anything else
    async fn check(&self, target: ProbeTarget) -> Result<(), crate::Error>;
}
