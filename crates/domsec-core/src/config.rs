//! Configuration types for the dashboard
//!
//! This module defines all configuration structures used throughout the workspace.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::traits::ProbeTarget;

/// Main dashboard configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// HTTP listener settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Where the domain list and detection results live
    #[serde(default)]
    pub storage: StorageConfig,

    /// Reachability probe settings
    #[serde(default)]
    pub probe: ProbeConfig,

    /// Polling client settings
    #[serde(default)]
    pub poll: PollConfig,
}

impl DashboardConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.server.validate()?;
        self.storage.validate()?;
        self.probe.validate()?;
        self.poll.validate()?;
        Ok(())
    }
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind (e.g., "0.0.0.0")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// TCP port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.bind_address.is_empty() {
            return Err(crate::Error::config("Bind address cannot be empty"));
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageConfig {
    /// JSON files on disk
    File {
        /// Path to the domain list file
        domains_path: String,
        /// Path to the detection results file
        results_path: String,
    },

    /// In-memory stores (not persistent)
    Memory,
}

impl StorageConfig {
    /// Validate the storage configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            StorageConfig::File {
                domains_path,
                results_path,
            } => {
                if domains_path.is_empty() || results_path.is_empty() {
                    return Err(crate::Error::config("Storage paths cannot be empty"));
                }
                if domains_path == results_path {
                    return Err(crate::Error::config(
                        "Domain list and detection results must be stored in different files",
                    ));
                }
                Ok(())
            }
            StorageConfig::Memory => Ok(()),
        }
    }

    /// Get the storage type name
    pub fn type_name(&self) -> &str {
        match self {
            StorageConfig::File { .. } => "file",
            StorageConfig::Memory => "memory",
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::File {
            domains_path: DEFAULT_DOMAINS_PATH.to_string(),
            results_path: DEFAULT_RESULTS_PATH.to_string(),
        }
    }
}

/// Reachability probe configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Per-request timeout (in seconds)
    #[serde(default = "default_probe_timeout_secs")]
    pub timeout_secs: u64,

    /// URL probed for the Google target
    #[serde(default = "default_google_url")]
    pub google_url: String,

    /// URL probed for the Spamhaus target
    #[serde(default = "default_spamhaus_url")]
    pub spamhaus_url: String,
}

impl ProbeConfig {
    pub fn validate(&self) -> Result<(), crate::Error> {
        if !(1..=60).contains(&self.timeout_secs) {
            return Err(crate::Error::config(format!(
                "Probe timeout must be between 1 and 60 seconds. Got: {}",
                self.timeout_secs
            )));
        }
        for url in [&self.google_url, &self.spamhaus_url] {
            if !url.starts_with("https://") && !url.starts_with("http://") {
                return Err(crate::Error::config(format!(
                    "Probe URL must use HTTP or HTTPS scheme. Got: {}",
                    url
                )));
            }
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// URL probed for `target`
    pub fn url(&self, target: ProbeTarget) -> &str {
        match target {
            ProbeTarget::Google => &self.google_url,
            ProbeTarget::Spamhaus => &self.spamhaus_url,
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_probe_timeout_secs(),
            google_url: default_google_url(),
            spamhaus_url: default_spamhaus_url(),
        }
    }
}

/// Polling client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// Interval between regular refreshes (in seconds)
    #[serde(default = "default_poll_interval_secs")]
    pub interval_secs: u64,

    /// Delay of the extra refresh after a successful submission (in seconds)
    ///
    /// Gives the detection job a chance to replace the pending record.
    #[serde(default = "default_refresh_delay_secs")]
    pub refresh_delay_secs: u64,
}

impl PollConfig {
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.interval_secs == 0 {
            return Err(crate::Error::config("Poll interval must be > 0"));
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn refresh_delay(&self) -> Duration {
        Duration::from_secs(self.refresh_delay_secs)
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_poll_interval_secs(),
            refresh_delay_secs: default_refresh_delay_secs(),
        }
    }
}

/// Default path of the domain list file
pub const DEFAULT_DOMAINS_PATH: &str = "domains.json";

/// Default path of the detection results file
pub const DEFAULT_RESULTS_PATH: &str = "security_results.json";

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_probe_timeout_secs() -> u64 {
    5
}

fn default_google_url() -> String {
    ProbeTarget::Google.default_url().to_string()
}

fn default_spamhaus_url() -> String {
    ProbeTarget::Spamhaus.default_url().to_string()
}

fn default_poll_interval_secs() -> u64 {
    60
}

fn default_refresh_delay_secs() -> u64 {
    5
}
