//! Error types for the domain security dashboard
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for dashboard operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the dashboard
#[derive(Error, Debug)]
pub enum Error {
    /// Candidate domain does not match the hostname grammar
    #[error("Invalid domain format: {0}")]
    InvalidFormat(String),

    /// Domain is already registered
    #[error("Domain already exists: {0}")]
    AlreadyExists(String),

    /// Persisted resource missing, unreadable or not writable
    #[error("Persistence unavailable: {0}")]
    PersistenceUnavailable(String),

    /// Reachability check against a third-party target failed
    #[error("Probe unreachable: {0}")]
    ProbeUnreachable(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an invalid format error
    pub fn invalid_format(msg: impl Into<String>) -> Self {
        Self::InvalidFormat(msg.into())
    }

    /// Create an "already exists" error
    pub fn already_exists(msg: impl Into<String>) -> Self {
        Self::AlreadyExists(msg.into())
    }

    /// Create a persistence error
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::PersistenceUnavailable(msg.into())
    }

    /// Create a probe error
    pub fn probe_unreachable(msg: impl Into<String>) -> Self {
        Self::ProbeUnreachable(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Whether the caller can fix this error by changing the input.
    ///
    /// Only these kinds are reported verbatim across the HTTP boundary;
    /// everything else is logged and replaced by a generic message.
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::InvalidFormat(_) | Self::AlreadyExists(_))
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
