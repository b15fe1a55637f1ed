//! Client-side error type

use serde::Deserialize;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors seen by the polling client
#[derive(Error, Debug)]
pub enum ClientError {
    /// The server (or the local pre-check) refused the request.
    ///
    /// Displays the message exactly as the server worded it.
    #[error("{message}")]
    Rejected {
        status: u16,
        code: String,
        message: String,
    },

    /// The request never produced a usable response
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl ClientError {
    /// Build from a non-success response body
    ///
    /// Bodies that are not an error envelope keep their raw text as the message.
    pub fn from_body(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => Self::Rejected {
                status,
                code: envelope.error.code,
                message: envelope.error.message,
            },
            Err(_) => Self::Rejected {
                status,
                code: "UNKNOWN".to_string(),
                message: if body.trim().is_empty() {
                    format!("HTTP {}", status)
                } else {
                    body.trim().to_string()
                },
            },
        }
    }

    /// Local refusal with the same wording the server would use
    pub fn invalid_format(err: &domsec_core::Error) -> Self {
        Self::Rejected {
            status: 400,
            code: "INVALID_FORMAT".to_string(),
            message: err.to_string(),
        }
    }

    /// Whether the user can fix this by changing the input
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::Rejected { status, .. } if (400..500).contains(status))
    }
}
