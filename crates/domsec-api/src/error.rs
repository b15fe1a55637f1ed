use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domsec_core::Error;
use serde::Serialize;

/// Message returned for every failure the caller cannot fix
pub const GENERIC_ADD_FAILURE: &str = "Failed to add domain";

#[derive(Serialize)]
pub(crate) struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
pub(crate) struct ErrorDetail {
    /// Machine-readable error code (e.g. `ALREADY_EXISTS`).
    code: &'static str,
    /// Human-readable description of the error.
    message: String,
}

/// API error type.
///
/// All variants produce a JSON response matching:
/// `{"error":{"code":"SCREAMING_SNAKE","message":"human-readable"}}`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest { code: &'static str, message: String },
    Conflict { code: &'static str, message: String },
    Internal { message: String },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            Self::BadRequest { code, message } => (StatusCode::BAD_REQUEST, code, message),
            Self::Conflict { code, message } => (StatusCode::CONFLICT, code, message),
            Self::Internal { message } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
            }
        };

        (
            status,
            Json(ErrorBody {
                error: ErrorDetail { code, message },
            }),
        )
            .into_response()
    }
}

/// Only user-correctable errors keep their message; internal detail never
/// crosses the boundary.
impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match &err {
            Error::InvalidFormat(_) => Self::BadRequest {
                code: "INVALID_FORMAT",
                message: err.to_string(),
            },
            Error::AlreadyExists(_) => Self::Conflict {
                code: "ALREADY_EXISTS",
                message: err.to_string(),
            },
            _ => Self::Internal {
                message: GENERIC_ADD_FAILURE.to_string(),
            },
        }
    }
}
