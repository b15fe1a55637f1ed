use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use domsec_core::Domain;
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::state::AppState;

#[derive(Serialize)]
pub struct DomainListResponse {
    pub domains: Vec<Domain>,
}

#[derive(Deserialize)]
pub struct AddDomainRequest {
    pub domain: String,
}

#[derive(Serialize)]
pub struct AddDomainResponse {
    pub success: bool,
    pub domain: Domain,
}

/// `GET /api/domains` — registered domains in insertion order.
///
/// An unreadable list is served as empty.
pub async fn list_domains(State(state): State<Arc<AppState>>) -> Json<DomainListResponse> {
    Json(DomainListResponse {
        domains: state.registry.list().await,
    })
}

/// `POST /api/domains` — register a domain and create its pending record.
pub async fn add_domain(
    State(state): State<Arc<AppState>>,
    body: Result<Json<AddDomainRequest>, JsonRejection>,
) -> Result<Json<AddDomainResponse>, ApiError> {
    let Json(req) = body.map_err(|rejection| ApiError::BadRequest {
        code: "INVALID_REQUEST",
        message: rejection.body_text(),
    })?;

    let domain = state.registry.add(&req.domain).await.map_err(|e| {
        if !e.is_user_error() {
            tracing::error!(candidate = %req.domain, "Failed to add domain: {}", e);
        }
        ApiError::from(e)
    })?;

    Ok(Json(AddDomainResponse {
        success: true,
        domain,
    }))
}
