use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;

use super::domain_handler::{add_domain, list_domains};
use super::health_handler::{dashboard, healthz};
use super::state::AppState;
use super::status_handler::{connection_status, security_results};

/// Maximum request body size (4 KiB); a registration is one short string.
const MAX_BODY_SIZE: usize = 4 * 1024;

/// Build the router with every dashboard route.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(dashboard))
        .route("/healthz", get(healthz))
        .route("/api/domains", get(list_domains).post(add_domain))
        .route("/api/security-results", get(security_results))
        .route("/api/connection-status", get(connection_status))
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .with_state(state)
}
