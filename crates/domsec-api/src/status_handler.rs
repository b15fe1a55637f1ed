use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use domsec_core::{ConnectionStatus, StatusMap, check_connections};

use super::state::AppState;

/// `GET /api/security-results` — detection record of every known domain.
///
/// An unreadable results file is served as an empty mapping.
pub async fn security_results(State(state): State<Arc<AppState>>) -> Json<StatusMap> {
    Json(state.registry.statuses().await)
}

/// `GET /api/connection-status` — probe both reputation services.
///
/// Always 200; failures show up in the body, never as an error status.
pub async fn connection_status(State(state): State<Arc<AppState>>) -> Json<ConnectionStatus> {
    Json(check_connections(Arc::clone(&state.probe), state.probe_timeout).await)
}
