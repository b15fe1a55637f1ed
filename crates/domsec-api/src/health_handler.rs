use axum::Json;
use axum::response::Html;
use serde::Serialize;

/// Dashboard page, served as-is
const DASHBOARD_HTML: &str = include_str!("../static/index.html");

#[derive(Serialize)]
pub struct HealthResponse {
    /// Always `"ok"`.
    pub status: &'static str,
}

/// Liveness probe — always returns 200 if the process is running.
pub async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// `GET /` — the browser dashboard.
pub async fn dashboard() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}
