// # domsec-api
//
// HTTP boundary of the dashboard.
//
// ## Routes
//
// | Method | Path                     | Handler                             |
// |--------|--------------------------|-------------------------------------|
// | GET    | `/`                      | dashboard page                      |
// | GET    | `/healthz`               | liveness                            |
// | GET    | `/api/domains`           | `{"domains": [...]}`                |
// | POST   | `/api/domains`           | `{"domain": "..."}` → register      |
// | GET    | `/api/security-results`  | domain → detection record           |
// | GET    | `/api/connection-status` | `{"google": ..., "spamhaus": ...}`  |
//
// Read routes never fail: unreadable resources are served as empty.

pub mod domain_handler;
pub mod error;
pub mod health_handler;
pub mod router;
pub mod server;
pub mod state;
pub mod status_handler;

pub use error::ApiError;
pub use router::build_router;
pub use server::run_http_server;
pub use state::AppState;
