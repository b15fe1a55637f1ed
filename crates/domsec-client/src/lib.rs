// # domsec-client
//
// Polling client for the dashboard server.
//
// - **DashboardSource**: Reads snapshots and submits registrations
// - **Poller**: Interval refreshes, last-response-wins, post-submit refresh
// - **Renderer**: Shows the current view (terminal implementation included)

pub mod error;
pub mod poller;
pub mod render;
pub mod source;

pub use error::{ClientError, Result};
pub use poller::{DashboardView, Poller};
pub use render::{Renderer, TerminalRenderer};
pub use source::{DashboardSource, HttpDashboardSource, register};
