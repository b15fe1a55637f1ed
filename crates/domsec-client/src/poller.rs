// # Poller
//
// Keeps a local view of the dashboard in step with the server.
//
// ## Refresh rules
//
// - One refresh on start, then one per interval (missed ticks are skipped)
// - Every refresh takes a generation number when it starts. A snapshot is
//   applied only if its generation is newer than the one on screen, so an
//   old response that arrives late never overwrites a newer one
// - A successful submission refreshes immediately and once more after the
//   refresh delay; a rejected one only sets the message
// - Cancelling the token (or dropping the poller) stops the timer and
//   discards in-flight refreshes

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use domsec_core::{ConnectionStatus, Domain, PollConfig, StatusMap};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::render::Renderer;
use crate::source::{DashboardSource, register};

/// What the client currently shows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardView {
    /// Last applied detection results
    pub results: StatusMap,

    /// Last applied reachability snapshot, `checking` until the first one
    pub connection: ConnectionStatus,

    /// Outcome of the last submission, if it was refused
    pub message: Option<String>,

    /// Generation of the applied snapshot, 0 before the first one
    pub generation: u64,
}

struct Shared {
    source: Arc<dyn DashboardSource>,
    view: watch::Sender<DashboardView>,
    next_generation: AtomicU64,
    cancel: CancellationToken,
}

impl Shared {
    fn take_generation(&self) -> u64 {
        self.next_generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    async fn refresh(&self, generation: u64) {
        let fetch = async {
            tokio::join!(
                self.source.fetch_results(),
                self.source.fetch_connection()
            )
        };

        let (results, connection) = tokio::select! {
            _ = self.cancel.cancelled() => {
                debug!("Refresh {} discarded", generation);
                return;
            }
            snapshot = fetch => snapshot,
        };

        let results = match results {
            Ok(results) => Some(results),
            Err(e) => {
                warn!("Failed to fetch detection results: {}", e);
                None
            }
        };
        let connection = connection.unwrap_or_else(|e| {
            warn!("Failed to fetch connection status: {}", e);
            ConnectionStatus::ERROR
        });

        self.apply(generation, results, connection);
    }

    /// Apply a snapshot unless a newer one is already on screen
    fn apply(
        &self,
        generation: u64,
        results: Option<StatusMap>,
        connection: ConnectionStatus,
    ) -> bool {
        self.view.send_if_modified(|view| {
            if generation <= view.generation {
                debug!(
                    "Dropping stale snapshot {} (showing {})",
                    generation, view.generation
                );
                return false;
            }
            view.generation = generation;
            if let Some(results) = results {
                view.results = results;
            }
            view.connection = connection;
            true
        })
    }

    fn set_message(&self, message: Option<String>) {
        self.view.send_modify(|view| view.message = message);
    }
}

/// Time-triggered dashboard poller
pub struct Poller {
    shared: Arc<Shared>,
    interval: Duration,
    refresh_delay: Duration,
}

impl Poller {
    pub fn new(
        source: Arc<dyn DashboardSource>,
        interval: Duration,
        refresh_delay: Duration,
    ) -> Self {
        let (view, _) = watch::channel(DashboardView::default());
        Self {
            shared: Arc::new(Shared {
                source,
                view,
                next_generation: AtomicU64::new(0),
                cancel: CancellationToken::new(),
            }),
            interval,
            refresh_delay,
        }
    }

    pub fn from_config(source: Arc<dyn DashboardSource>, config: &PollConfig) -> Self {
        Self::new(source, config.interval(), config.refresh_delay())
    }

    /// Copy of the current view
    pub fn view(&self) -> DashboardView {
        self.shared.view.borrow().clone()
    }

    /// Receiver notified whenever the view changes
    pub fn subscribe(&self) -> watch::Receiver<DashboardView> {
        self.shared.view.subscribe()
    }

    /// Token that stops the poller when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.shared.cancel.clone()
    }

    /// Start one refresh in the background
    pub fn refresh(&self) -> JoinHandle<()> {
        let shared = Arc::clone(&self.shared);
        let generation = shared.take_generation();
        tokio::spawn(async move { shared.refresh(generation).await })
    }

    /// Start one refresh after `delay`, unless cancelled first
    pub fn refresh_after(&self, delay: Duration) -> JoinHandle<()> {
        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            tokio::select! {
                _ = shared.cancel.cancelled() => return,
                _ = tokio::time::sleep(delay) => {}
            }
            let generation = shared.take_generation();
            shared.refresh(generation).await;
        })
    }

    /// Register `candidate`
    ///
    /// Candidates that fail the local grammar check are refused without a
    /// request. On refusal the message is stored in the view, word for word,
    /// and nothing else changes.
    pub async fn submit(&self, candidate: &str) -> Result<Domain> {
        match register(self.shared.source.as_ref(), candidate).await {
            Ok(domain) => {
                info!("Added {}", domain);
                self.shared.set_message(None);
                self.refresh();
                self.refresh_after(self.refresh_delay);
                Ok(domain)
            }
            Err(e) => {
                self.shared.set_message(Some(e.to_string()));
                Err(e)
            }
        }
    }

    /// Refresh on the interval and render every change until cancelled
    pub async fn run(&self, renderer: &mut dyn Renderer) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut updates = self.subscribe();

        info!("Polling every {:?}", self.interval);
        if let Err(e) = renderer.render(&self.view()) {
            warn!("Failed to render dashboard: {}", e);
        }

        loop {
            tokio::select! {
                _ = self.shared.cancel.cancelled() => {
                    info!("Poller stopped");
                    break;
                }
                _ = ticker.tick() => {
                    self.refresh();
                }
                changed = updates.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let view = updates.borrow_and_update().clone();
                    if let Err(e) = renderer.render(&view) {
                        warn!("Failed to render dashboard: {}", e);
                    }
                }
            }
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.shared.cancel.cancel();
    }
}
