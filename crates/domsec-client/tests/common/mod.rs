//! Test doubles shared by the client contract tests

#![allow(dead_code)]

use async_trait::async_trait;
use domsec_client::{ClientError, DashboardSource, Result};
use domsec_core::{ConnectionStatus, DetectionRecord, Domain, LinkState, StatusMap, Verdict};
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

pub fn domain(name: &str) -> Domain {
    Domain::parse(name).unwrap()
}

pub fn results_with(names: &[&str]) -> StatusMap {
    names
        .iter()
        .map(|name| {
            (
                domain(name),
                DetectionRecord {
                    google_status: Verdict::Clear,
                    spamhaus_status: Verdict::Clear,
                    timestamp: "2025-03-01T09:30:00.000Z".to_string(),
                },
            )
        })
        .collect()
}

pub const ALL_OK: ConnectionStatus = ConnectionStatus {
    google: LinkState::Ok,
    spamhaus: LinkState::Ok,
};

/// One scripted answer to `fetch_results`
pub struct ScriptedFetch {
    pub delay: Duration,
    pub results: std::result::Result<StatusMap, u16>,
}

impl ScriptedFetch {
    pub fn immediate(results: StatusMap) -> Self {
        Self {
            delay: Duration::ZERO,
            results: Ok(results),
        }
    }

    pub fn delayed(delay: Duration, results: StatusMap) -> Self {
        Self {
            delay,
            results: Ok(results),
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            delay: Duration::ZERO,
            results: Err(status),
        }
    }
}

/// Source whose answers are queued up front
///
/// Once the script runs out, `fetch_results` returns the fallback.
pub struct ScriptedSource {
    script: Mutex<VecDeque<ScriptedFetch>>,
    fallback: Mutex<StatusMap>,
    add_reply: Mutex<Option<ClientError>>,
    fetch_calls: AtomicUsize,
    add_calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(script: Vec<ScriptedFetch>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            fallback: Mutex::new(StatusMap::new()),
            add_reply: Mutex::new(None),
            fetch_calls: AtomicUsize::new(0),
            add_calls: AtomicUsize::new(0),
        })
    }

    pub async fn set_fallback(&self, results: StatusMap) {
        *self.fallback.lock().await = results;
    }

    /// Make the next `add_domain` fail with this server reply
    pub async fn reject_next_add(&self, status: u16, code: &str, message: &str) {
        *self.add_reply.lock().await = Some(ClientError::Rejected {
            status,
            code: code.to_string(),
            message: message.to_string(),
        });
    }

    pub fn fetch_call_count(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn add_call_count(&self) -> usize {
        self.add_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DashboardSource for ScriptedSource {
    async fn fetch_results(&self) -> Result<StatusMap> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);

        let next = self.script.lock().await.pop_front();
        match next {
            Some(step) => {
                tokio::time::sleep(step.delay).await;
                step.results
                    .map_err(|status| ClientError::from_body(status, "unavailable"))
            }
            None => Ok(self.fallback.lock().await.clone()),
        }
    }

    async fn fetch_connection(&self) -> Result<ConnectionStatus> {
        Ok(ALL_OK)
    }

    async fn list_domains(&self) -> Result<Vec<Domain>> {
        Ok(self.fallback.lock().await.keys().cloned().collect())
    }

    async fn add_domain(&self, candidate: &str) -> Result<Domain> {
        self.add_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(err) = self.add_reply.lock().await.take() {
            return Err(err);
        }
        Ok(domain(candidate))
    }
}
