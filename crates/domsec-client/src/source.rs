// # Dashboard Source
//
// Where the polling client reads its snapshots from and sends registrations to.
//
// - `DashboardSource`: the seam the poller depends on
// - `HttpDashboardSource`: talks to a running `domsecd` over its JSON API

use async_trait::async_trait;
use domsec_core::{ConnectionStatus, Domain, StatusMap};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{ClientError, Result};

/// Remote side of the dashboard
#[async_trait]
pub trait DashboardSource: Send + Sync {
    /// Detection record of every known domain
    async fn fetch_results(&self) -> Result<StatusMap>;

    /// Reachability of both reputation services
    async fn fetch_connection(&self) -> Result<ConnectionStatus>;

    /// Registered domains in insertion order
    async fn list_domains(&self) -> Result<Vec<Domain>>;

    /// Register `candidate`, returning the domain as stored
    async fn add_domain(&self, candidate: &str) -> Result<Domain>;
}

/// Register `candidate` once, without touching any local view
///
/// Malformed candidates are refused locally with the server's wording and
/// never sent.
pub async fn register(source: &dyn DashboardSource, candidate: &str) -> Result<Domain> {
    if let Err(e) = Domain::parse(candidate) {
        return Err(ClientError::invalid_format(&e));
    }
    source.add_domain(candidate).await
}

#[derive(Deserialize)]
struct DomainList {
    domains: Vec<Domain>,
}

#[derive(Serialize)]
struct AddRequest<'a> {
    domain: &'a str,
}

#[derive(Deserialize)]
struct AddReply {
    domain: Domain,
}

/// HTTP implementation of [`DashboardSource`]
pub struct HttpDashboardSource {
    /// Base URL of the server, without trailing slash
    base_url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpDashboardSource {
    /// Create a source for the server at `base_url`
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.client.get(self.url(path)).send().await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }
}

/// Turn a non-success response into `ClientError::Rejected`
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ClientError::from_body(status.as_u16(), &body))
}

#[async_trait]
impl DashboardSource for HttpDashboardSource {
    async fn fetch_results(&self) -> Result<StatusMap> {
        self.get_json("/api/security-results").await
    }

    async fn fetch_connection(&self) -> Result<ConnectionStatus> {
        self.get_json("/api/connection-status").await
    }

    async fn list_domains(&self) -> Result<Vec<Domain>> {
        let list: DomainList = self.get_json("/api/domains").await?;
        Ok(list.domains)
    }

    async fn add_domain(&self, candidate: &str) -> Result<Domain> {
        tracing::debug!("Submitting {} to {}", candidate, self.base_url);

        let response = self
            .client
            .post(self.url("/api/domains"))
            .json(&AddRequest { domain: candidate })
            .send()
            .await?;
        let reply: AddReply = check_status(response).await?.json().await?;
        Ok(reply.domain)
    }
}
