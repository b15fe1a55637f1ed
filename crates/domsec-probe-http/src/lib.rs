// # HTTP Reachability Probe
//
// This crate provides the HTTP implementation of `ReachabilityProbe`.
//
// ## Purpose
//
// Tells the dashboard whether the two reputation services can be reached from
// the host it runs on. The detection job depends on both; when one of them is
// down or blocking us, stale verdicts are expected.
//
// ## Behavior
//
// - One GET per check, no retries
// - Browser-like request headers (both services treat bare clients poorly)
// - Success status → reachable; anything else → `Error::ProbeUnreachable`
// - Response bodies are never read

use domsec_core::config::ProbeConfig;
use domsec_core::traits::{ProbeTarget, ReachabilityProbe};
use domsec_core::{Error, Result};

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT};
use std::time::Duration;

/// Headers of an ordinary desktop browser request
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const BROWSER_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,image/apng,*/*;q=0.8";
const BROWSER_ACCEPT_LANGUAGE: &str = "zh-CN,zh;q=0.9,en;q=0.8";

/// HTTP-based reachability probe
pub struct HttpReachabilityProbe {
    /// URL probed for the Google target
    google_url: String,

    /// URL probed for the Spamhaus target
    spamhaus_url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpReachabilityProbe {
    /// Create a probe against the hardcoded service URLs
    pub fn new(timeout: Duration) -> Self {
        Self::with_urls(
            ProbeTarget::Google.default_url(),
            ProbeTarget::Spamhaus.default_url(),
            timeout,
        )
    }

    /// Create a probe from configuration
    pub fn from_config(config: &ProbeConfig) -> Self {
        Self::with_urls(
            config.url(ProbeTarget::Google),
            config.url(ProbeTarget::Spamhaus),
            config.timeout(),
        )
    }

    /// Create a probe against custom URLs
    pub fn with_urls(
        google_url: impl Into<String>,
        spamhaus_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            google_url: google_url.into(),
            spamhaus_url: spamhaus_url.into(),
            client: reqwest::Client::builder()
                .timeout(timeout)
                .default_headers(browser_headers())
                .build()
                .unwrap_or_default(),
        }
    }

    /// URL probed for `target`
    pub fn url(&self, target: ProbeTarget) -> &str {
        match target {
            ProbeTarget::Google => &self.google_url,
            ProbeTarget::Spamhaus => &self.spamhaus_url,
        }
    }
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static(BROWSER_ACCEPT_LANGUAGE),
    );
    headers
}

#[async_trait::async_trait]
impl ReachabilityProbe for HttpReachabilityProbe {
    async fn check(&self, target: ProbeTarget) -> Result<()> {
        let url = self.url(target);
        tracing::debug!("Probing {} at {}", target.name(), url);

        let response = self.client.get(url).send().await.map_err(|e| {
            Error::probe_unreachable(format!("{}: request failed: {}", target.name(), e))
        })?;

        if !response.status().is_success() {
            return Err(Error::probe_unreachable(format!(
                "{}: HTTP error: {}",
                target.name(),
                response.status()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domsec_core::traits::reachability::{GOOGLE_TARGET_URL, SPAMHAUS_TARGET_URL};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// Serve one canned response and hand back the raw request
    async fn serve_once(status_line: &'static str) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/probe", listener.local_addr().unwrap());
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let n = socket.read(&mut buf).await.unwrap();
            let _ = tx.send(String::from_utf8_lossy(&buf[..n]).to_string());

            let response = format!(
                "{}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
                status_line
            );
            socket.write_all(response.as_bytes()).await.unwrap();
        });

        (url, rx)
    }

    /// Accept connections but never answer
    async fn silent_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/probe", listener.local_addr().unwrap());

        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        url
    }

    /// A local port with nothing listening on it
    async fn closed_port_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}/probe", addr)
    }

    #[tokio::test]
    async fn test_success_status_is_reachable() {
        let (url, request) = serve_once("HTTP/1.1 200 OK").await;
        let probe =
            HttpReachabilityProbe::with_urls(url, "http://unused.invalid", Duration::from_secs(5));

        assert!(probe.check(ProbeTarget::Google).await.is_ok());

        let request = request.await.unwrap().to_lowercase();
        assert!(request.starts_with("get /probe"));
        assert!(request.contains("user-agent: mozilla/5.0"));
        assert!(request.contains("accept-language: zh-cn"));
    }

    #[tokio::test]
    async fn test_error_status_is_unreachable() {
        let (url, _request) = serve_once("HTTP/1.1 503 Service Unavailable").await;
        let probe =
            HttpReachabilityProbe::with_urls("http://unused.invalid", url, Duration::from_secs(5));

        let err = probe.check(ProbeTarget::Spamhaus).await.unwrap_err();
        assert!(matches!(err, Error::ProbeUnreachable(_)));
    }

    #[tokio::test]
    async fn test_refused_connection_is_unreachable() {
        let url = closed_port_url().await;
        let probe = HttpReachabilityProbe::with_urls(&url, &url, Duration::from_secs(5));

        let err = probe.check(ProbeTarget::Google).await.unwrap_err();
        assert!(matches!(err, Error::ProbeUnreachable(_)));
    }

    #[tokio::test]
    async fn test_timeout_is_unreachable() {
        let url = silent_server().await;
        let probe = HttpReachabilityProbe::with_urls(&url, &url, Duration::from_millis(200));

        let err = probe.check(ProbeTarget::Spamhaus).await.unwrap_err();
        assert!(matches!(err, Error::ProbeUnreachable(_)));
    }

    #[test]
    fn test_from_config_uses_configured_urls() {
        let config = ProbeConfig::default();
        let probe = HttpReachabilityProbe::from_config(&config);

        assert_eq!(probe.url(ProbeTarget::Google), GOOGLE_TARGET_URL);
        assert_eq!(probe.url(ProbeTarget::Spamhaus), SPAMHAUS_TARGET_URL);
    }
}
