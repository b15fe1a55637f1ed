// # domsecd - Domain Security Dashboard Daemon
//
// Thin integration layer: all registry, storage and probe logic lives in the
// library crates. The daemon is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing logging and the runtime
// 3. Opening the stores and healing missing detection records
// 4. Serving the HTTP API until SIGINT/SIGTERM
//
// ## Configuration
//
// ### Server
// - `DOMSEC_BIND_ADDRESS`: Address to bind (default `0.0.0.0`)
// - `DOMSEC_PORT`: TCP port (default `3000`)
//
// ### Storage
// - `DOMSEC_STORAGE_TYPE`: `file` or `memory` (default `file`)
// - `DOMSEC_DOMAINS_PATH`: Domain list file (default `domains.json`)
// - `DOMSEC_RESULTS_PATH`: Detection results file (default `security_results.json`)
//
// ### Probe
// - `DOMSEC_PROBE_TIMEOUT_SECS`: Per-target timeout, 1-60 (default `5`)
//
// ### Logging
// - `DOMSEC_LOG_LEVEL`: trace, debug, info, warn, error (default `info`)
//
// ## Example
//
// ```bash
// export DOMSEC_PORT=8080
// export DOMSEC_DOMAINS_PATH=/var/lib/domsec/domains.json
// export DOMSEC_RESULTS_PATH=/var/lib/domsec/security_results.json
//
// domsecd
// ```

use anyhow::Result;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

use domsec_api::{AppState, run_http_server};
use domsec_core::config::{DEFAULT_DOMAINS_PATH, DEFAULT_RESULTS_PATH};
use domsec_core::{DashboardConfig, DomainRegistry, StorageConfig, Stores};
use domsec_probe_http::HttpReachabilityProbe;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Longest time in-flight requests get to finish after a shutdown signal
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum DomsecExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DomsecExitCode> for ExitCode {
    fn from(code: DomsecExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    dashboard: DashboardConfig,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its value
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut dashboard = DashboardConfig::new();

        if let Some(bind_address) = lookup("DOMSEC_BIND_ADDRESS") {
            dashboard.server.bind_address = bind_address;
        }
        if let Some(port) = lookup("DOMSEC_PORT") {
            dashboard.server.port = port
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("DOMSEC_PORT must be a port number. Got: {}", port))?;
        }

        let storage_type = lookup("DOMSEC_STORAGE_TYPE").unwrap_or_else(|| "file".to_string());
        dashboard.storage = match storage_type.as_str() {
            "file" => StorageConfig::File {
                domains_path: lookup("DOMSEC_DOMAINS_PATH")
                    .unwrap_or_else(|| DEFAULT_DOMAINS_PATH.to_string()),
                results_path: lookup("DOMSEC_RESULTS_PATH")
                    .unwrap_or_else(|| DEFAULT_RESULTS_PATH.to_string()),
            },
            "memory" => StorageConfig::Memory,
            other => anyhow::bail!(
                "DOMSEC_STORAGE_TYPE '{}' is not supported. \
                Supported types: file, memory",
                other
            ),
        };

        if let Some(timeout) = lookup("DOMSEC_PROBE_TIMEOUT_SECS") {
            dashboard.probe.timeout_secs = timeout.trim().parse().map_err(|_| {
                anyhow::anyhow!(
                    "DOMSEC_PROBE_TIMEOUT_SECS must be a whole number of seconds. Got: {}",
                    timeout
                )
            })?;
        }

        Ok(Self {
            dashboard,
            log_level: lookup("DOMSEC_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        self.dashboard.validate()?;

        // Parent directories of the data files must already exist
        if let StorageConfig::File {
            domains_path,
            results_path,
        } = &self.dashboard.storage
        {
            for (var, path) in [
                ("DOMSEC_DOMAINS_PATH", domains_path),
                ("DOMSEC_RESULTS_PATH", results_path),
            ] {
                if let Some(parent) = std::path::Path::new(path).parent()
                    && !parent.as_os_str().is_empty()
                    && !parent.exists()
                {
                    anyhow::bail!(
                        "{} parent directory does not exist: {}. \
                        Create it first: mkdir -p {}",
                        var,
                        parent.display(),
                        parent.display()
                    );
                }
            }
        }

        self.level()?;
        Ok(())
    }

    fn level(&self) -> Result<Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            _ => anyhow::bail!(
                "DOMSEC_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }
    }
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return DomsecExitCode::ConfigError.into();
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return DomsecExitCode::ConfigError.into();
    }

    // Initialize tracing
    let log_level = config.level().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DomsecExitCode::ConfigError.into();
    }

    info!("Starting domsecd");
    info!(
        "Storage: {}, probe timeout: {}s",
        config.dashboard.storage.type_name(),
        config.dashboard.probe.timeout_secs
    );

    // Enter tokio runtime
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DomsecExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_daemon(config).await {
            error!("Daemon error: {}", e);
            DomsecExitCode::RuntimeError
        } else {
            DomsecExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Run the daemon
async fn run_daemon(config: Config) -> Result<()> {
    let stores = Stores::open(&config.dashboard.storage).await?;
    let registry = Arc::new(DomainRegistry::from_stores(stores));

    // A registration interrupted between its two writes leaves a listed
    // domain without a record
    match registry.reconcile().await {
        Ok(0) => {}
        Ok(created) => info!("Created {} missing detection record(s)", created),
        Err(e) => warn!("Skipping record reconciliation: {}", e),
    }

    let probe = Arc::new(HttpReachabilityProbe::from_config(&config.dashboard.probe));
    let state = Arc::new(AppState::new(
        registry,
        probe,
        config.dashboard.probe.timeout(),
    ));

    let shutdown = create_shutdown_token()?;
    let server_token = shutdown.clone();
    let server = run_http_server(
        state,
        &config.dashboard.server.bind_address,
        config.dashboard.server.port,
        async move { server_token.cancelled().await },
    );

    let drain_deadline = async {
        shutdown.cancelled().await;
        tokio::time::sleep(SHUTDOWN_TIMEOUT).await;
    };

    tokio::select! {
        result = server => result?,
        _ = drain_deadline => anyhow::bail!("Shutdown timeout after {:?}", SHUTDOWN_TIMEOUT),
    }

    info!("Shutting down daemon");
    Ok(())
}

/// Create a token that is cancelled on the first SIGINT or SIGTERM
#[cfg(unix)]
fn create_shutdown_token() -> Result<CancellationToken> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        let name = tokio::select! {
            _ = sigterm.recv() => "SIGTERM",
            _ = sigint.recv() => "SIGINT",
        };
        info!("Received shutdown signal: {}", name);
        trigger.cancel();
    });

    Ok(token)
}

/// Create a token that is cancelled on CTRL-C
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
fn create_shutdown_token() -> Result<CancellationToken> {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received shutdown signal: SIGINT"),
            Err(e) => error!("Failed to wait for CTRL-C: {}", e),
        }
        trigger.cancel();
    });

    Ok(token)
}
