// # domsec - dashboard command line
//
// ```bash
// domsec watch                       # live terminal dashboard
// domsec add example.com             # register a domain
// domsec list --server http://host:3000
// ```

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use domsec_client::render::{domain_width, format_header, format_row};
use domsec_client::{
    ClientError, DashboardSource, HttpDashboardSource, Poller, TerminalRenderer, register,
};
use domsec_core::PollConfig;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Upper bound on every request to the server
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Parser)]
#[command(name = "domsec")]
#[command(about = "Watch and manage the domain security dashboard.")]
struct CommandLine {
    /// Base URL of the dashboard server
    #[arg(long, global = true, default_value = "http://127.0.0.1:3000")]
    server: String,

    /// Seconds between regular refreshes
    #[arg(long, global = true, default_value_t = 60)]
    interval: u64,

    /// Seconds until the extra refresh after adding a domain
    #[arg(long, global = true, default_value_t = 5)]
    refresh_delay: u64,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a live dashboard until interrupted
    Watch,
    /// Register a domain
    Add { domain: String },
    /// Print registered domains and their latest verdicts
    List,
}

/// 0 success, 1 refused input or bad flags, 2 server or transport failure
#[derive(Debug, Clone, Copy)]
enum CliExitCode {
    Success = 0,
    UserError = 1,
    RuntimeError = 2,
}

impl From<CliExitCode> for ExitCode {
    fn from(code: CliExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = CommandLine::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    let poll = PollConfig {
        interval_secs: cli.interval,
        refresh_delay_secs: cli.refresh_delay,
    };
    if let Err(e) = poll.validate() {
        eprintln!("{}", e.to_string().red());
        return CliExitCode::UserError.into();
    }

    let source = Arc::new(HttpDashboardSource::new(&cli.server, REQUEST_TIMEOUT));
    let result = match cli.command {
        Commands::Watch => {
            watch(source, &poll).await;
            Ok(())
        }
        Commands::Add { domain } => add(source.as_ref(), &domain).await,
        Commands::List => list(source.as_ref()).await,
    };

    match result {
        Ok(()) => CliExitCode::Success.into(),
        Err(e) => {
            eprintln!("{}", e.to_string().red());
            if e.is_user_error() {
                CliExitCode::UserError.into()
            } else {
                CliExitCode::RuntimeError.into()
            }
        }
    }
}

async fn watch(source: Arc<HttpDashboardSource>, poll: &PollConfig) {
    let poller = Poller::from_config(source, poll);

    let token = poller.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            token.cancel();
        }
    });

    let mut renderer = TerminalRenderer::stdout(true);
    poller.run(&mut renderer).await;
}

/// One registration and nothing else; no view to refresh
async fn add(source: &HttpDashboardSource, candidate: &str) -> Result<(), ClientError> {
    let domain = register(source, candidate).await?;
    println!("{} {}", "Added".green().bold(), domain);
    Ok(())
}

async fn list(source: &HttpDashboardSource) -> Result<(), ClientError> {
    let (domains, results) = tokio::join!(source.list_domains(), source.fetch_results());
    let domains = domains?;
    let results = results?;

    if domains.is_empty() {
        println!("{}", "No domains registered".dimmed());
        return Ok(());
    }

    let width = domain_width(domains.iter());
    println!("{}", format_header(width).bold());
    for domain in &domains {
        println!("{}", format_row(domain, results.get(domain), width));
    }
    Ok(())
}
