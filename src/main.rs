//! Heartbeat fixture entry point.
//!
//! Initializes tracing, loads configuration (built-in defaults unless a TOML
//! file is given), binds the HTTP listener, and runs the responder and the
//! heartbeat writer until a signal or a fatal error.

use std::process::ExitCode;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use heartbeat::config::{AppConfig, LoggingConfig, DEFAULT_LOG_FILTER};
use heartbeat::{http, FatalError, Fixture};

/// Heartbeat: an HTTP probe target that also writes a heartbeat log file
#[derive(Parser, Debug)]
#[command(name = "heartbeat", version, about)]
struct Args {
    /// Path to an optional configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Log level filter (e.g., "heartbeat=debug")
    #[arg(short, long)]
    log_level: Option<String>,
}

fn init_tracing(log_filter: &str, logging: &LoggingConfig) {
    let registry =
        tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(log_filter));

    if logging.is_json() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // The Display form goes to stderr even when tracing is not yet initialized
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), FatalError> {
    // Configuration comes first so the log format is known
    let config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
    init_tracing(&log_filter, &config.logging);

    tracing::info!(
        config = args.config.as_deref().unwrap_or("<defaults>"),
        port = config.http.port,
        heartbeat_path = %config.heartbeat.path.display(),
        heartbeat_interval_secs = config.heartbeat.interval_seconds,
        "Loaded configuration"
    );

    let shutdown = CancellationToken::new();
    http::spawn_signal_handler(shutdown.clone());

    let result = match Fixture::bind(&config).await {
        Ok(fixture) => fixture.run(shutdown).await,
        Err(e) => Err(e),
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Fatal error, exiting");
    }
    result
}
