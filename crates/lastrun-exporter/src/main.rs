//! lastrun-exporter - Prometheus exporter for Puppet's last run summary.
//!
//! Reads `last_run_summary.yaml` on every scrape and serves it as metrics.

mod handlers;
mod state;

use std::path::PathBuf;
use std::process;

use axum::Router;
use axum::routing::get;
use clap::Parser;
use tower_http::compression::CompressionLayer;
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;

use lastrun_core::collector::{RealFs, build_registry};
use lastrun_core::report::ReportLoader;
use lastrun_core::{DEFAULT_NAMESPACE, DEFAULT_REPORT_PATH};

use state::AppState;

// ============================================================
// CLI
// ============================================================

#[derive(Parser)]
#[command(
    name = "lastrun-exporter",
    about = "Prometheus exporter for Puppet's last run summary",
    version = lastrun_core::VERSION
)]
struct Args {
    /// Address on which to expose metrics. A leading ':' listens on all interfaces.
    #[arg(long = "telemetry.address", default_value = ":9309", env = "LASTRUN_LISTEN")]
    listen: String,

    /// Path under which to expose metrics.
    #[arg(
        long = "telemetry.endpoint",
        default_value = "/metrics",
        env = "LASTRUN_ENDPOINT",
        value_parser = parse_endpoint
    )]
    endpoint: String,

    /// Path to the run summary written by the Puppet agent.
    #[arg(long, default_value = DEFAULT_REPORT_PATH, env = "LASTRUN_REPORT")]
    report_path: PathBuf,

    /// Namespace prefixed to every metric name.
    #[arg(long, default_value = DEFAULT_NAMESPACE)]
    namespace: String,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is info level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

/// Endpoint paths must be absolute, literal and must not shadow the health check.
fn parse_endpoint(s: &str) -> Result<String, String> {
    if !s.starts_with('/') {
        return Err(format!("endpoint '{}' must start with '/'", s));
    }
    if s == HEALTH_PATH {
        return Err(format!("endpoint '{}' is reserved", s));
    }
    // The router would read these as captures or wildcards.
    if let Some(c) = s.chars().find(|c| matches!(c, ':' | '*' | '{' | '}')) {
        return Err(format!("endpoint '{}' must not contain '{}'", s, c));
    }
    Ok(s.to_string())
}

/// Expands the `:port` shorthand to all interfaces.
fn listen_addr(raw: &str) -> String {
    if raw.starts_with(':') {
        format!("0.0.0.0{}", raw)
    } else {
        raw.to_string()
    }
}

const HEALTH_PATH: &str = "/health";

// ============================================================
// Main
// ============================================================

/// Initializes the tracing subscriber.
/// `RUST_LOG` takes precedence; otherwise -v/-q pick the level for our crates.
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::default()
            .add_directive(format!("lastrun_exporter={}", level).parse().expect("valid directive"))
            .add_directive(format!("lastrun_core={}", level).parse().expect("valid directive"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn router(state: AppState, endpoint: &str) -> Router {
    Router::new()
        .route(endpoint, get(handlers::handle_metrics))
        .route(HEALTH_PATH, get(handlers::handle_health))
        .with_state(state)
        .layer(CompressionLayer::new())
}

fn main() {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            error!(error = %e, "failed to build tokio runtime");
            process::exit(1);
        }
    };
    runtime.block_on(async_main(args));
}

async fn async_main(args: Args) {
    info!(
        version = lastrun_core::VERSION,
        revision = lastrun_core::REVISION,
        "lastrun-exporter starting"
    );

    let loader = ReportLoader::new(RealFs::new(), &args.report_path);
    let registry = match build_registry(loader, &args.namespace) {
        Ok(registry) => registry,
        Err(e) => {
            error!(namespace = %args.namespace, error = %e, "failed to register collectors");
            process::exit(1);
        }
    };

    let app = router(AppState { registry }, &args.endpoint);

    let addr = listen_addr(&args.listen);
    let listener = match tokio::net::TcpListener::bind(addr.as_str()).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(%addr, error = %e, "failed to bind");
            process::exit(1);
        }
    };
    info!(
        %addr,
        endpoint = %args.endpoint,
        report = %args.report_path.display(),
        "listening"
    );

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "server error");
        process::exit(1);
    }
    info!("shut down");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
