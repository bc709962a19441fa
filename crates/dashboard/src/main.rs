//! `jobwatch` -- live terminal dashboard for the ingestion job pipeline.
//!
//! Connects to the ingestion service's dashboard WebSocket, mirrors
//! every job it reports, and redraws a four-column board (pending,
//! processing, completed, failed) plus the streamed server log on
//! every change. Reconnects indefinitely with capped backoff.
//!
//! Type `inspect <job_id>` to open a job's full record, `close` to
//! dismiss it and `quit` (or Ctrl-C) to exit. See
//! [`DashboardConfig::from_env`] for the environment variables.

use jobwatch_client::client::DashboardClient;
use jobwatch_client::connection::ConnectionManager;
use jobwatch_client::dashboard::Dashboard;
use jobwatch_client::endpoint::dashboard_endpoint;
use jobwatch_dashboard::commands::spawn_stdin_reader;
use jobwatch_dashboard::config::DashboardConfig;
use jobwatch_dashboard::terminal::TerminalSurface;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Buffered operator commands.
const COMMAND_CHANNEL_CAPACITY: usize = 32;

// All dashboard state lives on one thread; the runtime never moves it.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenvy::dotenv().ok();

    // Logs go to stderr so they do not tear the board on stdout.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jobwatch=info,jobwatch_dashboard=info,jobwatch_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = DashboardConfig::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    });

    let url = dashboard_endpoint(&config.origin).unwrap_or_else(|e| {
        tracing::error!(error = %e, origin = %config.origin, "Cannot derive dashboard endpoint");
        std::process::exit(1);
    });

    tracing::info!(
        url = %url,
        initial_delay_ms = config.reconnect.initial_delay.as_millis() as u64,
        max_delay_ms = config.reconnect.max_delay.as_millis() as u64,
        log_capacity = config.log_capacity,
        "Starting jobwatch",
    );

    let cancel = CancellationToken::new();

    let (manager, events) =
        ConnectionManager::spawn(DashboardClient::new(url), config.reconnect.clone(), cancel.clone());

    let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
    // Blocking stdin stays off the runtime so shutdown never waits on a read.
    if let Err(e) = spawn_stdin_reader(command_tx, cancel.clone()) {
        tracing::warn!(error = %e, "Cannot read commands from stdin; only Ctrl-C will stop jobwatch");
    }

    let ctrl_c_cancel = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Interrupt received");
                ctrl_c_cancel.cancel();
            }
            Err(e) => tracing::warn!(error = %e, "Cannot listen for Ctrl-C"),
        }
    });

    let surface = TerminalSurface::new(std::io::stdout(), true);
    Dashboard::new(surface, config.log_capacity)
        .run(events, command_rx, cancel)
        .await;

    manager.shutdown().await;
    tracing::info!("jobwatch stopped");
}
