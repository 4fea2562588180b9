//! herald - event-driven text-command runtime.
//!
//! Reads commands from stdin and answers on stdout. Logs go to stderr.

use herald::config::Config;
use herald::handlers::spawn_stdin_reader;
use herald::modules::{Builtin, load_builtins};
use herald::{EventBus, metrics};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "herald.toml";

/// Time left for queued output after input closes.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(100);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config_path = std::env::args().nth(1);
    let config = match &config_path {
        Some(path) => Config::load(path)?,
        None if Path::new(DEFAULT_CONFIG).exists() => Config::load(DEFAULT_CONFIG)?,
        None => Config::default(),
    };

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.filter));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);
    if config.log.json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    metrics::init();

    info!(
        config = config_path.as_deref().unwrap_or(DEFAULT_CONFIG),
        keyword_match = ?config.commands.keyword_match,
        "Starting herald"
    );

    let bus = EventBus::new();
    let (supervisor, builtins) = load_builtins(bus.clone(), &config).map_err(|e| {
        error!(error = %e, "Failed to load builtin modules");
        e
    })?;
    let running = supervisor.start().await;

    if builtins.contains(&Builtin::Tty) {
        let input_closed = spawn_stdin_reader(bus)?;
        tokio::select! {
            _ = input_closed => {
                info!("Input closed, shutting down");
                tokio::time::sleep(SHUTDOWN_GRACE).await;
            }
            _ = tokio::signal::ctrl_c() => info!("Interrupted, shutting down"),
        }
    } else {
        tokio::signal::ctrl_c().await?;
        info!("Interrupted, shutting down");
    }

    running.shutdown().await;
    debug!(metrics = %metrics::gather_metrics(), "Final metrics");
    Ok(())
}
