//! Container watchdog
//!
//! Watches the CPU utilization of one container and restarts another when it
//! exceeds a threshold. Configured entirely through environment variables.

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use watchdog_lib::{monitor::MonitorBuilder, runtime::DockerRuntime, StructuredLogger};

mod config;

const WATCHDOG_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    // Validate configuration before touching the container runtime
    let monitor_config = match config::WatchdogSettings::load()?.into_monitor_config() {
        Ok(monitor_config) => monitor_config,
        Err(e) => {
            error!(error = %e, "Invalid watchdog configuration");
            return Err(e);
        }
    };

    let logger = StructuredLogger::new(
        &monitor_config.tracked_container,
        &monitor_config.restarted_container,
    );
    logger.log_startup(
        WATCHDOG_VERSION,
        monitor_config.interval.as_secs(),
        monitor_config.cpu_threshold,
    );

    let runtime = Arc::new(DockerRuntime::connect()?);

    let monitor = MonitorBuilder::new(monitor_config)
        .runtime(runtime)
        .build()?;

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let monitor_handle = tokio::spawn(monitor.run(shutdown_rx));

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutting down");
    let _ = shutdown_tx.send(());

    let iterations = monitor_handle.await?;
    logger.log_shutdown("SIGINT received", iterations);

    Ok(())
}
