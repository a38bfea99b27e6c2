use anyhow::Context;
use podprobe::config::Config;
use podprobe::runtime::RuntimeProbe;
use podprobe::server::{shutdown_channel, spawn_signal_forwarder, ProbeServer};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Uptime is measured from here
    let probe = Arc::new(RuntimeProbe::new());

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = Arc::new(Config::from_env().context("Invalid configuration")?);

    // Register SIGTERM before binding so an early signal still drains
    let (shutdown_controller, shutdown_signal) = shutdown_channel();
    spawn_signal_forwarder(shutdown_controller).context("Failed to register SIGTERM handler")?;

    let server = ProbeServer::bind(config, probe)
        .await
        .context("Failed to start probe server")?;

    server.run(shutdown_signal).await?;

    info!("Exiting");
    Ok(())
}
