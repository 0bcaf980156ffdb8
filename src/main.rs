use crate::app_config::AppConfig;
use crate::display::display;
use crate::ingest_stats::IngestStats;
use crate::location_cell::LocationCell;
use crate::location_log::AppendFileLog;
use crate::server::{Ingestor, Server, ZmqTransport};
use std::sync::Arc;
use tokio::{signal, task};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

mod app_config;
mod decoder;
mod display;
mod domain;
mod ingest_stats;
mod location_cell;
mod location_log;
mod server;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    tracing_subscriber::fmt().with_max_level(config.log_level()?).init();

    info!("🪵 Starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    info!("✅  Loaded configuration");

    let cell = Arc::new(LocationCell::new());
    let stats = Arc::new(IngestStats::new());
    let location_log = Arc::new(AppendFileLog::new(config.location_log().path()));
    info!("✅  Appending payloads to '{}'", location_log.path().display());

    let shutdown = CancellationToken::new();

    task::spawn(display(cell.clone(), config.display().interval(), shutdown.clone()));
    info!("✅  Initialized display");

    let signal_shutdown = shutdown.clone();
    task::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                info!("🛑 Received shutdown signal");
                signal_shutdown.cancel();
            }
            Err(e) => warn!("⚠️ Unable to listen for the shutdown signal: {}", e),
        }
    });

    let ingestor = Ingestor::new(cell, location_log, stats.clone(), config.decoder().format());
    let server = Server::new(ingestor, config.server().listen_config(), Box::new(ZmqTransport));

    info!("🔥 {} is up and running", env!("CARGO_PKG_NAME"));
    let result = server.listen(shutdown.clone()).await;
    shutdown.cancel();

    let stats = stats.snapshot();
    info!(
        messages_received = stats.messages_received,
        defaulted_fields = stats.defaulted_fields,
        persistence_failures = stats.persistence_failures,
        transport_failures = stats.transport_failures,
        "👋 Stopped {}",
        env!("CARGO_PKG_NAME")
    );

    result?;
    Ok(())
}
