use crate::decoder::PayloadFormat;
use crate::ingest_stats::IngestStats;
use crate::location_cell::LocationCell;
use crate::location_log::LocationLog;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Acknowledgement sent for every request, whatever its content.
pub const REPLY: &str = "OK";

/// Handles a single request: decode, persist, publish, and produce the reply.
pub struct Ingestor {
    cell: Arc<LocationCell>,
    log: Arc<dyn LocationLog>,
    stats: Arc<IngestStats>,
    format: PayloadFormat,
}

impl Ingestor {
    pub fn new(cell: Arc<LocationCell>, log: Arc<dyn LocationLog>, stats: Arc<IngestStats>, format: PayloadFormat) -> Self {
        Ingestor { cell, log, stats, format }
    }

    pub fn stats(&self) -> &Arc<IngestStats> {
        &self.stats
    }

    /// The raw bytes are what gets persisted; decoding works on a lossy UTF-8 view of them.
    #[instrument(skip_all)]
    pub async fn handle(&self, payload: &[u8]) -> &'static str {
        self.stats.record_message();
        let text = String::from_utf8_lossy(payload);
        debug!(payload = %text, "📨 Received payload");

        let decoded = self.format.decode(&text);
        if !decoded.defaulted.is_empty() {
            debug!(fields = ?decoded.defaulted, "Defaulted missing or malformed field(s) to 0.0");
            self.stats.record_defaulted_fields(decoded.defaulted.len());
        }

        if let Err(e) = self.log.append(payload).await {
            self.stats.record_persistence_failure();
            warn!("⚠️ Could not persist payload: {}", e);
        }

        self.cell.publish(decoded.reading);
        REPLY
    }
}
