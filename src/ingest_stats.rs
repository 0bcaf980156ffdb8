//! Counters for the ingestion path.
//!
//! Failures that do not stop ingestion (a payload that could not be persisted, a dropped connection) still need to be
//! visible, so the server records them here in addition to logging them.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct IngestStats {
    messages_received: AtomicU64,
    defaulted_fields: AtomicU64,
    persistence_failures: AtomicU64,
    transport_failures: AtomicU64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IngestStatsSnapshot {
    pub messages_received: u64,
    pub defaulted_fields: u64,
    pub persistence_failures: u64,
    pub transport_failures: u64,
}

impl IngestStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_message(&self) {
        self.messages_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_defaulted_fields(&self, count: usize) {
        self.defaulted_fields.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_persistence_failure(&self) {
        self.persistence_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_transport_failure(&self) {
        self.transport_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> IngestStatsSnapshot {
        IngestStatsSnapshot {
            messages_received: self.messages_received.load(Ordering::Relaxed),
            defaulted_fields: self.defaulted_fields.load(Ordering::Relaxed),
            persistence_failures: self.persistence_failures.load(Ordering::Relaxed),
            transport_failures: self.transport_failures.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn snapshot_reflects_recorded_events() {
        let stats = IngestStats::new();

        stats.record_message();
        stats.record_message();
        stats.record_defaulted_fields(2);
        stats.record_persistence_failure();
        stats.record_transport_failure();

        assert_eq!(
            stats.snapshot(),
            IngestStatsSnapshot {
                messages_received: 2,
                defaulted_fields: 2,
                persistence_failures: 1,
                transport_failures: 1,
            }
        );
    }
}
