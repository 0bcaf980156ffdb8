use crate::domain::{LocationReading, LocationState};
use chrono::Utc;
use tokio::sync::watch;
use tracing::trace;

/// Holds the most recently published reading.
///
/// Every publish swaps in a complete [`LocationState`], so a snapshot is always one whole reading and never a mix of
/// two. Publishers and readers only contend for the duration of a copy.
#[derive(Debug)]
pub struct LocationCell {
    tx: watch::Sender<LocationState>,
}

impl LocationCell {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(LocationState::default());
        LocationCell { tx }
    }

    pub fn publish(&self, reading: LocationReading) {
        trace!(?reading, "📍 Publishing reading");
        self.tx.send_replace(LocationState::published(reading, Utc::now()));
    }

    pub fn snapshot(&self) -> LocationState {
        self.tx.borrow().clone()
    }
}

impl Default for LocationCell {
    fn default() -> Self {
        Self::new()
    }
}
