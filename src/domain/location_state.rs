use crate::domain::LocationReading;
use chrono::{DateTime, TimeDelta, Utc};

/// The latest reading together with its freshness.
///
/// A state without `updated_at` has never seen a publish; once a reading has been published the state
/// carries the time of that publish, so `has_data` can never revert.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct LocationState {
    reading: LocationReading,
    updated_at: Option<DateTime<Utc>>,
}

impl LocationState {
    pub fn published(reading: LocationReading, updated_at: DateTime<Utc>) -> Self {
        LocationState {
            reading,
            updated_at: Some(updated_at),
        }
    }

    pub fn reading(&self) -> LocationReading {
        self.reading
    }

    pub fn has_data(&self) -> bool {
        self.updated_at.is_some()
    }

    pub fn age(&self, now: DateTime<Utc>) -> Option<TimeDelta> {
        self.updated_at.map(|updated_at| now.signed_duration_since(updated_at))
    }

    /// Flattened `(latitude, longitude, altitude, has_data)` view for renderers.
    pub fn as_tuple(&self) -> (f64, f64, f64, bool) {
        let reading = self.reading();
        (reading.latitude, reading.longitude, reading.altitude, self.has_data())
    }
}
