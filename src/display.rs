use crate::domain::LocationState;
use crate::location_cell::LocationCell;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, trace};

pub const WAITING_FOR_DATA: &str = "Waiting for data...";

pub fn render(state: &LocationState) -> String {
    let (latitude, longitude, altitude, has_data) = state.as_tuple();
    if !has_data {
        return WAITING_FOR_DATA.to_string();
    }

    format!("Latitude: {:.6}, Longitude: {:.6}, Altitude: {:.2} m", latitude, longitude, altitude)
}

/// Polls the cell every `period` and shows the reading whenever the rendered text changes.
#[instrument(skip_all)]
pub async fn display(cell: Arc<LocationCell>, period: Duration, shutdown: CancellationToken) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last_rendered = None;

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = shutdown.cancelled() => break,
        }

        let state = cell.snapshot();
        let rendered = render(&state);
        if last_rendered.as_ref() == Some(&rendered) {
            trace!("🖥️ {}", rendered);
            continue;
        }

        let age_ms = state.age(Utc::now()).map(|age| age.num_milliseconds());
        info!(age_ms, "🖥️ {}", rendered);
        last_rendered = Some(rendered);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LocationReading;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn renders_a_waiting_message_without_data() {
        assert_eq!(render(&LocationState::default()), "Waiting for data...");
    }

    #[rstest]
    #[case(LocationReading::new(37.422, -122.084, 5.2), "Latitude: 37.422000, Longitude: -122.084000, Altitude: 5.20 m")]
    #[case(LocationReading::new(1.0, 0.0, 0.0), "Latitude: 1.000000, Longitude: 0.000000, Altitude: 0.00 m")]
    #[case(LocationReading::new(-0.1234567, 179.9999999, -3.456), "Latitude: -0.123457, Longitude: 180.000000, Altitude: -3.46 m")]
    fn renders_a_published_reading(#[case] reading: LocationReading, #[case] expected: &str) {
        let state = LocationState::published(reading, Utc::now());

        assert_eq!(render(&state), expected);
    }

    #[tokio::test]
    async fn display_stops_when_cancelled() {
        let cell = Arc::new(LocationCell::new());
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(display(cell.clone(), Duration::from_millis(5), shutdown.clone()));

        cell.publish(LocationReading::new(1.0, 2.0, 3.0));
        tokio::time::sleep(Duration::from_millis(20)).await;
        shutdown.cancel();

        handle.await.expect("display task panicked");
    }
}
