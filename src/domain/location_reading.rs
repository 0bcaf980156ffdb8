#[derive(Clone, Copy, Default, Debug, PartialEq)]
pub struct LocationReading {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64, // In meters
}

impl LocationReading {
    pub fn new(latitude: f64, longitude: f64, altitude: f64) -> Self {
        LocationReading {
            latitude,
            longitude,
            altitude,
        }
    }
}
