mod location_reading;
mod location_state;

pub use location_reading::LocationReading;
pub use location_state::LocationState;
