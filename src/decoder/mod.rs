mod json;
mod legacy;

use crate::domain::LocationReading;
use serde::Deserialize;
use tracing::debug;

/// Value used for a field that is absent or cannot be parsed.
pub const DEFAULT_VALUE: f64 = 0.0;

#[derive(Clone, Copy, Default, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum PayloadFormat {
    /// Substring search for `"<key>":`, compatible with the original senders.
    #[default]
    Legacy,
    Json,
}

/// Per-field decoding result, `None` meaning absent or unparseable.
#[derive(Clone, Copy, Default, Debug, PartialEq)]
pub struct RawFields {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub altitude: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DecodedReading {
    pub reading: LocationReading,
    /// Fields that were replaced by [`DEFAULT_VALUE`]. Consumers of the reading cannot tell these apart from a
    /// legitimate zero.
    pub defaulted: Vec<&'static str>,
}

impl PayloadFormat {
    pub fn decode(&self, payload: &str) -> DecodedReading {
        let fields = match self {
            PayloadFormat::Legacy => legacy::decode_fields(payload),
            PayloadFormat::Json => json::decode_fields(payload).unwrap_or_else(|e| {
                debug!("Could not decode payload, defaulting all fields: {}", e);
                RawFields::default()
            }),
        };

        fields.into_decoded()
    }
}

impl RawFields {
    fn into_decoded(self) -> DecodedReading {
        let mut defaulted = Vec::new();
        let mut or_default = |value: Option<f64>, name: &'static str| {
            value.unwrap_or_else(|| {
                defaulted.push(name);
                DEFAULT_VALUE
            })
        };

        let reading = LocationReading::new(
            or_default(self.latitude, "latitude"),
            or_default(self.longitude, "longitude"),
            or_default(self.altitude, "altitude"),
        );

        DecodedReading { reading, defaulted }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(PayloadFormat::Legacy)]
    #[case(PayloadFormat::Json)]
    fn decodes_a_complete_payload(#[case] format: PayloadFormat) {
        let decoded = format.decode(r#"{"latitude":37.422,"longitude":-122.084,"altitude":5.2}"#);

        assert_eq!(
            decoded,
            DecodedReading {
                reading: LocationReading::new(37.422, -122.084, 5.2),
                defaulted: vec![],
            }
        );
    }

    #[rstest]
    #[case(PayloadFormat::Legacy)]
    #[case(PayloadFormat::Json)]
    fn defaults_missing_fields_individually(#[case] format: PayloadFormat) {
        let decoded = format.decode(r#"{"latitude":1.0}"#);

        assert_eq!(
            decoded,
            DecodedReading {
                reading: LocationReading::new(1.0, 0.0, 0.0),
                defaulted: vec!["longitude", "altitude"],
            }
        );
    }

    #[rstest]
    #[case(PayloadFormat::Legacy)]
    #[case(PayloadFormat::Json)]
    fn defaults_everything_for_garbage(#[case] format: PayloadFormat) {
        let decoded = format.decode("hello there");

        assert_eq!(decoded.reading, LocationReading::default());
        assert_eq!(decoded.defaulted, vec!["latitude", "longitude", "altitude"]);
    }

    #[test]
    fn legacy_format_tolerates_payloads_that_are_not_json() {
        let decoded = PayloadFormat::Legacy.decode(r#"{"latitude":1.5,"longitude":2.5,"altitude":3.5"#);

        assert_eq!(decoded.reading, LocationReading::new(1.5, 2.5, 3.5));
    }
}
