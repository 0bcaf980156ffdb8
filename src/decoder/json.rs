use crate::decoder::RawFields;
use serde_json::Value;
use thiserror::Error;

/// Decodes a payload as a JSON object. A field that is missing or not a number is reported as absent, a payload
/// that is not a JSON object at all is an error.
pub fn decode_fields(payload: &str) -> Result<RawFields, DecodeError> {
    let value: Value = serde_json::from_str(payload)?;
    let Value::Object(object) = value else {
        return Err(DecodeError::NotAnObject);
    };

    let number = |key: &str| object.get(key).and_then(Value::as_f64);
    Ok(RawFields {
        latitude: number("latitude"),
        longitude: number("longitude"),
        altitude: number("altitude"),
    })
}

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("payload is not a JSON object")]
    NotAnObject,
}
