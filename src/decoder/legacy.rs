//! Substring-search decoding of the legacy sender format.
//!
//! The sender emits something that looks like a flat JSON object, but nothing about it is validated: a field is
//! found by searching for the literal `"<key>":` and reading the longest decimal literal that follows. Whitespace
//! between the key and the colon, nesting or duplicate keys are not understood. Only the first occurrence counts.
//! Hexadecimal literals and `inf`/`nan` are not recognised: `0x1A` reads as `0`.

use crate::decoder::RawFields;

pub fn decode_fields(payload: &str) -> RawFields {
    RawFields {
        latitude: decode_field(payload, "latitude"),
        longitude: decode_field(payload, "longitude"),
        altitude: decode_field(payload, "altitude"),
    }
}

/// Returns the value following `"<key>":`, or `None` if the key is absent or not followed by a number.
pub fn decode_field(payload: &str, key: &str) -> Option<f64> {
    let needle = format!("\"{}\":", key);
    let start = payload.find(&needle)? + needle.len();
    parse_float_prefix(&payload[start..])
}

/// Parses the longest prefix of `text` (after leading whitespace) that forms a decimal floating point literal.
fn parse_float_prefix(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();

    let mut end = match bytes.first() {
        Some(b'+' | b'-') => 1,
        _ => 0,
    };

    let integer_digits = count_digits(&bytes[end..]);
    end += integer_digits;

    if bytes.get(end) == Some(&b'.') {
        let fraction_digits = count_digits(&bytes[end + 1..]);
        if integer_digits == 0 && fraction_digits == 0 {
            return None;
        }
        end += 1 + fraction_digits;
    } else if integer_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent_end = end + 1;
        if matches!(bytes.get(exponent_end), Some(b'+' | b'-')) {
            exponent_end += 1;
        }

        let exponent_digits = count_digits(&bytes[exponent_end..]);
        if exponent_digits > 0 {
            end = exponent_end + exponent_digits;
        }
    }

    // Out of range literals are rejected like any other unparseable value
    text[..end].parse::<f64>().ok().filter(|value| value.is_finite())
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|byte| byte.is_ascii_digit()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(r#"{"latitude":3.5}"#, Some(3.5))]
    #[case(r#"noise "latitude":3.5 noise"#, Some(3.5))]
    #[case(r#"{"altitude":1,"latitude":3.5,"longitude":7}"#, Some(3.5))]
    #[case(r#"{"latitude":3.5e2}"#, Some(350.0))]
    #[case(r#"{"latitude":-12.25}"#, Some(-12.25))]
    #[case(r#"{"latitude":+4}"#, Some(4.0))]
    #[case(r#"{"latitude":.5}"#, Some(0.5))]
    #[case(r#"{"latitude":5.}"#, Some(5.0))]
    #[case(r#"{"latitude":7e}"#, Some(7.0))]
    #[case(r#"{"latitude":7e+}"#, Some(7.0))]
    #[case(r#"{"latitude":  42.1 }"#, Some(42.1))]
    #[case(r#"{"latitude":0}"#, Some(0.0))]
    #[case(r#"{"latitude":0x1A}"#, Some(0.0))]
    #[case(r#"{"latitude":inf}"#, None)]
    #[case(r#"{"latitude":nan}"#, None)]
    #[case(r#"{"latitude":"3.5"}"#, None)]
    #[case(r#"{"latitude":.}"#, None)]
    #[case(r#"{"latitude":-}"#, None)]
    #[case(r#"{"latitude":}"#, None)]
    #[case(r#"{"latitude":1e999}"#, None)]
    #[case(r#"{"latitude" : 3.5}"#, None)]
    #[case(r#"{"longitude":3.5}"#, None)]
    #[case("", None)]
    fn decodes_latitude(#[case] payload: &str, #[case] expected: Option<f64>) {
        assert_eq!(decode_field(payload, "latitude"), expected);
    }

    #[test]
    fn uses_the_first_occurrence_of_a_key() {
        assert_eq!(decode_field(r#"{"altitude":1.5,"altitude":9}"#, "altitude"), Some(1.5));
    }

    #[test]
    fn does_not_match_a_key_that_only_ends_with_the_name() {
        assert_eq!(decode_field(r#"{"xlatitude":3.5}"#, "latitude"), None);
    }

    #[test]
    fn decodes_all_fields_independently() {
        let fields = decode_fields(r#"{"latitude":37.422,"longitude":"west","altitude":5.2}"#);

        assert_eq!(
            fields,
            RawFields {
                latitude: Some(37.422),
                longitude: None,
                altitude: Some(5.2),
            }
        );
    }
}
