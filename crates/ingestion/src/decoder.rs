//! Record decoder: one line of JSON in, one `RawReading` out.

use contracts::RawReading;

use crate::error::DecodeError;

/// Parse a single input line into a [`RawReading`].
///
/// Trailing `\r`/`\n` are ignored. Unknown fields are ignored; the measurement
/// fields (`wind_speed_mph`, `temperature_F`, `humidity`) are required.
pub fn decode_line(line: &str) -> Result<RawReading, DecodeError> {
    let trimmed = line.trim_end_matches(['\r', '\n']);
    serde_json::from_str(trimmed).map_err(|e| DecodeError::Malformed {
        line: trimmed.to_string(),
        message: e.to_string(),
    })
}

/// Decode raw bytes, rejecting input that is not UTF-8.
pub fn decode_bytes(bytes: &[u8]) -> Result<RawReading, DecodeError> {
    let line = std::str::from_utf8(bytes).map_err(|e| DecodeError::InvalidUtf8 {
        line: String::from_utf8_lossy(bytes).into_owned(),
        message: e.to_string(),
    })?;
    decode_line(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{"time" : "2018-12-22 16:31:14", "model" : "Acurite 3n1 sensor", "sensor_id" : 2618, "channel" : "A", "sequence_num" : 3, "battery" : "LOW", "message_type" : 32, "wind_speed_mph" : 2.654, "temperature_F" : 51.000, "humidity" : 70}"#;

    #[test]
    fn test_decode_full_line() {
        let reading = decode_line(SAMPLE).unwrap();
        assert_eq!(reading.time, "2018-12-22 16:31:14");
        assert_eq!(reading.model, "Acurite 3n1 sensor");
        assert_eq!(reading.sensor_id, 2618);
        assert_eq!(reading.channel, "A");
        assert_eq!(reading.sequence_num, 3);
        assert_eq!(reading.battery, "LOW");
        assert_eq!(reading.message_type, 32);
        assert_eq!(reading.wind_speed_mph, 2.654);
        assert_eq!(reading.temperature_f, 51.0);
        assert_eq!(reading.humidity, 70);
    }

    #[test]
    fn test_decode_trailing_newline() {
        let line = format!("{SAMPLE}\r\n");
        assert!(decode_line(&line).is_ok());
    }

    #[test]
    fn test_decode_not_json() {
        let err = decode_line("garbage {").unwrap_err();
        assert!(matches!(err, DecodeError::Malformed { .. }));
        assert_eq!(err.line(), "garbage {");
    }

    #[test]
    fn test_decode_type_mismatch() {
        let line = r#"{"wind_speed_mph": "fast", "temperature_F": 51.0, "humidity": 70}"#;
        assert!(decode_line(line).is_err());
    }

    #[test]
    fn test_decode_missing_measurement() {
        let line = r#"{"model": "Acurite 3n1 sensor", "wind_speed_mph": 2.0, "humidity": 70}"#;
        let err = decode_line(line).unwrap_err();
        assert!(err.to_string().contains("temperature_F"));
    }

    #[test]
    fn test_decode_integer_speed_accepted() {
        let line = r#"{"wind_speed_mph": 0, "temperature_F": 32, "humidity": 90}"#;
        let reading = decode_line(line).unwrap();
        assert_eq!(reading.wind_speed_mph, 0.0);
        assert_eq!(reading.temperature_f, 32.0);
    }

    #[test]
    fn test_decode_invalid_utf8() {
        let err = decode_bytes(&[0x7b, 0xff, 0xfe, 0x7d]).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidUtf8 { .. }));
    }
}
