//! Unit conversion from the sensor's imperial units to metric.

use chrono::{DateTime, Utc};
use contracts::{ConvertedRecord, RawReading};

/// Kilometres per mile.
pub const KM_PER_MILE: f32 = 1.60934;

/// `(°F - 32) * 5 / 9`
#[inline]
pub fn fahrenheit_to_celsius(fahrenheit: f32) -> f32 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

/// `mph * 1.60934`
#[inline]
pub fn mph_to_kmh(mph: f32) -> f32 {
    mph * KM_PER_MILE
}

/// Build the downstream record; `capture_time` is the handoff time.
pub fn convert(reading: &RawReading, capture_time: DateTime<Utc>) -> ConvertedRecord {
    ConvertedRecord {
        capture_time,
        temperature_c: fahrenheit_to_celsius(reading.temperature_f),
        wind_speed_kmh: mph_to_kmh(reading.wind_speed_mph),
        humidity: reading.humidity as f32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(temperature_f: f32, wind_speed_mph: f32, humidity: i64) -> RawReading {
        RawReading {
            time: String::new(),
            model: String::new(),
            sensor_id: 0,
            channel: String::new(),
            sequence_num: 0,
            battery: String::new(),
            message_type: 0,
            wind_speed_mph,
            temperature_f,
            humidity,
        }
    }

    #[test]
    fn test_fahrenheit_fixed_points() {
        assert_eq!(fahrenheit_to_celsius(-40.0), -40.0);
        assert_eq!(fahrenheit_to_celsius(41.0), 5.0);
        assert_eq!(fahrenheit_to_celsius(50.0), 10.0);
        assert_eq!(fahrenheit_to_celsius(32.0), 0.0);
    }

    #[test]
    fn test_mph_to_kmh() {
        assert_eq!(mph_to_kmh(1.0), 1.60934);
        assert!((mph_to_kmh(23.0) - 37.01482).abs() < 1e-4);
        assert_eq!(mph_to_kmh(0.0), 0.0);
        assert!(mph_to_kmh(-1.0) < 0.0);
    }

    #[test]
    fn test_convert_record() {
        let now = Utc::now();
        let record = convert(&reading(51.0, 2.654, 70), now);
        assert_eq!(record.capture_time, now);
        assert!((record.temperature_c - 10.56).abs() < 0.01);
        assert!((record.wind_speed_kmh - 4.27).abs() < 0.01);
        assert_eq!(record.humidity, 70.0);
    }
}
