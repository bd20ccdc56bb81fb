//! Latest-value extraction.
//!
//! A stream maps opaque push keys to timestamped records; the latest value
//! is the record with the maximum `timestamp`. Iteration order over the
//! `BTreeMap` is key order, and `max_by_key` keeps the last maximum it
//! sees, so timestamp ties resolve deterministically for a given snapshot.

use std::collections::BTreeMap;

use agriwatch_types::{ControllerRecord, SensorRecord};

/// The most recent reading of a sensor stream.
///
/// An empty stream yields the zero reading `{value: 0, timestamp: 0}`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LatestReading {
    pub value: f64,
    /// Epoch milliseconds; 0 when the stream was empty.
    pub timestamp: i64,
}

/// Scan a sensor stream and return its latest reading.
pub fn latest_sensor(stream: &BTreeMap<String, SensorRecord>) -> LatestReading {
    stream
        .values()
        .max_by_key(|record| record.timestamp)
        .map(|record| LatestReading {
            value: record.value,
            timestamp: record.timestamp,
        })
        .unwrap_or_default()
}

/// Scan the controller stream and return its latest record, if any.
pub fn latest_controller(stream: &BTreeMap<String, ControllerRecord>) -> Option<&ControllerRecord> {
    stream.values().max_by_key(|record| record.timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use agriwatch_types::RelayState;

    fn sensor_stream(records: &[(&str, i64, f64)]) -> BTreeMap<String, SensorRecord> {
        records
            .iter()
            .map(|(key, timestamp, value)| {
                (
                    key.to_string(),
                    SensorRecord {
                        timestamp: *timestamp,
                        value: *value,
                    },
                )
            })
            .collect()
    }

    #[test]
    fn latest_sensor_picks_max_timestamp() {
        let stream = sensor_stream(&[("a", 100, 20.0), ("b", 200, 22.0), ("c", 150, 21.0)]);
        let latest = latest_sensor(&stream);
        assert_eq!(latest.timestamp, 200);
        assert_eq!(latest.value, 22.0);
    }

    #[test]
    fn latest_sensor_empty_stream_is_zero() {
        let stream = BTreeMap::new();
        let latest = latest_sensor(&stream);
        assert_eq!(latest, LatestReading { value: 0.0, timestamp: 0 });
    }

    #[test]
    fn latest_sensor_tie_breaks_deterministically() {
        // Two records share a timestamp; the last one in key order wins,
        // and repeated extraction agrees with itself.
        let stream = sensor_stream(&[("a", 100, 1.0), ("b", 100, 2.0)]);
        let first = latest_sensor(&stream);
        let second = latest_sensor(&stream);
        assert_eq!(first, second);
        assert_eq!(first.value, 2.0);
    }

    #[test]
    fn latest_controller_empty_is_none() {
        let stream: BTreeMap<String, ControllerRecord> = BTreeMap::new();
        assert!(latest_controller(&stream).is_none());
    }

    #[test]
    fn latest_controller_picks_max_timestamp() {
        let mut stream = BTreeMap::new();
        for (key, timestamp) in [("a", 100), ("b", 300), ("c", 200)] {
            stream.insert(
                key.to_string(),
                ControllerRecord {
                    image_base64: format!("img-{}", key),
                    last_relay_start_ts: 0,
                    relay_reason: "manual".to_string(),
                    relay_state: RelayState::Off,
                    timestamp,
                },
            );
        }

        let latest = latest_controller(&stream).unwrap();
        assert_eq!(latest.timestamp, 300);
        assert_eq!(latest.image_base64, "img-b");
    }
}
