//! Chart series building and timestamp labels.
//!
//! A series is the most recent, time-ordered subset of a stream's records,
//! capped at [`MAX_POINTS`]. Each point carries a short axis label and a
//! full-precision label so the render layer can stay compact without losing
//! detail.
//!
//! Labels are formatted in UTC with integer epoch-millisecond semantics, so
//! derivation is identical on every host.

use std::collections::BTreeMap;

use chrono::{LocalResult, TimeZone, Utc};

use agriwatch_types::SensorRecord;

/// Maximum number of points in a chart series.
pub const MAX_POINTS: usize = 10;

/// Sentinel label for timestamps that are absent or unrepresentable.
const NO_TIMESTAMP: &str = "N/A";

/// One chart-ready point derived from a sensor record.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    /// Compact axis label, `HH:MM:SS`.
    pub time_label: String,
    /// Compact date label, `DD/MM`.
    pub date_label: String,
    /// Full-precision label, `DD/MM/YYYY, HH:MM:SS`.
    pub full_label: String,
    /// The measured value.
    pub value: f64,
    /// Epoch milliseconds backing the labels.
    pub raw_timestamp: i64,
}

/// Build the chart series for a sensor stream.
///
/// All records are sorted ascending by timestamp and the suffix of length
/// `min(MAX_POINTS, n)` is emitted. The sort is stable, so within-snapshot
/// ties keep their key-order position and repeated calls on the same
/// snapshot are identical.
pub fn series(stream: &BTreeMap<String, SensorRecord>) -> Vec<ChartPoint> {
    let mut records: Vec<&SensorRecord> = stream.values().collect();
    records.sort_by_key(|record| record.timestamp);

    records
        .iter()
        .skip(records.len().saturating_sub(MAX_POINTS))
        .map(|record| chart_point(record))
        .collect()
}

/// Summarize the date range a series spans.
///
/// An empty series yields the `"no data"` sentinel.
pub fn date_range(points: &[ChartPoint]) -> String {
    match (points.first(), points.last()) {
        (Some(first), Some(last)) => format!("{} - {}", first.full_label, last.full_label),
        _ => "no data".to_string(),
    }
}

/// Format an epoch-millisecond timestamp as a full `DD/MM/YYYY, HH:MM:SS`
/// label, or `N/A` when absent (zero) or unrepresentable.
pub fn format_timestamp(timestamp_ms: i64) -> String {
    if timestamp_ms == 0 {
        return NO_TIMESTAMP.to_string();
    }
    match Utc.timestamp_millis_opt(timestamp_ms) {
        LocalResult::Single(dt) => dt.format("%d/%m/%Y, %H:%M:%S").to_string(),
        _ => NO_TIMESTAMP.to_string(),
    }
}

fn chart_point(record: &SensorRecord) -> ChartPoint {
    let (time_label, date_label, full_label) = match Utc.timestamp_millis_opt(record.timestamp) {
        LocalResult::Single(dt) => (
            dt.format("%H:%M:%S").to_string(),
            dt.format("%d/%m").to_string(),
            dt.format("%d/%m/%Y, %H:%M:%S").to_string(),
        ),
        _ => (
            NO_TIMESTAMP.to_string(),
            NO_TIMESTAMP.to_string(),
            NO_TIMESTAMP.to_string(),
        ),
    };

    ChartPoint {
        time_label,
        date_label,
        full_label,
        value: record.value,
        raw_timestamp: record.timestamp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(records: &[(i64, f64)]) -> BTreeMap<String, SensorRecord> {
        records
            .iter()
            .enumerate()
            .map(|(i, (timestamp, value))| {
                (
                    format!("k{:02}", i),
                    SensorRecord {
                        timestamp: *timestamp,
                        value: *value,
                    },
                )
            })
            .collect()
    }

    #[test]
    fn series_is_sorted_ascending() {
        let stream = stream(&[(300, 3.0), (100, 1.0), (200, 2.0)]);
        let points = series(&stream);
        let timestamps: Vec<i64> = points.iter().map(|p| p.raw_timestamp).collect();
        assert_eq!(timestamps, vec![100, 200, 300]);
    }

    #[test]
    fn series_caps_at_max_points() {
        let records: Vec<(i64, f64)> = (0..25).map(|i| (i * 1000, i as f64)).collect();
        let points = series(&stream(&records));

        assert_eq!(points.len(), MAX_POINTS);
        // The suffix: the 10 most recent records
        assert_eq!(points.first().unwrap().raw_timestamp, 15_000);
        assert_eq!(points.last().unwrap().raw_timestamp, 24_000);
    }

    #[test]
    fn series_is_idempotent() {
        let stream = stream(&[(100, 1.0), (200, 2.0), (100, 4.0)]);
        assert_eq!(series(&stream), series(&stream));
    }

    #[test]
    fn series_empty_stream() {
        let points = series(&BTreeMap::new());
        assert!(points.is_empty());
        assert_eq!(date_range(&points), "no data");
    }

    #[test]
    fn labels_are_utc() {
        // 2023-11-14T22:13:20Z
        let points = series(&stream(&[(1_700_000_000_000, 21.5)]));
        let point = &points[0];
        assert_eq!(point.time_label, "22:13:20");
        assert_eq!(point.date_label, "14/11");
        assert_eq!(point.full_label, "14/11/2023, 22:13:20");
    }

    #[test]
    fn date_range_spans_first_to_last() {
        let points = series(&stream(&[(1_700_000_000_000, 1.0), (1_700_000_060_000, 2.0)]));
        let range = date_range(&points);
        assert_eq!(range, "14/11/2023, 22:13:20 - 14/11/2023, 22:14:20");
    }

    #[test]
    fn format_timestamp_sentinels() {
        assert_eq!(format_timestamp(0), "N/A");
        assert_eq!(format_timestamp(i64::MAX), "N/A");
        assert_eq!(format_timestamp(1_700_000_000_000), "14/11/2023, 22:13:20");
    }
}
