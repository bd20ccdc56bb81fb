//! Owned dashboard state and snapshot application.
//!
//! The [`Dashboard`] is the single mutator of application state. Each
//! resumption point of the poll loop (a snapshot read completing, a
//! classification response arriving) calls exactly one `apply_*` method,
//! which replaces the derived [`DashboardState`] atomically. There is no
//! ambient mutable state anywhere else.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use agriwatch_adapters::AdapterError;
use agriwatch_types::{
    ControllerRecord, Prediction, RelayState, SensorKind, SensorRecord, Snapshot,
};

use crate::data::{
    format_timestamp, latest_controller, latest_sensor, series, CacheState, ChartPoint,
    LatestReading, PredictionCache, SoilMoistureBand, WaterLevelBand,
};
use crate::source::ReadError;

/// Derived view of one sensor stream: the latest reading plus its series.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SensorPanel {
    pub latest: LatestReading,
    pub series: Vec<ChartPoint>,
}

/// Derived view of the controller stream.
///
/// The image payload itself stays in the prediction cache; the panel only
/// records whether one is present.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerPanel {
    pub relay_state: RelayState,
    pub relay_reason: String,
    /// Formatted `DD/MM/YYYY, HH:MM:SS` label, or `N/A`.
    pub last_relay_start: String,
    pub has_image: bool,
    /// Epoch milliseconds when the record was published.
    pub timestamp: i64,
}

/// The render-ready state handed to the display layer.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub temperature: SensorPanel,
    pub humidity: SensorPanel,
    pub soil_moisture: SensorPanel,
    pub water_level: SensorPanel,
    pub controller: Option<ControllerPanel>,
    pub prediction: Option<Prediction>,
    pub prediction_state: CacheState,
    /// Set while the last snapshot read failed; a blocking condition for
    /// the render layer. Cleared by the next successful read.
    pub read_error: Option<String>,
}

impl DashboardState {
    /// Access a sensor panel by kind.
    pub fn sensor(&self, kind: SensorKind) -> &SensorPanel {
        match kind {
            SensorKind::Temperature => &self.temperature,
            SensorKind::Humidity => &self.humidity,
            SensorKind::SoilMoisture => &self.soil_moisture,
            SensorKind::WaterLevel => &self.water_level,
        }
    }

    /// Water level band for the latest reading.
    pub fn water_level_band(&self) -> WaterLevelBand {
        WaterLevelBand::from_value(self.water_level.latest.value)
    }

    /// Soil moisture band for the latest reading.
    pub fn soil_moisture_band(&self) -> SoilMoistureBand {
        SoilMoistureBand::from_value(self.soil_moisture.latest.value)
    }
}

/// The single mutator of dashboard state.
#[derive(Debug, Default)]
pub struct Dashboard {
    cache: PredictionCache,
    state: DashboardState,
}

impl Dashboard {
    /// Create a dashboard with empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current derived state.
    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Apply a successful snapshot read.
    ///
    /// Re-derives every panel, hands the controller's image to the
    /// prediction cache, and clears any prior read error. Returns the image
    /// payload to classify when the cache decided a request is warranted.
    pub fn apply_snapshot(&mut self, snapshot: &Snapshot) -> Option<String> {
        let streams = &snapshot.mqtt;

        self.state.temperature = sensor_panel(&streams.temperature);
        self.state.humidity = sensor_panel(&streams.humidity);
        self.state.soil_moisture = sensor_panel(&streams.soil_moisture);
        self.state.water_level = sensor_panel(&streams.water_level);

        let controller = latest_controller(&streams.controller);
        self.state.controller = controller.map(controller_panel);

        // An empty payload counts as no image
        let image = controller
            .map(|record| record.image_base64.as_str())
            .filter(|image| !image.is_empty());
        let request = self.cache.observe(image);

        self.state.prediction = self.cache.prediction().cloned();
        self.state.prediction_state = self.cache.state();
        self.state.read_error = None;

        request
    }

    /// Apply a failed snapshot read.
    ///
    /// Sensor panels keep their previous values; only the error marker
    /// changes.
    pub fn apply_read_error(&mut self, error: &ReadError) {
        self.state.read_error = Some(error.to_string());
    }

    /// Apply a classification outcome for `image`.
    ///
    /// A result for a superseded or cleared image is discarded silently. A
    /// failure leaves the cache pending; there is no retry here.
    pub fn apply_classification(&mut self, image: &str, result: Result<Prediction, AdapterError>) {
        match result {
            Ok(prediction) => {
                if self.cache.complete(image, prediction) {
                    self.state.prediction = self.cache.prediction().cloned();
                    self.state.prediction_state = self.cache.state();
                } else {
                    debug!("discarding classification result for superseded image");
                }
            }
            Err(err) => {
                warn!("classification failed: {}", err);
            }
        }
    }
}

fn sensor_panel(stream: &BTreeMap<String, SensorRecord>) -> SensorPanel {
    SensorPanel {
        latest: latest_sensor(stream),
        series: series(stream),
    }
}

fn controller_panel(record: &ControllerRecord) -> ControllerPanel {
    ControllerPanel {
        relay_state: record.relay_state,
        relay_reason: record.relay_reason.clone(),
        last_relay_start: format_timestamp(record.last_relay_start_ts),
        has_image: !record.image_base64.is_empty(),
        timestamp: record.timestamp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agriwatch_types::{PredictionLabel, Probabilities, SensorRecord};

    fn snapshot_with_image(image: &str) -> Snapshot {
        let mut snapshot = Snapshot::default();
        snapshot.mqtt.temperature.insert(
            "a".to_string(),
            SensorRecord { timestamp: 100, value: 20.0 },
        );
        snapshot.mqtt.temperature.insert(
            "b".to_string(),
            SensorRecord { timestamp: 200, value: 22.0 },
        );
        snapshot.mqtt.controller.insert(
            "c".to_string(),
            ControllerRecord {
                image_base64: image.to_string(),
                last_relay_start_ts: 0,
                relay_reason: "soil dry".to_string(),
                relay_state: RelayState::On,
                timestamp: 200,
            },
        );
        snapshot
    }

    fn prediction(label: PredictionLabel) -> Prediction {
        Prediction {
            predict: label,
            probs: Probabilities::default(),
        }
    }

    #[test]
    fn apply_snapshot_derives_panels() {
        let mut dashboard = Dashboard::new();
        let request = dashboard.apply_snapshot(&snapshot_with_image("X"));

        let state = dashboard.state();
        assert_eq!(state.temperature.latest.value, 22.0);
        assert_eq!(state.temperature.latest.timestamp, 200);
        assert_eq!(state.temperature.series.len(), 2);

        let controller = state.controller.as_ref().unwrap();
        assert_eq!(controller.relay_state, RelayState::On);
        assert_eq!(controller.last_relay_start, "N/A");
        assert!(controller.has_image);

        assert_eq!(request, Some("X".to_string()));
        assert_eq!(state.prediction_state, CacheState::Pending);
    }

    #[test]
    fn unchanged_image_requests_once_across_polls() {
        let mut dashboard = Dashboard::new();
        let snapshot = snapshot_with_image("X");

        assert!(dashboard.apply_snapshot(&snapshot).is_some());
        assert!(dashboard.apply_snapshot(&snapshot).is_none());
        assert!(dashboard.apply_snapshot(&snapshot).is_none());
    }

    #[test]
    fn image_change_clears_prediction_and_rerequests() {
        let mut dashboard = Dashboard::new();
        dashboard.apply_snapshot(&snapshot_with_image("X"));
        dashboard.apply_classification("X", Ok(prediction(PredictionLabel::Healthy)));
        assert_eq!(dashboard.state().prediction_state, CacheState::Ready);

        let request = dashboard.apply_snapshot(&snapshot_with_image("Y"));
        assert_eq!(request, Some("Y".to_string()));
        assert!(dashboard.state().prediction.is_none());
        assert_eq!(dashboard.state().prediction_state, CacheState::Pending);
    }

    #[test]
    fn stale_classification_does_not_overwrite() {
        let mut dashboard = Dashboard::new();
        dashboard.apply_snapshot(&snapshot_with_image("X"));
        dashboard.apply_snapshot(&snapshot_with_image("Y"));

        dashboard.apply_classification("X", Ok(prediction(PredictionLabel::Scab)));
        assert!(dashboard.state().prediction.is_none());
        assert_eq!(dashboard.state().prediction_state, CacheState::Pending);
    }

    #[test]
    fn classification_failure_leaves_pending() {
        let mut dashboard = Dashboard::new();
        dashboard.apply_snapshot(&snapshot_with_image("X"));

        dashboard.apply_classification("X", Err(AdapterError::Timeout));
        assert!(dashboard.state().prediction.is_none());
        assert_eq!(dashboard.state().prediction_state, CacheState::Pending);
    }

    #[test]
    fn empty_image_counts_as_absent() {
        let mut dashboard = Dashboard::new();
        let request = dashboard.apply_snapshot(&snapshot_with_image(""));
        assert!(request.is_none());
        assert_eq!(dashboard.state().prediction_state, CacheState::Idle);
        assert!(!dashboard.state().controller.as_ref().unwrap().has_image);
    }

    #[test]
    fn read_error_set_and_cleared() {
        let mut dashboard = Dashboard::new();
        dashboard.apply_snapshot(&snapshot_with_image("X"));

        dashboard.apply_read_error(&ReadError::new("database unreachable"));
        assert_eq!(
            dashboard.state().read_error.as_deref(),
            Some("database unreachable")
        );
        // Previous derivations survive a failed tick
        assert_eq!(dashboard.state().temperature.latest.value, 22.0);

        dashboard.apply_snapshot(&snapshot_with_image("X"));
        assert!(dashboard.state().read_error.is_none());
    }

    #[test]
    fn sensor_accessor_matches_fields() {
        let mut dashboard = Dashboard::new();
        dashboard.apply_snapshot(&snapshot_with_image("X"));

        let state = dashboard.state();
        assert_eq!(state.sensor(SensorKind::Temperature), &state.temperature);
        assert_eq!(state.sensor(SensorKind::Humidity), &state.humidity);
    }

    #[test]
    fn bands_follow_latest_values() {
        let mut snapshot = Snapshot::default();
        snapshot.mqtt.water_level.insert(
            "a".to_string(),
            SensorRecord { timestamp: 100, value: 80.0 },
        );
        snapshot.mqtt.soil_moisture.insert(
            "a".to_string(),
            SensorRecord { timestamp: 100, value: 20.0 },
        );

        let mut dashboard = Dashboard::new();
        dashboard.apply_snapshot(&snapshot);

        assert_eq!(dashboard.state().water_level_band(), WaterLevelBand::High);
        assert_eq!(dashboard.state().soil_moisture_band(), SoilMoistureBand::Dry);
    }

    #[test]
    fn empty_snapshot_yields_zero_readings() {
        let mut dashboard = Dashboard::new();
        dashboard.apply_snapshot(&Snapshot::default());

        let state = dashboard.state();
        assert_eq!(state.humidity.latest, LatestReading::default());
        assert!(state.humidity.series.is_empty());
        assert!(state.controller.is_none());
        assert_eq!(state.prediction_state, CacheState::Idle);
    }
}
