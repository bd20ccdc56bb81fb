//! Snapshot - the full current state tree read from the realtime store.

use std::collections::BTreeMap;
use std::fmt;

/// A complete snapshot of the realtime-database state.
///
/// This is the top-level structure returned by one read of the database
/// root. The producers publish under a single `mqtt` node, so that envelope
/// is part of the wire format.
///
/// # Example
///
/// ```rust
/// use agriwatch_types::Snapshot;
///
/// let snapshot = Snapshot::default();
/// assert!(snapshot.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    /// All telemetry streams, grouped under the producers' `mqtt` node.
    #[cfg_attr(feature = "serde", serde(default))]
    pub mqtt: Streams,
}

impl Snapshot {
    /// Check whether no stream carries any record.
    pub fn is_empty(&self) -> bool {
        self.mqtt.is_empty()
    }
}

/// The five telemetry streams, each keyed by an opaque push key.
///
/// Push keys carry no ordering; only the `timestamp` field of each record
/// orders records within a stream.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Streams {
    /// Air temperature readings in degrees Celsius.
    #[cfg_attr(feature = "serde", serde(default))]
    pub temperature: BTreeMap<String, SensorRecord>,

    /// Relative humidity readings.
    #[cfg_attr(feature = "serde", serde(default))]
    pub humidity: BTreeMap<String, SensorRecord>,

    /// Soil moisture readings.
    #[cfg_attr(feature = "serde", serde(default, rename = "soilmoisture"))]
    pub soil_moisture: BTreeMap<String, SensorRecord>,

    /// Reservoir water level readings.
    #[cfg_attr(feature = "serde", serde(default, rename = "waterlevel"))]
    pub water_level: BTreeMap<String, SensorRecord>,

    /// Controller records: camera frame, pump relay state and reason.
    #[cfg_attr(feature = "serde", serde(default))]
    pub controller: BTreeMap<String, ControllerRecord>,
}

impl Streams {
    /// Check whether no stream carries any record.
    pub fn is_empty(&self) -> bool {
        self.temperature.is_empty()
            && self.humidity.is_empty()
            && self.soil_moisture.is_empty()
            && self.water_level.is_empty()
            && self.controller.is_empty()
    }

    /// Access a sensor stream by kind.
    pub fn sensor(&self, kind: SensorKind) -> &BTreeMap<String, SensorRecord> {
        match kind {
            SensorKind::Temperature => &self.temperature,
            SensorKind::Humidity => &self.humidity,
            SensorKind::SoilMoisture => &self.soil_moisture,
            SensorKind::WaterLevel => &self.water_level,
        }
    }
}

/// The four numeric sensor streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    Temperature,
    Humidity,
    SoilMoisture,
    WaterLevel,
}

impl SensorKind {
    /// All sensor kinds, in display order.
    pub const ALL: [SensorKind; 4] = [
        SensorKind::Temperature,
        SensorKind::Humidity,
        SensorKind::SoilMoisture,
        SensorKind::WaterLevel,
    ];

    /// The stream name used on the wire.
    pub fn wire_name(&self) -> &'static str {
        match self {
            SensorKind::Temperature => "temperature",
            SensorKind::Humidity => "humidity",
            SensorKind::SoilMoisture => "soilmoisture",
            SensorKind::WaterLevel => "waterlevel",
        }
    }

    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            SensorKind::Temperature => "Temperature",
            SensorKind::Humidity => "Humidity",
            SensorKind::SoilMoisture => "Soil Moisture",
            SensorKind::WaterLevel => "Water Level",
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single timestamped sensor reading.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SensorRecord {
    /// Epoch milliseconds when the reading was taken.
    pub timestamp: i64,

    /// The measured value.
    pub value: f64,
}

/// A controller record: the latest camera frame and pump relay status.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControllerRecord {
    /// The camera frame as a raw base64 payload.
    pub image_base64: String,

    /// Epoch milliseconds of the last time the pump relay switched on.
    pub last_relay_start_ts: i64,

    /// Why the relay is in its current state (e.g. "soil dry").
    pub relay_reason: String,

    /// Current pump relay state.
    pub relay_state: RelayState,

    /// Epoch milliseconds when this record was published.
    pub timestamp: i64,
}

/// Pump relay state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RelayState {
    On,
    Off,
}

impl RelayState {
    /// Whether the pump is currently running.
    pub fn is_on(&self) -> bool {
        matches!(self, RelayState::On)
    }

    /// Display label, matching the wire spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            RelayState::On => "on",
            RelayState::Off => "off",
        }
    }
}

impl fmt::Display for RelayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
