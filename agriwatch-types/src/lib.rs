//! # agriwatch-types
//!
//! Wire types for agriwatch smart-irrigation telemetry. This crate defines the
//! schema shared by the sensor/camera producers and the monitoring consumers:
//! the realtime-database snapshot tree, the per-stream records, and the
//! leaf-disease prediction result.
//!
//! ## Design Goals
//!
//! - **Zero required dependencies**: the types work without any serialization
//!   framework
//! - **Optional serialization**: enable the `serde` feature for JSON
//! - **Timestamp-ordered**: record keys are opaque push keys; only the integer
//!   epoch-millisecond `timestamp` field orders records within a stream
//!
//! ## Example
//!
//! ```rust
//! use agriwatch_types::{SensorKind, SensorRecord, Snapshot};
//!
//! let mut snapshot = Snapshot::default();
//! snapshot.mqtt.temperature.insert(
//!     "-OaK3f".to_string(),
//!     SensorRecord { timestamp: 1_700_000_000_000, value: 21.5 },
//! );
//!
//! let stream = snapshot.mqtt.sensor(SensorKind::Temperature);
//! assert_eq!(stream.len(), 1);
//! ```

mod prediction;
mod snapshot;

pub use prediction::*;
pub use snapshot::*;
