//! # agriwatch-dashboard
//!
//! The polling and derivation core of agriwatch. It turns raw realtime
//! snapshots of a smart-irrigation installation into a render-ready
//! dashboard state: latest values per sensor, bounded time-ordered chart
//! series, and a freshness-aware leaf-disease prediction cache.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          Poll loop                           │
//! │  ┌─────────┐    ┌──────────┐    ┌──────────┐   ┌──────────┐ │
//! │  │ source  │───▶│   data   │───▶│   app    │──▶│  watch   │ │
//! │  │ (input) │    │ (derive) │    │ (state)  │   │ channel  │ │
//! │  └─────────┘    └────┬─────┘    └──────────┘   └──────────┘ │
//! │                      │                                       │
//! │                      ▼                                       │
//! │               ┌────────────┐                                 │
//! │               │ classifier │◀── exactly one request per      │
//! │               │  (async)   │    distinct image value         │
//! │               └────────────┘                                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`source`]**: Snapshot source abstraction ([`SnapshotSource`] trait)
//!   with file, channel, database and proxy implementations
//! - **[`data`]**: Pure derivation - latest-value extraction, chart series
//!   building, status banding, and the prediction cache state machine
//! - **[`app`]**: The owned dashboard state, replaced atomically at each
//!   resumption point
//! - **[`poll`]**: The cooperative timer loop driving reads and
//!   classification requests, publishing state on a watch channel
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use agriwatch_adapters::ProxySource;
//! use agriwatch_dashboard::{PollConfig, Poller};
//!
//! # tokio_test::block_on(async {
//! let source = ProxySource::builder()
//!     .base_url("http://localhost:3000")
//!     .build();
//!
//! let poller = Poller::new(Arc::new(source), PollConfig::default());
//! let (handle, mut state) = poller.start();
//!
//! state.changed().await.unwrap();
//! println!("temperature: {}", state.borrow().temperature.latest.value);
//!
//! handle.shutdown().await;
//! # });
//! ```

pub mod app;
pub mod data;
pub mod poll;
pub mod source;

// Re-export main types for convenience
pub use app::{ControllerPanel, Dashboard, DashboardState, SensorPanel};
pub use data::{
    date_range, latest_controller, latest_sensor, series, CacheState, ChartPoint, Classifier,
    LatestReading, PredictionCache, SoilMoistureBand, WaterLevelBand,
};
pub use poll::{PollConfig, PollHandle, Poller, TickPolicy};
pub use source::{ChannelSource, FileSource, ReadError, SnapshotSource};
