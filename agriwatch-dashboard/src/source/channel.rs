//! Channel-based snapshot source.
//!
//! Receives snapshots via a tokio watch channel. Useful for tests and for
//! in-process wiring where snapshots are pushed rather than fetched.

use async_trait::async_trait;
use tokio::sync::watch;

use agriwatch_types::Snapshot;

use super::{ReadError, SnapshotSource};

/// A snapshot source fed through a watch channel.
///
/// Every `read()` returns the most recently sent snapshot; the producer
/// replaces the value at its own pace.
///
/// # Example
///
/// ```
/// use agriwatch_dashboard::ChannelSource;
///
/// let (tx, source) = ChannelSource::create("simulator");
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: watch::Receiver<Snapshot>,
    description: String,
}

impl ChannelSource {
    /// Create a new channel source from an existing receiver.
    pub fn new(receiver: watch::Receiver<Snapshot>, source_description: &str) -> Self {
        let description = format!("channel: {}", source_description);
        Self {
            receiver,
            description,
        }
    }

    /// Create a channel pair for feeding snapshots to a ChannelSource.
    ///
    /// Returns (sender, source); the channel starts holding an empty
    /// snapshot.
    pub fn create(source_description: &str) -> (watch::Sender<Snapshot>, Self) {
        let (tx, rx) = watch::channel(Snapshot::default());
        let source = Self::new(rx, source_description);
        (tx, source)
    }
}

#[async_trait]
impl SnapshotSource for ChannelSource {
    async fn read(&self) -> Result<Snapshot, ReadError> {
        Ok(self.receiver.borrow().clone())
    }

    fn description(&self) -> &str {
        &self.description
    }
}
