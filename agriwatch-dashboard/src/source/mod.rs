//! Snapshot source abstraction.
//!
//! This module provides a trait-based abstraction for reading the current
//! state tree from various backends - the realtime database, the agriwatch
//! proxy, a JSON file, or an in-memory channel.

mod channel;
mod file;

pub use channel::ChannelSource;
pub use file::FileSource;

use std::fmt::Debug;

use async_trait::async_trait;
use thiserror::Error;

use agriwatch_adapters::{AdapterError, FirebaseSource, ProxySource};
use agriwatch_types::Snapshot;

/// Error surfaced when a snapshot read fails.
///
/// A read error blocks the whole render (no partial display), so the
/// classification of the underlying failure matters less than the message;
/// the detail string carries whatever the backend reported.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct ReadError(String);

impl ReadError {
    /// Create a read error with the given detail.
    pub fn new(detail: impl Into<String>) -> Self {
        ReadError(detail.into())
    }
}

impl From<AdapterError> for ReadError {
    fn from(err: AdapterError) -> Self {
        ReadError(err.to_string())
    }
}

/// Trait for reading the current state tree from a backend.
///
/// One operation: `read()` returns the entire current snapshot. Sources are
/// shared with spawned read tasks, so implementations take `&self`.
///
/// # Example
///
/// ```no_run
/// use agriwatch_dashboard::{FileSource, SnapshotSource};
///
/// # tokio_test::block_on(async {
/// let source = FileSource::new("snapshot.json");
/// let snapshot = source.read().await.unwrap();
/// println!("{} streams populated", !snapshot.is_empty() as u8);
/// # });
/// ```
#[async_trait]
pub trait SnapshotSource: Send + Sync + Debug {
    /// Read the entire current state tree.
    async fn read(&self) -> Result<Snapshot, ReadError>;

    /// Returns a human-readable description of the source.
    fn description(&self) -> &str;
}

#[async_trait]
impl SnapshotSource for FirebaseSource {
    async fn read(&self) -> Result<Snapshot, ReadError> {
        Ok(FirebaseSource::read(self).await?)
    }

    fn description(&self) -> &str {
        FirebaseSource::description(self)
    }
}

#[async_trait]
impl SnapshotSource for ProxySource {
    async fn read(&self) -> Result<Snapshot, ReadError> {
        Ok(ProxySource::read(self).await?)
    }

    fn description(&self) -> &str {
        ProxySource::description(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_error_from_adapter_keeps_detail() {
        let err: ReadError = AdapterError::Timeout.into();
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn read_error_display() {
        let err = ReadError::new("database unreachable");
        assert_eq!(err.to_string(), "database unreachable");
    }
}
