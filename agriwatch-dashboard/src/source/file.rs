//! File-based snapshot source.
//!
//! Reads a snapshot from a JSON file on every poll. Handy for replaying a
//! captured database export offline.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use agriwatch_types::Snapshot;

use super::{ReadError, SnapshotSource};

/// A snapshot source that reads a JSON file.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self { path, description }
    }

    /// Returns the path being read.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SnapshotSource for FileSource {
    async fn read(&self) -> Result<Snapshot, ReadError> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| ReadError::new(format!("Read error: {}", e)))?;

        serde_json::from_str(&content).map_err(|e| ReadError::new(format!("Parse error: {}", e)))
    }

    fn description(&self) -> &str {
        &self.description
    }
}
