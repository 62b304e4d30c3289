//! Provider reading a status document from a JSON file.
//!
//! Useful for replaying captured `db.serverStatus()` output, or for pointing
//! the dashboard at a file that another process keeps rewriting.

use std::path::{Path, PathBuf};

use crate::snapshot::StatusSnapshot;

use super::{ProviderError, StatusProvider};

/// Re-reads a JSON file on every fetch.
pub struct FileProvider {
    path: PathBuf,
}

impl FileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StatusProvider for FileProvider {
    fn fetch_status(&mut self) -> Result<StatusSnapshot, ProviderError> {
        let raw = std::fs::read_to_string(&self.path)
            .map_err(|e| ProviderError::Io(format!("{}: {}", self.path.display(), e)))?;
        serde_json::from_str(&raw)
            .map_err(|e| ProviderError::Decode(format!("{}: {}", self.path.display(), e)))
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}
