//! Loading application map snapshots from disk.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use crate::discovery::model::ApplicationMap;

/// Failure to read or parse a discovery snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse snapshot {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Load an application map from a JSON snapshot file.
pub fn load_snapshot(path: &Path) -> Result<ApplicationMap, SnapshotError> {
    let content = fs::read_to_string(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_snapshot(&content).map_err(|source| SnapshotError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse an application map from JSON text. An empty document is an empty map.
pub fn parse_snapshot(content: &str) -> Result<ApplicationMap, serde_json::Error> {
    if content.trim().is_empty() {
        return Ok(ApplicationMap::new());
    }
    serde_json::from_str(content)
}
