//! Snapshot file watcher.
//!
//! The discovery collaborator rewrites the snapshot whenever the set of
//! running instances changes. Every change is parsed and forwarded as a fresh
//! `ApplicationMap`; a snapshot that fails to parse is logged and dropped so
//! the last good map stays in effect.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;
use notify::{Watcher, RecursiveMode, Event, RecommendedWatcher, Config};
use tokio::sync::mpsc;
use crate::discovery::model::ApplicationMap;
use crate::discovery::snapshot::load_snapshot;

/// A watcher that monitors the snapshot file for changes.
pub struct SnapshotWatcher {
    path: PathBuf,
    poll_interval: Duration,
    update_tx: mpsc::UnboundedSender<ApplicationMap>,
}

impl SnapshotWatcher {
    /// Create a new SnapshotWatcher.
    ///
    /// Returns the watcher and a receiver for application map updates.
    pub fn new(path: &Path, poll_interval: Duration) -> (Self, mpsc::UnboundedReceiver<ApplicationMap>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (Self {
            path: path.to_path_buf(),
            poll_interval,
            update_tx,
        }, update_rx)
    }

    /// Start watching in a background thread.
    ///
    /// The parent directory is watched rather than the file itself: snapshots
    /// are usually replaced by rename, which would orphan a per-file watch.
    /// The returned watcher must be kept alive for updates to keep flowing.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx.clone();
        let path = self.path.clone();
        let file_name: Option<OsString> = path.file_name().map(|n| n.to_os_string());
        let watch_dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut watcher = RecommendedWatcher::new(move |res: notify::Result<Event>| {
            match res {
                Ok(event) => {
                    if !(event.kind.is_modify() || event.kind.is_create()) {
                        return;
                    }
                    let touches_snapshot = event
                        .paths
                        .iter()
                        .any(|p| p.file_name().map(|n| n.to_os_string()) == file_name);
                    if !touches_snapshot {
                        return;
                    }

                    tracing::debug!(path = ?path, "Snapshot change detected");
                    match load_snapshot(&path) {
                        Ok(apps) => {
                            let _ = tx.send(apps);
                        }
                        Err(e) => {
                            tracing::error!("Failed to load snapshot: {}. Keeping current application map.", e);
                        }
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            }
        }, Config::default().with_poll_interval(self.poll_interval))?;

        watcher.watch(&watch_dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Snapshot watcher started");
        Ok(watcher)
    }
}
