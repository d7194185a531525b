//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the sync
//! daemon. All types derive Serde traits for deserialization from TOML.

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

/// Root configuration for haproxy-sync.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SyncConfig {
    /// Where the rendered configuration is installed.
    pub haproxy: HaproxyConfig,

    /// How HAProxy is told to pick up a new configuration.
    pub reload: ReloadConfig,

    /// Where the application map snapshot is read from.
    pub discovery: DiscoveryConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Target and scratch locations for the rendered configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HaproxyConfig {
    /// Live configuration path read by HAProxy.
    pub config_path: PathBuf,

    /// Directory for scratch files. Defaults to the parent of `config_path`
    /// so the final rename stays on one filesystem.
    pub scratch_dir: Option<PathBuf>,
}

impl HaproxyConfig {
    /// Scratch directory actually used for installs.
    pub fn effective_scratch_dir(&self) -> PathBuf {
        if let Some(dir) = &self.scratch_dir {
            return dir.clone();
        }
        match self.config_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => Path::new(".").to_path_buf(),
        }
    }
}

impl Default for HaproxyConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from("/etc/haproxy/haproxy.cfg"),
            scratch_dir: None,
        }
    }
}

/// Reload command configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReloadConfig {
    /// Program to run (e.g., "service" or "systemctl").
    pub program: String,

    /// Arguments passed to the program.
    pub args: Vec<String>,

    /// Kill the reload command if it runs longer than this.
    pub timeout_secs: u64,
}

impl Default for ReloadConfig {
    fn default() -> Self {
        Self {
            program: "service".to_string(),
            args: vec!["haproxy".to_string(), "reload".to_string()],
            timeout_secs: 30,
        }
    }
}

/// Discovery snapshot configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// JSON snapshot written by the discovery collaborator.
    pub snapshot_path: PathBuf,

    /// Poll interval for filesystems without change notifications.
    pub poll_interval_secs: u64,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from("/var/lib/haproxy-sync/applications.json"),
            poll_interval_secs: 2,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9102".to_string(),
        }
    }
}
