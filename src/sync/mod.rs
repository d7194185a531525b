//! Sync driver.
//!
//! # Data Flow
//! ```text
//! ApplicationMap (snapshot watcher / caller)
//!     → daemon.rs (single-flight, coalesce pending updates)
//!     → cycle.rs (render → install → reload)
//!     → CycleOutcome logged, next update awaited
//! ```

pub mod cycle;
pub mod daemon;

pub use cycle::{CycleOutcome, Stage, SyncPipeline};
pub use daemon::{run_daemon, DaemonReport};

use crate::config::SyncConfig;
use crate::haproxy::{ConfigInstaller, ConfigRenderer, RenderError, ServiceReload};

/// Build the production pipeline from configuration.
pub fn pipeline_from_config(config: &SyncConfig) -> Result<SyncPipeline<ServiceReload>, RenderError> {
    Ok(SyncPipeline::new(
        ConfigRenderer::new()?,
        ConfigInstaller::from_config(&config.haproxy),
        ServiceReload::from_config(&config.reload),
    ))
}
