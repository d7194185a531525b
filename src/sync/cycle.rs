//! One render → install → reload cycle.
//!
//! # State Machine
//! ```text
//! Idle → Rendering → Installing → Reloading → Done
//!            │            │            │
//!            └────────────┴────────────┴──→ Failed
//! ```
//!
//! A failure at any stage skips every later stage. Install and reload
//! failures are logged and reported as a `CycleOutcome`; the caller simply
//! tries again on the next discovery tick. A render failure means the
//! template is broken and is returned as an error so the process can stop.

use std::fmt;
use std::time::Instant;
use crate::discovery::model::{listener_count, ApplicationMap};
use crate::haproxy::{ConfigInstaller, ConfigRenderer, InstallError, ReloadError, ReloadMechanism, RenderError};
use crate::observability::metrics;

/// Position of a cycle in its state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Rendering,
    Installing,
    Reloading,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Rendering => "rendering",
            Stage::Installing => "installing",
            Stage::Reloading => "reloading",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// How a cycle that got past rendering ended.
#[derive(Debug)]
pub enum CycleOutcome {
    /// New configuration installed and reload confirmed.
    Reloaded,
    /// Configuration not installed; the previous file is still live.
    InstallFailed(InstallError),
    /// Configuration installed but HAProxy was not confirmed to load it.
    ReloadFailed(ReloadError),
}

impl CycleOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CycleOutcome::Reloaded)
    }

    /// Stage the cycle was in when it stopped.
    pub fn stopped_at(&self) -> Stage {
        match self {
            CycleOutcome::Reloaded => Stage::Done,
            CycleOutcome::InstallFailed(_) => Stage::Installing,
            CycleOutcome::ReloadFailed(_) => Stage::Reloading,
        }
    }

    /// Terminal state: `Done` or `Failed`.
    pub fn terminal_stage(&self) -> Stage {
        if self.is_success() {
            Stage::Done
        } else {
            Stage::Failed
        }
    }

    fn metric_label(&self) -> &'static str {
        match self {
            CycleOutcome::Reloaded => "reloaded",
            CycleOutcome::InstallFailed(_) => "install_failed",
            CycleOutcome::ReloadFailed(_) => "reload_failed",
        }
    }
}

/// Drives the three stages for one application map at a time.
pub struct SyncPipeline<R> {
    renderer: ConfigRenderer,
    installer: ConfigInstaller,
    reloader: R,
}

impl<R: ReloadMechanism> SyncPipeline<R> {
    pub fn new(renderer: ConfigRenderer, installer: ConfigInstaller, reloader: R) -> Self {
        Self {
            renderer,
            installer,
            reloader,
        }
    }

    pub fn reloader(&self) -> &R {
        &self.reloader
    }

    /// Run one full cycle for `apps`.
    ///
    /// Never panics on install or reload problems. Returns `Err` only for a
    /// defective renderer.
    pub async fn run_cycle(&self, apps: &ApplicationMap) -> Result<CycleOutcome, RenderError> {
        tracing::debug!(stage = %Stage::Rendering, applications = apps.len(), "Sync cycle started");

        let rendered = match self.renderer.render(apps) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(stage = %Stage::Rendering, error = %e, "Rendering HAProxy config failed");
                metrics::record_cycle("render_failed");
                return Err(e);
            }
        };
        metrics::record_listeners(listener_count(apps));

        tracing::debug!(stage = %Stage::Installing, bytes = rendered.len(), "Installing HAProxy config");
        if let Err(e) = self.installer.install(&rendered) {
            tracing::error!(stage = %Stage::Installing, error = %e, "Couldn't write {}", self.installer.target().display());
            return Ok(self.finish(CycleOutcome::InstallFailed(e)));
        }

        tracing::debug!(stage = %Stage::Reloading, "Reloading HAProxy");
        let started = Instant::now();
        let result = self.reloader.attempt().await;
        metrics::record_reload_duration(started.elapsed());

        let outcome = match result {
            Ok(()) => {
                tracing::info!("HAProxy reloaded");
                CycleOutcome::Reloaded
            }
            Err(e) => {
                tracing::error!(stage = %Stage::Reloading, error = %e, "Failed to reload HAProxy");
                CycleOutcome::ReloadFailed(e)
            }
        };
        Ok(self.finish(outcome))
    }

    fn finish(&self, outcome: CycleOutcome) -> CycleOutcome {
        metrics::record_cycle(outcome.metric_label());
        tracing::debug!(stage = %outcome.terminal_stage(), stopped_at = %outcome.stopped_at(), "Sync cycle finished");
        outcome
    }
}
