//! Long-running sync loop.
//!
//! Cycles run strictly one at a time. Map updates that pile up while a cycle
//! is in flight are coalesced: only the newest map is synced, the rest are
//! superseded and skipped.

use tokio::sync::mpsc;
use crate::discovery::model::ApplicationMap;
use crate::haproxy::{ReloadMechanism, RenderError};
use crate::lifecycle::LifecycleEvent;
use crate::sync::cycle::SyncPipeline;

/// What the daemon did before it stopped.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DaemonReport {
    /// Cycles run, successful or not.
    pub cycles: usize,
    /// Cycles that ended with a confirmed reload.
    pub reloads: usize,
    /// Updates skipped because a newer map arrived first.
    pub coalesced: usize,
}

/// Run cycles until shutdown or until the update source goes away.
///
/// `initial`, when present, is synced before any update is awaited. Returns
/// early with the render error if the renderer turns out to be defective.
pub async fn run_daemon<R: ReloadMechanism>(
    pipeline: &SyncPipeline<R>,
    initial: Option<ApplicationMap>,
    mut updates: mpsc::UnboundedReceiver<ApplicationMap>,
    mut events: mpsc::Receiver<LifecycleEvent>,
) -> Result<DaemonReport, RenderError> {
    let mut report = DaemonReport::default();
    let mut current = initial;

    if let Some(apps) = &current {
        sync(pipeline, apps, &mut report).await?;
    }

    loop {
        tokio::select! {
            update = updates.recv() => {
                let Some(mut apps) = update else {
                    tracing::info!("Application map source closed, stopping");
                    break;
                };
                while let Ok(newer) = updates.try_recv() {
                    apps = newer;
                    report.coalesced += 1;
                }
                sync(pipeline, &apps, &mut report).await?;
                current = Some(apps);
            }
            event = events.recv() => match event {
                Some(LifecycleEvent::Resync) => match &current {
                    Some(apps) => sync(pipeline, apps, &mut report).await?,
                    None => tracing::warn!("Resync requested before any application map was received"),
                },
                Some(LifecycleEvent::Shutdown) | None => {
                    tracing::info!("Sync daemon shutting down");
                    break;
                }
            },
        }
    }

    tracing::info!(
        cycles = report.cycles,
        reloads = report.reloads,
        coalesced = report.coalesced,
        "Sync daemon stopped"
    );
    Ok(report)
}

async fn sync<R: ReloadMechanism>(
    pipeline: &SyncPipeline<R>,
    apps: &ApplicationMap,
    report: &mut DaemonReport,
) -> Result<(), RenderError> {
    let outcome = pipeline.run_cycle(apps).await?;
    report.cycles += 1;
    if outcome.is_success() {
        report.reloads += 1;
    }
    Ok(())
}
