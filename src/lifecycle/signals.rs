//! OS signal handling.
//!
//! - SIGHUP → re-run a cycle with the last known application map
//! - SIGTERM / SIGINT → stop the daemon loop after the current cycle

use tokio::sync::mpsc;

/// Lifecycle events consumed by the sync daemon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// Regenerate, reinstall and reload from the current map.
    Resync,
    /// Stop processing updates.
    Shutdown,
}

/// Forward OS signals as lifecycle events until the receiver goes away.
#[cfg(unix)]
pub fn forward_signals(tx: mpsc::Sender<LifecycleEvent>) -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut hangup = signal(SignalKind::hangup())?;
    let mut terminate = signal(SignalKind::terminate())?;
    let mut interrupt = signal(SignalKind::interrupt())?;

    tokio::spawn(async move {
        loop {
            let event = tokio::select! {
                _ = hangup.recv() => LifecycleEvent::Resync,
                _ = terminate.recv() => LifecycleEvent::Shutdown,
                _ = interrupt.recv() => LifecycleEvent::Shutdown,
            };
            tracing::info!(event = ?event, "Signal received");
            if tx.send(event).await.is_err() || event == LifecycleEvent::Shutdown {
                break;
            }
        }
    });
    Ok(())
}

#[cfg(not(unix))]
pub fn forward_signals(tx: mpsc::Sender<LifecycleEvent>) -> std::io::Result<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received");
            let _ = tx.send(LifecycleEvent::Shutdown).await;
        }
    });
    Ok(())
}
