//! haproxy-sync
//!
//! Regenerates `haproxy.cfg` from the application map published by service
//! discovery, installs it atomically and reloads HAProxy.
//!
//! # Architecture Overview
//!
//! ```text
//!   discovery snapshot (JSON)
//!          │
//!          ▼
//!   ┌─────────────┐   ┌──────────────┐   ┌─────────────┐   ┌─────────────┐
//!   │  discovery  │──▶│    render    │──▶│   install   │──▶│   reload    │
//!   │  watcher    │   │  (template)  │   │ (tmp+rename)│   │ (service …) │
//!   └─────────────┘   └──────────────┘   └─────────────┘   └─────────────┘
//!          ▲                                                      │
//!          │               sync daemon (single-flight)            ▼
//!   SIGHUP / SIGTERM ─────────────────────────────────────▶  log + metrics
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::sync::mpsc;

use haproxy_sync::config::{load_config, SyncConfig};
use haproxy_sync::discovery::snapshot::load_snapshot;
use haproxy_sync::discovery::watcher::SnapshotWatcher;
use haproxy_sync::discovery::ApplicationMap;
use haproxy_sync::haproxy::ConfigRenderer;
use haproxy_sync::lifecycle::forward_signals;
use haproxy_sync::observability::{logging, metrics};
use haproxy_sync::sync::{pipeline_from_config, run_daemon};

#[derive(Parser)]
#[command(name = "haproxy-sync")]
#[command(about = "Sync HAProxy configuration with discovered applications", long_about = None)]
struct Cli {
    /// TOML configuration file (built-in defaults when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single render, install and reload cycle
    Once {
        /// Application map snapshot (defaults to discovery.snapshot_path)
        #[arg(long)]
        apps: Option<PathBuf>,
    },
    /// Print the rendered configuration without installing it
    Render {
        /// Application map snapshot (defaults to discovery.snapshot_path)
        #[arg(long)]
        apps: Option<PathBuf>,
    },
    /// Watch the snapshot and sync on every change
    Watch {
        /// Application map snapshot (defaults to discovery.snapshot_path)
        #[arg(long)]
        apps: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => SyncConfig::default(),
    };

    logging::init_logging(&config.observability.log_level);
    tracing::info!("haproxy-sync v{} starting", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Render { apps } => {
            let apps = load_snapshot(snapshot_path(&config, apps.as_deref()))?;
            print!("{}", ConfigRenderer::new()?.render(&apps)?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Once { apps } => {
            let apps = load_snapshot(snapshot_path(&config, apps.as_deref()))?;
            let pipeline = pipeline_from_config(&config)?;
            let outcome = pipeline.run_cycle(&apps).await?;
            Ok(if outcome.is_success() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Commands::Watch { apps } => {
            let path = snapshot_path(&config, apps.as_deref()).to_path_buf();
            watch(&config, &path).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn snapshot_path<'a>(config: &'a SyncConfig, apps: Option<&'a Path>) -> &'a Path {
    apps.unwrap_or(&config.discovery.snapshot_path)
}

async fn watch(config: &SyncConfig, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let pipeline = pipeline_from_config(config)?;

    let initial: Option<ApplicationMap> = match load_snapshot(path) {
        Ok(apps) => Some(apps),
        Err(e) => {
            tracing::warn!("No initial application map: {}. Waiting for discovery.", e);
            None
        }
    };

    let poll_interval = Duration::from_secs(config.discovery.poll_interval_secs);
    let (watcher, updates) = SnapshotWatcher::new(path, poll_interval);
    let _watcher = watcher.run()?;

    let (event_tx, events) = mpsc::channel(8);
    forward_signals(event_tx)?;

    tracing::info!(
        snapshot = %path.display(),
        target = %config.haproxy.config_path.display(),
        reload = ?config.reload.program,
        "Sync daemon started"
    );

    run_daemon(&pipeline, initial, updates, events).await?;
    Ok(())
}
