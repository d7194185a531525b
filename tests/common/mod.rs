//! Shared fixtures for pipeline integration tests.
#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use haproxy_sync::discovery::{Application, ApplicationMap, Instance};
use haproxy_sync::haproxy::{ConfigInstaller, ConfigRenderer, ReloadError, ReloadMechanism};
use haproxy_sync::sync::SyncPipeline;

/// Reload fake that counts attempts and optionally fails with a non-zero exit.
#[derive(Default)]
pub struct RecordingReload {
    calls: AtomicUsize,
    exit_code: Option<i32>,
}

impl RecordingReload {
    pub fn succeeding() -> Self {
        Self::default()
    }

    pub fn exiting_with(code: i32) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            exit_code: Some(code),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ReloadMechanism for RecordingReload {
    async fn attempt(&self) -> Result<(), ReloadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.exit_code {
            None => Ok(()),
            Some(code) => Err(ReloadError::Exit {
                command: "service haproxy reload".into(),
                status: format!("exit status: {code}"),
                stderr: "[ALERT] config invalid".into(),
            }),
        }
    }
}

/// Pipeline writing to `<dir>/haproxy.cfg` with scratch files in `dir`.
pub fn pipeline<R: ReloadMechanism>(dir: &Path, reload: R) -> SyncPipeline<R> {
    SyncPipeline::new(
        ConfigRenderer::new().unwrap(),
        ConfigInstaller::new(dir.join("haproxy.cfg"), dir),
        reload,
    )
}

/// `{ "web": {ports:[80], instances:{"i1":{host:"10.0.0.1", ports:[8080]}}} }`
pub fn web_map() -> ApplicationMap {
    let mut apps = ApplicationMap::new();
    apps.insert(
        "web".into(),
        Application::new(vec![80]).with_instance("i1", Instance::new("10.0.0.1", vec![8080])),
    );
    apps
}

/// A map mixing portless apps, slashed ids and varying instance counts.
pub fn mixed_map(size: u16) -> ApplicationMap {
    let mut apps = ApplicationMap::new();
    for i in 0..size {
        let ports = if i % 4 == 0 { vec![] } else { vec![20_000 + i, 30_000 + i] };
        let mut app = Application::new(ports);
        for j in 0..(i % 5) {
            app = app.with_instance(
                format!("app{i}.task{j}"),
                Instance::new(format!("10.{}.{}.{}", i / 250, i % 250, j), vec![31_000 + j]),
            );
        }
        let id = if i % 3 == 0 { format!("/team{i}/svc/api") } else { format!("svc{i}") };
        apps.insert(id, app);
    }
    apps
}
