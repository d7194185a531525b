//! Failure injection tests for the sync pipeline.

use std::fs;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use haproxy_sync::haproxy::{ConfigInstaller, ConfigRenderer, ReloadError, ServiceReload};
use haproxy_sync::sync::{CycleOutcome, Stage, SyncPipeline};

mod common;

use common::RecordingReload;

#[tokio::test]
async fn test_publish_failure_leaves_target_and_skips_reload() {
    let dir = tempfile::tempdir().unwrap();
    let scratch = dir.path().join("scratch");
    fs::create_dir(&scratch).unwrap();

    // The live path is a non-empty directory, so the final rename is refused.
    let target = dir.path().join("haproxy.cfg");
    fs::create_dir(&target).unwrap();
    fs::write(target.join("previous"), "previous config\n").unwrap();

    let pipeline = SyncPipeline::new(
        ConfigRenderer::new().unwrap(),
        ConfigInstaller::new(&target, &scratch),
        RecordingReload::succeeding(),
    );

    let outcome = pipeline.run_cycle(&common::web_map()).await.unwrap();

    assert!(matches!(outcome, CycleOutcome::InstallFailed(_)));
    assert_eq!(outcome.stopped_at(), Stage::Installing);
    assert_eq!(pipeline.reloader().calls(), 0);
    assert_eq!(fs::read_to_string(target.join("previous")).unwrap(), "previous config\n");
    assert_eq!(fs::read_dir(&scratch).unwrap().count(), 0);
}

#[tokio::test]
async fn test_missing_target_directory_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("no-such-dir").join("haproxy.cfg");

    let pipeline = SyncPipeline::new(
        ConfigRenderer::new().unwrap(),
        ConfigInstaller::new(&target, dir.path()),
        RecordingReload::succeeding(),
    );

    match pipeline.run_cycle(&common::web_map()).await.unwrap() {
        CycleOutcome::InstallFailed(e) => assert!(e.to_string().contains("no-such-dir")),
        other => panic!("expected install failure, got {other:?}"),
    }
    assert_eq!(pipeline.reloader().calls(), 0);
    assert!(!target.exists());
}

#[tokio::test]
async fn test_reload_exit_failure_after_install() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("haproxy.cfg");
    fs::write(&target, "previous config\n").unwrap();

    let pipeline = common::pipeline(dir.path(), RecordingReload::exiting_with(1));
    let outcome = pipeline.run_cycle(&common::web_map()).await.unwrap();

    match &outcome {
        CycleOutcome::ReloadFailed(ReloadError::Exit { status, .. }) => assert_eq!(status, "exit status: 1"),
        other => panic!("expected reload failure, got {other:?}"),
    }
    assert_eq!(outcome.terminal_stage(), Stage::Failed);
    assert_eq!(pipeline.reloader().calls(), 1);

    let installed = fs::read_to_string(&target).unwrap();
    assert!(installed.contains("listen web"));
    assert!(installed.contains("  server i1 10.0.0.1:80 check"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_reload_binary_missing() {
    let dir = tempfile::tempdir().unwrap();
    let reload = ServiceReload::new(
        "/nonexistent/sbin/service",
        vec!["haproxy".into(), "reload".into()],
        Duration::from_secs(5),
    );
    let pipeline = common::pipeline(dir.path(), reload);

    let outcome = pipeline.run_cycle(&common::web_map()).await.unwrap();
    assert!(matches!(outcome, CycleOutcome::ReloadFailed(ReloadError::Spawn { .. })));
    assert!(dir.path().join("haproxy.cfg").exists());
}

#[cfg(unix)]
#[tokio::test]
async fn test_real_reload_command_success() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = common::pipeline(dir.path(), ServiceReload::new("true", vec![], Duration::from_secs(5)));

    let outcome = pipeline.run_cycle(&common::web_map()).await.unwrap();
    assert!(outcome.is_success());
    assert_eq!(outcome.terminal_stage(), Stage::Done);
}

#[test]
fn test_concurrent_reader_never_sees_partial_file() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("haproxy.cfg");

    let renderer = ConfigRenderer::new().unwrap();
    let old = renderer.render(&common::mixed_map(200)).unwrap();
    let new = renderer.render(&common::mixed_map(400)).unwrap();
    assert!(new.len() > old.len());
    fs::write(&target, &old).unwrap();

    let stop = Arc::new(AtomicBool::new(false));
    let reader = {
        let stop = stop.clone();
        let target = target.clone();
        let (old, new) = (old.clone(), new.clone());
        std::thread::spawn(move || {
            let mut reads = 0usize;
            loop {
                let seen = fs::read_to_string(&target).expect("target path disappeared");
                assert!(seen == old || seen == new, "observed a partial file of {} bytes", seen.len());
                reads += 1;
                if stop.load(Ordering::SeqCst) {
                    break reads;
                }
            }
        })
    };

    let installer = ConfigInstaller::new(&target, dir.path());
    for i in 0..200 {
        let contents = if i % 2 == 0 { &new } else { &old };
        installer.install(contents).unwrap();
    }
    stop.store(true, Ordering::SeqCst);

    let reads = reader.join().expect("reader observed a partial file");
    assert!(reads > 0);
    assert_eq!(fs::read_to_string(&target).unwrap(), old);
}
