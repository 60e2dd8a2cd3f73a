//! Integration tests for the rebuild pipeline of the development loop.
//!
//! A fake site builder stands in for the real pipeline so that the
//! debounce, gate and notification behaviour can be observed directly.
//! Timing runs on tokio's paused clock.

use async_trait::async_trait;
use cssg_build::BuildReport;
use cssg_cli::dev::{
    BuildExecutor, BuildStatus, BuildTrigger, ClientRegistry, Notification, OutcomeKind,
    RunStatus, SiteBuilder, TriggerDecision,
};
use cssg_cli::error::{CliError, Result};
use cssg_config::{ConfigDiscovery, ConfigHandle, ResolvedConfig};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::{mpsc, Notify};
use tokio::time::{sleep, Duration};

const QUIET: Duration = Duration::from_millis(100);

/// Counts builds; optionally fails or waits for a release signal.
#[derive(Default)]
struct FakeBuilder {
    calls: AtomicUsize,
    fail: bool,
    hold: Option<Arc<Notify>>,
}

impl FakeBuilder {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn held(release: Arc<Notify>) -> Self {
        Self {
            hold: Some(release),
            ..Self::default()
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SiteBuilder for FakeBuilder {
    async fn build(&self, _config: Arc<ResolvedConfig>) -> Result<BuildReport> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(release) = &self.hold {
            release.notified().await;
        }
        if self.fail {
            return Err(CliError::Custom("template exploded".into()));
        }
        Ok(BuildReport::default())
    }
}

fn paths(items: &[&str]) -> BTreeSet<PathBuf> {
    items.iter().map(PathBuf::from).collect()
}

fn executor(builder: Arc<FakeBuilder>) -> Arc<BuildExecutor> {
    let config = ConfigHandle::new(ResolvedConfig::default_for("/site"));
    Arc::new(BuildExecutor::new(config, builder))
}

/// Trigger wired to one registered client; returns the client's inbox.
fn wired(builder: Arc<FakeBuilder>) -> (BuildTrigger, ClientRegistry, mpsc::Receiver<String>) {
    let clients = ClientRegistry::new();
    let (_id, inbox) = clients.register();
    let trigger = BuildTrigger::new(executor(builder), clients.clone(), QUIET);
    (trigger, clients, inbox)
}

fn drain(inbox: &mut mpsc::Receiver<String>) -> Vec<String> {
    let mut messages = Vec::new();
    while let Ok(message) = inbox.try_recv() {
        messages.push(message);
    }
    messages
}

#[tokio::test(start_paused = true)]
async fn test_repeated_stylesheet_change_builds_once_with_style_update() {
    let builder = Arc::new(FakeBuilder::default());
    let (trigger, _clients, mut inbox) = wired(builder.clone());

    assert_eq!(trigger.notify(paths(&["styles/app.css"])), TriggerDecision::Armed);
    sleep(Duration::from_millis(50)).await;
    assert_eq!(trigger.notify(paths(&["styles/app.css"])), TriggerDecision::Armed);

    sleep(Duration::from_millis(500)).await;

    assert_eq!(builder.calls(), 1);
    assert_eq!(
        drain(&mut inbox),
        vec![r#"{"type":"css-update","path":"/styles/app.css"}"#.to_string()]
    );
}

#[tokio::test(start_paused = true)]
async fn test_burst_builds_once_with_union_of_paths() {
    let builder = Arc::new(FakeBuilder::default());
    let (trigger, _clients, mut inbox) = wired(builder.clone());

    for file in ["/site/src/assets/a.css", "/site/src/assets/b.css", "/site/src/assets/c.css"] {
        trigger.notify(paths(&[file]));
        sleep(Duration::from_millis(30)).await;
    }

    sleep(Duration::from_millis(500)).await;

    assert_eq!(builder.calls(), 1);
    assert_eq!(
        drain(&mut inbox),
        vec![
            r#"{"type":"css-update","path":"/assets/a.css"}"#.to_string(),
            r#"{"type":"css-update","path":"/assets/b.css"}"#.to_string(),
            r#"{"type":"css-update","path":"/assets/c.css"}"#.to_string(),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_mixed_change_forces_full_reload() {
    let builder = Arc::new(FakeBuilder::default());
    let (trigger, _clients, mut inbox) = wired(builder.clone());

    trigger.notify(paths(&["/site/src/assets/css/style.css"]));
    sleep(Duration::from_millis(20)).await;
    trigger.notify(paths(&["/site/src/pages/index.jinja"]));

    sleep(Duration::from_millis(500)).await;

    assert_eq!(builder.calls(), 1);
    assert_eq!(drain(&mut inbox), vec!["reload".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_spaced_notifications_each_build() {
    let builder = Arc::new(FakeBuilder::default());
    let (trigger, _clients, mut inbox) = wired(builder.clone());

    for _ in 0..3 {
        trigger.notify(paths(&["/site/src/pages/index.jinja"]));
        sleep(QUIET * 3).await;
    }

    assert_eq!(builder.calls(), 3);
    assert_eq!(drain(&mut inbox).len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_notification_during_build_is_dropped() {
    let release = Arc::new(Notify::new());
    let builder = Arc::new(FakeBuilder::held(release.clone()));
    let (trigger, _clients, mut inbox) = wired(builder.clone());

    trigger.notify(paths(&["/site/src/pages/index.jinja"]));
    sleep(QUIET * 2).await;
    assert_eq!(builder.calls(), 1);
    assert!(trigger.executor().gate().is_busy());

    assert_eq!(
        trigger.notify(paths(&["/site/src/pages/about.jinja"])),
        TriggerDecision::Dropped
    );
    assert!(!trigger.is_pending());

    release.notify_one();
    sleep(QUIET * 3).await;

    assert_eq!(builder.calls(), 1);
    assert!(!trigger.executor().gate().is_busy());
    assert_eq!(drain(&mut inbox), vec!["reload".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_failed_build_sends_nothing_and_reopens_gate() {
    let builder = Arc::new(FakeBuilder::failing());
    let (trigger, _clients, mut inbox) = wired(builder.clone());

    trigger.notify(paths(&["/site/src/pages/index.jinja"]));
    sleep(QUIET * 3).await;

    assert_eq!(builder.calls(), 1);
    assert!(drain(&mut inbox).is_empty());
    assert!(!trigger.executor().gate().is_busy());
    assert_eq!(trigger.executor().status().error(), Some("template exploded"));

    // The next change still rebuilds.
    trigger.notify(paths(&["/site/src/pages/index.jinja"]));
    sleep(QUIET * 3).await;
    assert_eq!(builder.calls(), 2);
}

#[tokio::test]
async fn test_empty_change_set_is_ignored() {
    let builder = Arc::new(FakeBuilder::default());
    let (trigger, _clients, _inbox) = wired(builder);
    assert_eq!(trigger.notify(BTreeSet::new()), TriggerDecision::Ignored);
    assert!(!trigger.is_pending());
}

#[tokio::test]
async fn test_run_while_busy_skips_without_building() {
    let builder = Arc::new(FakeBuilder::default());
    let executor = executor(builder.clone());

    let permit = executor.gate().try_acquire().unwrap();
    let status = executor.run(paths(&["/site/src/pages/index.jinja"])).await;
    assert_eq!(status, RunStatus::Skipped);
    assert_eq!(builder.calls(), 0);

    drop(permit);
    let status = executor.run(paths(&["/site/src/pages/index.jinja"])).await;
    assert!(matches!(
        status,
        RunStatus::Completed(ref outcome) if outcome.kind == OutcomeKind::FullReload
    ));
    assert_eq!(builder.calls(), 1);
}

#[tokio::test]
async fn test_config_change_reloads_before_building() {
    let dir = TempDir::new().unwrap();
    let config_file = dir.path().join("cssg.toml");
    std::fs::write(&config_file, "[site]\ntitle = \"Old\"\n").unwrap();

    let handle = ConfigHandle::new(ConfigDiscovery::new(dir.path()).load().unwrap());
    let builder = Arc::new(FakeBuilder::default());
    let executor = BuildExecutor::new(handle.clone(), builder.clone());

    std::fs::write(&config_file, "[site]\ntitle = \"New\"\n").unwrap();
    let changed: BTreeSet<PathBuf> = [handle.current().config_file.clone()].into();
    let status = executor.run(changed).await;

    assert!(matches!(status, RunStatus::Completed(_)));
    assert_eq!(handle.current().site["title"], "New");
    assert_eq!(builder.calls(), 1);
}

#[tokio::test]
async fn test_broken_config_keeps_previous_and_still_builds() {
    let dir = TempDir::new().unwrap();
    let config_file = dir.path().join("cssg.toml");
    std::fs::write(&config_file, "[site]\ntitle = \"Old\"\n").unwrap();

    let handle = ConfigHandle::new(ConfigDiscovery::new(dir.path()).load().unwrap());
    let builder = Arc::new(FakeBuilder::default());
    let executor = BuildExecutor::new(handle.clone(), builder.clone());

    std::fs::write(&config_file, "[site\ntitle = ").unwrap();
    let changed: BTreeSet<PathBuf> = [handle.current().config_file.clone()].into();
    let status = executor.run(changed).await;

    assert!(matches!(status, RunStatus::Completed(_)));
    assert_eq!(handle.current().site["title"], "Old");
    assert_eq!(builder.calls(), 1);
}

#[tokio::test]
async fn test_broadcast_survives_closed_client() {
    let clients = ClientRegistry::new();
    let (_first, mut rx1) = clients.register();
    let (second, rx2) = clients.register();
    let (_third, mut rx3) = clients.register();
    drop(rx2);

    let delivered = clients.broadcast(&Notification::FullReload);

    assert_eq!(delivered, 2);
    assert_eq!(clients.len(), 2);
    assert!(!clients.unregister(second));
    assert_eq!(rx1.try_recv().unwrap(), "reload");
    assert_eq!(rx3.try_recv().unwrap(), "reload");
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_discards_pending_batch() {
    let builder = Arc::new(FakeBuilder::default());
    let (trigger, _clients, mut inbox) = wired(builder.clone());
    assert_eq!(trigger.quiet_period(), QUIET);

    trigger.notify(paths(&["/site/src/pages/index.jinja", "/site/src/pages/about.jinja"]));
    assert!(trigger.is_pending());

    assert_eq!(trigger.shutdown(), 2);
    assert!(!trigger.is_pending());

    sleep(Duration::from_millis(500)).await;
    assert_eq!(builder.calls(), 0);
    assert!(drain(&mut inbox).is_empty());
    assert_eq!(trigger.shutdown(), 0);
}

#[tokio::test]
async fn test_status_records_full_build_duration() {
    let builder = Arc::new(FakeBuilder::default());
    let executor = executor(builder);

    let RunStatus::Completed(outcome) = executor.run(paths(&["/site/src/pages/index.jinja"])).await
    else {
        panic!("build should complete");
    };

    assert_eq!(
        executor.status(),
        BuildStatus::Success {
            duration: outcome.duration
        }
    );
}
