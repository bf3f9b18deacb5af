// tests/status_reports.rs

use std::sync::Mutex;

use devctl::config::ConfigFile;
use devctl::context::{
    ContextHost, ContextInfo, ContextSpec, HostFuture, HostOp, MemoryHost, PaneSpec,
};
use devctl::errors::DevctlError;
use devctl::report::{ReportOutcome, StatusReport};
use devctl::supervisor::Supervisor;
use devctl::types::{LifecycleState, ReportStatus};
use devctl_test_utils::builders::{single, ConfigFileBuilder, ServiceConfigBuilder};
use devctl_test_utils::fixture::TestRoot;
use devctl_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn config() -> ConfigFile {
    ConfigFileBuilder::new()
        .with_service(
            "web",
            ServiceConfigBuilder::commands()
                .sub("server", "npm start")
                .sub("assets", "npm run watch")
                .build(),
        )
        .with_service("migrate", single("./migrate.sh"))
        .build()
}

fn failing(service: &str, sub: &str) -> StatusReport {
    StatusReport::new(service, sub, ReportStatus::Failing)
}

fn success(service: &str, sub: &str) -> StatusReport {
    StatusReport::new(service, sub, ReportStatus::Success)
}

#[tokio::test]
async fn failing_report_renames_running_context_without_destroying_it() -> TestResult {
    init_tracing();
    let root = TestRoot::new();
    let sup = root.supervisor(config());
    sup.start_service("web", false).await?;
    let before = root.host().context("p-running-web").unwrap();
    root.host().clear_ops();

    let outcome = sup
        .report_status(&failing("web", "server").with_attempt(1))
        .await?;

    assert_eq!(
        outcome,
        ReportOutcome::Renamed {
            from: "p-running-web".to_string(),
            to: "p-failing-web".to_string(),
        }
    );
    let after = root.host().context("p-failing-web").unwrap();
    assert_eq!(after.id, before.id);
    assert!(!root.host().ops().iter().any(|op| matches!(op, HostOp::Kill(_))));
    Ok(())
}

#[tokio::test]
async fn failing_then_success_ends_in_finished_state() -> TestResult {
    init_tracing();
    let root = TestRoot::new();
    let sup = root.supervisor(config());
    sup.start_service("migrate", false).await?;

    sup.report_status(&failing("migrate", "run").with_attempt(1))
        .await?;
    assert_eq!(root.host().names(), vec!["p-failing-migrate"]);

    sup.report_status(&success("migrate", "run").with_attempt(2))
        .await?;
    assert_eq!(root.host().names(), vec!["p-finished-migrate"]);

    let statuses = sup.status(&["migrate".to_string()]).await?;
    assert_eq!(statuses[0].state, Some(LifecycleState::Succeeded));
    assert_eq!(statuses[0].panes, vec!["run:finished"]);
    Ok(())
}

#[tokio::test]
async fn success_report_notifies_without_blocking() -> TestResult {
    init_tracing();
    let root = TestRoot::new();
    let sup = root.supervisor(config());
    sup.start_service("migrate", false).await?;

    sup.report_status(&success("migrate", "run")).await?;

    assert_eq!(
        root.host().notifications(),
        vec!["[devctl] migrate/run exited successfully"]
    );
    Ok(())
}

#[tokio::test]
async fn failing_report_does_not_notify() -> TestResult {
    let root = TestRoot::new();
    let sup = root.supervisor(config());
    sup.start_service("migrate", false).await?;

    sup.report_status(&failing("migrate", "run").with_attempt(3).exhausted())
        .await?;

    assert!(root.host().notifications().is_empty());
    assert_eq!(root.host().names(), vec!["p-failing-migrate"]);
    Ok(())
}

#[tokio::test]
async fn report_retitles_only_the_reporting_pane() -> TestResult {
    init_tracing();
    let root = TestRoot::new();
    let sup = root.supervisor(config());
    sup.start_service("web", false).await?;
    root.host().clear_ops();

    sup.report_status(&failing("web", "server")).await?;

    let ctx = root.host().context("p-failing-web").unwrap();
    let titles: Vec<_> = ctx.panes.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["assets:running", "server:failing"]);
    assert_eq!(
        root.host().ops().last(),
        Some(&HostOp::SetPaneTitle {
            context: "p-failing-web".to_string(),
            pane: 1,
            title: "server:failing".to_string(),
        })
    );
    Ok(())
}

#[tokio::test]
async fn repeated_failing_report_keeps_name() -> TestResult {
    let root = TestRoot::new();
    let sup = root.supervisor(config());
    sup.start_service("migrate", false).await?;
    sup.report_status(&failing("migrate", "run")).await?;
    root.host().clear_ops();

    let outcome = sup.report_status(&failing("migrate", "run")).await?;

    assert_eq!(outcome, ReportOutcome::Unchanged("p-failing-migrate".to_string()));
    assert!(!root
        .host()
        .ops()
        .iter()
        .any(|op| matches!(op, HostOp::Rename { .. })));
    Ok(())
}

#[tokio::test]
async fn report_for_unknown_service_changes_nothing() -> TestResult {
    init_tracing();
    let root = TestRoot::new();
    let sup = root.supervisor(config());
    sup.start_service("web", false).await?;
    root.host().clear_ops();

    let err = sup.report_status(&success("ghost", "run")).await.unwrap_err();

    match err {
        DevctlError::UnknownService(msg) => assert!(msg.starts_with("ghost")),
        other => panic!("Expected UnknownService, got: {other:?}"),
    }
    assert!(root.host().ops().is_empty());
    assert_eq!(root.host().names(), vec!["p-running-web"]);
    Ok(())
}

#[tokio::test]
async fn report_for_stopped_service_is_not_running() -> TestResult {
    let root = TestRoot::new();
    let sup = root.supervisor(config());

    let err = sup.report_status(&failing("web", "server")).await.unwrap_err();

    assert!(matches!(err, DevctlError::NotRunning(ref id) if id == "web"));
    assert!(root.host().ops().is_empty());
    Ok(())
}

#[tokio::test]
async fn report_for_unknown_sub_command_is_rejected() -> TestResult {
    let root = TestRoot::new();
    let sup = root.supervisor(config());
    sup.start_service("web", false).await?;
    root.host().clear_ops();

    let err = sup.report_status(&failing("web", "worker")).await.unwrap_err();

    assert!(matches!(err, DevctlError::ConfigError(_)));
    assert!(root.host().ops().is_empty());
    Ok(())
}

#[test]
fn running_is_not_a_reportable_status() {
    let err = StatusReport::from_args("web", "server", "running", None, false).unwrap_err();
    assert!(matches!(err, DevctlError::ProtocolError(_)));
}

#[tokio::test]
async fn restart_after_success_returns_to_running() -> TestResult {
    let root = TestRoot::new();
    let sup = root.supervisor(config());
    sup.start_service("migrate", false).await?;
    sup.report_status(&success("migrate", "run")).await?;

    sup.start_service("migrate", true).await?;

    assert_eq!(root.host().names(), vec!["p-running-migrate"]);
    let ctx = root.host().context("p-running-migrate").unwrap();
    assert_eq!(ctx.panes[0].title, "run:running");
    Ok(())
}

/// Session in which a sibling sub-command's report lands right after the
/// first lookup of the receiving invocation.
struct SiblingReportHost {
    inner: MemoryHost,
    pending: Mutex<Option<(&'static str, &'static str, usize)>>,
}

impl ContextHost for SiblingReportHost {
    fn list(&self) -> HostFuture<'_, Vec<ContextInfo>> {
        Box::pin(async move {
            let snapshot = self.inner.list().await?;
            let pending = self.pending.lock().unwrap().take();
            if let Some((to, title, pane)) = pending {
                let id = snapshot[0].id.clone();
                self.inner.rename(&id, to).await?;
                self.inner.set_pane_title(&id, pane, title).await?;
            }
            Ok(snapshot)
        })
    }

    fn create(&self, spec: ContextSpec) -> HostFuture<'_, ContextInfo> {
        self.inner.create(spec)
    }

    fn rename<'a>(&'a self, id: &'a str, new_name: &'a str) -> HostFuture<'a, ()> {
        self.inner.rename(id, new_name)
    }

    fn kill<'a>(&'a self, name: &'a str) -> HostFuture<'a, ()> {
        self.inner.kill(name)
    }

    fn set_pane_title<'a>(
        &'a self,
        id: &'a str,
        pane: usize,
        title: &'a str,
    ) -> HostFuture<'a, ()> {
        self.inner.set_pane_title(id, pane, title)
    }

    fn notify<'a>(&'a self, message: &'a str) -> HostFuture<'a, ()> {
        self.inner.notify(message)
    }
}

#[tokio::test]
async fn concurrent_reports_from_sibling_sub_commands_both_apply() -> TestResult {
    init_tracing();
    let root = TestRoot::new();
    let memory = root.host();
    root.supervisor(config()).start_service("web", false).await?;

    let host = SiblingReportHost {
        inner: memory.clone(),
        // `assets` (pane 0) reports failing after our lookup, before our rename.
        pending: Mutex::new(Some(("p-failing-web", "assets:failing", 0))),
    };
    let sup = Supervisor::new(config(), root.paths(), host, root.hook());

    sup.report_status(&failing("web", "server").with_attempt(1))
        .await?;

    assert_eq!(memory.names(), vec!["p-failing-web"]);
    let ctx = memory.context("p-failing-web").unwrap();
    let titles: Vec<_> = ctx.panes.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["assets:failing", "server:failing"]);
    Ok(())
}

#[tokio::test]
async fn report_targets_pane_by_title_not_position() -> TestResult {
    let root = TestRoot::new();
    let host = root.host();
    // Panes listed in a different order than config order.
    host.create(ContextSpec {
        name: "p-running-web".to_string(),
        workdir: root.path().to_path_buf(),
        panes: vec![
            PaneSpec {
                title: "server:running".to_string(),
                command: "sleep 30".to_string(),
            },
            PaneSpec {
                title: "assets:running".to_string(),
                command: "sleep 30".to_string(),
            },
        ],
        log_file: None,
    })
    .await?;
    let sup = root.supervisor(config());

    sup.report_status(&failing("web", "server")).await?;

    let ctx = host.context("p-failing-web").unwrap();
    let titles: Vec<_> = ctx.panes.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["server:failing", "assets:running"]);
    Ok(())
}
