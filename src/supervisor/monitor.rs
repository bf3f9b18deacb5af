// src/supervisor/monitor.rs

//! Monitor entry point, log viewer, ad hoc commands and status inspection.

use std::time::Duration;

use tracing::{error, info, warn};

use crate::context::{ContextHost, ContextInfo, ContextName, ContextSpec, PaneSpec};
use crate::errors::{DevctlError, Result};
use crate::paths::touch;
use crate::supervisor::Supervisor;
use crate::types::LifecycleState;

/// Name of the log-viewer context.
pub const TAILOR_CONTEXT: &str = "devctl-logs";

/// How often the idle monitor wakes up.
pub const IDLE_PERIOD: Duration = Duration::from_secs(5);

/// A service's state as read back from the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceStatus {
    pub service: String,
    /// `None` when no context exists.
    pub state: Option<LifecycleState>,
    pub context: Option<String>,
    /// Pane titles, e.g. `run:failing`.
    pub panes: Vec<String>,
}

impl<H: ContextHost> Supervisor<H> {
    /// One-time monitor setup: log files, log viewer, startup manifest.
    ///
    /// Unknown startup scopes are logged; they do not stop the monitor.
    pub async fn monitor_setup(&self) -> Result<()> {
        info!("monitor started");

        self.setup_log_files()?;
        self.restart_tailor().await?;

        let startup = self.scopes().startup_manifest();
        info!(groups = ?startup, "running startup groups");
        match self.start_groups(startup).await {
            Ok(()) => {}
            Err(DevctlError::UnknownScope(ids)) => {
                error!(scopes = %ids, "startup manifest references unknown scopes");
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Run setup, then idle until Ctrl-C so the invoking process (and the
    /// log viewer hosted next to it) stays alive. No supervision happens in
    /// this loop; reports arrive as separate invocations.
    pub async fn monitor(&self) -> Result<()> {
        self.monitor_setup().await?;

        let mut ticker = tokio::time::interval(IDLE_PERIOD);
        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                res = tokio::signal::ctrl_c() => {
                    if let Err(e) = res {
                        warn!(error = %e, "failed to listen for Ctrl+C");
                    }
                    info!("monitor exiting");
                    return Ok(());
                }
            }
        }
    }

    /// Create the logs directory and touch every log file.
    pub fn setup_log_files(&self) -> Result<()> {
        let paths = self.paths();
        paths.ensure_logs_dir()?;
        for id in self.config().service_ids() {
            touch(&paths.service_log(id))?;
        }
        touch(&paths.supervisor_log())?;
        Ok(())
    }

    /// (Re)launch the log-viewer context.
    pub async fn restart_tailor(&self) -> Result<ContextInfo> {
        info!("(re)starting logs");
        let spec = ContextSpec {
            name: TAILOR_CONTEXT.to_string(),
            workdir: self.paths().logs_dir(),
            panes: vec![PaneSpec {
                title: "logs".to_string(),
                command: self.config().tailor.command.clone(),
            }],
            log_file: None,
        };
        self.replace_context(spec).await
    }

    /// Run an ad hoc command in its own context, replacing one of the same name.
    pub async fn run_cmd(&self, name: &str, command: &str) -> Result<ContextInfo> {
        if name.is_empty() || name.contains([':', '.']) || name.starts_with("p-") {
            return Err(DevctlError::ConfigError(format!(
                "invalid context name '{name}' (no ':' or '.', and the 'p-' prefix is reserved)"
            )));
        }
        let spec = ContextSpec {
            name: name.to_string(),
            workdir: self.paths().root().to_path_buf(),
            panes: vec![PaneSpec {
                title: name.to_string(),
                command: command.to_string(),
            }],
            log_file: None,
        };
        self.replace_context(spec).await
    }

    /// Current state of the given services (all when empty).
    pub async fn status(&self, ids: &[String]) -> Result<Vec<ServiceStatus>> {
        let targets: Vec<String> = if ids.is_empty() {
            self.config().service_ids().map(str::to_string).collect()
        } else {
            for id in ids {
                if !self.config().contains_service(id) {
                    return Err(DevctlError::UnknownService(id.clone()));
                }
            }
            ids.to_vec()
        };

        let contexts = self.host().list().await?;
        let statuses = targets
            .into_iter()
            .map(|service| {
                let found = contexts.iter().find_map(|ctx| {
                    ContextName::parse(&ctx.name)
                        .filter(|name| name.service() == service)
                        .map(|name| (name.state(), ctx))
                });
                match found {
                    Some((state, ctx)) => ServiceStatus {
                        service,
                        state: Some(state),
                        context: Some(ctx.name.clone()),
                        panes: ctx.panes.iter().map(|p| p.title.clone()).collect(),
                    },
                    None => ServiceStatus {
                        service,
                        state: None,
                        context: None,
                        panes: Vec::new(),
                    },
                }
            })
            .collect();
        Ok(statuses)
    }

    async fn replace_context(&self, spec: ContextSpec) -> Result<ContextInfo> {
        if self.host().find(&spec.name).await?.is_some() {
            info!(context = %spec.name, "context already running, killing");
            self.host().kill(&spec.name).await?;
        }
        self.host().create(spec).await
    }
}
