// src/supervisor/lifecycle.rs

//! Start / stop state machine.
//!
//! ```text
//! NotRunning --start--------------> Running
//! Running|Failing --start(restart)-> stop, then Running
//! Running|Failing --stop-----------> NotRunning
//! ```
//!
//! Status reports move a context between names but never remove it.

use tracing::{info, warn};

use crate::config::{ServiceDefinition, Workload};
use crate::context::{pane_title, ContextHost, ContextInfo, ContextName, ContextSpec, PaneSpec};
use crate::errors::{DevctlError, Result};
use crate::report::wrap_sub_command;
use crate::supervisor::Supervisor;
use crate::types::LifecycleState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    Started(ContextInfo),
    /// An existing context was stopped and a fresh one created.
    Restarted(ContextInfo),
    /// A context already exists and no restart was requested.
    AlreadyRunning(String),
    /// Container workloads are reserved and not launched.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopOutcome {
    /// Names of the contexts that were killed.
    Stopped(Vec<String>),
    NotRunning,
}

impl<H: ContextHost> Supervisor<H> {
    /// Start the given services; an empty list means every configured service.
    ///
    /// All ids are checked before anything is started, so an unknown id
    /// aborts the whole call with `UnknownService` and no mutation.
    pub async fn start_services(
        &self,
        ids: &[String],
        restart: bool,
    ) -> Result<Vec<(String, StartOutcome)>> {
        let targets = self.resolve_targets(ids)?;
        info!(services = ?targets, restart, "starting services");
        self.start_targets(&targets, restart).await
    }

    /// Stop the given services; an empty list means every configured service.
    pub async fn stop_services(&self, ids: &[String]) -> Result<Vec<(String, StopOutcome)>> {
        let targets = self.resolve_targets(ids)?;
        info!(services = ?targets, "stopping services");
        self.stop_targets(&targets).await
    }

    /// Start every member of each scope.
    ///
    /// Unknown scopes do not prevent the remaining ones from starting; they
    /// are collected and reported as a single `UnknownScope` error at the end.
    pub async fn start_groups(&self, scopes: &[String]) -> Result<()> {
        let mut unknown = Vec::new();
        for scope in scopes {
            match self.scopes().resolve(scope) {
                Ok(members) => {
                    info!(scope = %scope, services = ?members, "starting scope");
                    self.start_targets(members, false).await?;
                }
                Err(DevctlError::UnknownScope(id)) => {
                    warn!(scope = %id, "no such scope");
                    unknown.push(id);
                }
                Err(e) => return Err(e),
            }
        }
        unknown_scopes(unknown)
    }

    pub async fn stop_groups(&self, scopes: &[String]) -> Result<()> {
        let mut unknown = Vec::new();
        for scope in scopes {
            match self.scopes().resolve(scope) {
                Ok(members) => {
                    info!(scope = %scope, services = ?members, "stopping scope");
                    self.stop_targets(members).await?;
                }
                Err(DevctlError::UnknownScope(id)) => {
                    warn!(scope = %id, "no such scope");
                    unknown.push(id);
                }
                Err(e) => return Err(e),
            }
        }
        unknown_scopes(unknown)
    }

    /// Start one service.
    ///
    /// The existence check and the create are separate host calls; two
    /// concurrent invocations can both pass the check.
    pub async fn start_service(&self, id: &str, restart: bool) -> Result<StartOutcome> {
        let service = self
            .config()
            .service(id)
            .ok_or_else(|| DevctlError::UnknownService(id.to_string()))?;

        if let Workload::Container(_) = service.workload {
            warn!(service = %id, "container workloads are not supported yet; skipping");
            return Ok(StartOutcome::Skipped);
        }

        let existing = self.service_contexts(id).await?;
        let restarted = match existing.first() {
            Some(ctx) if !restart => {
                info!(service = %id, context = %ctx.name, "service already running");
                return Ok(StartOutcome::AlreadyRunning(ctx.name.clone()));
            }
            Some(_) => {
                info!(service = %id, "restarting service");
                self.stop_service(id).await?;
                true
            }
            None => false,
        };

        let spec = self.service_context_spec(service);
        let ctx = self.host().create(spec).await?;
        info!(
            service = %id,
            context = %ctx.name,
            panes = ctx.panes.len(),
            "service started"
        );

        Ok(if restarted {
            StartOutcome::Restarted(ctx)
        } else {
            StartOutcome::Started(ctx)
        })
    }

    /// Stop one service, killing its context under whichever name it carries.
    ///
    /// Stopping a service that is not running only logs.
    pub async fn stop_service(&self, id: &str) -> Result<StopOutcome> {
        if !self.config().contains_service(id) {
            return Err(DevctlError::UnknownService(id.to_string()));
        }

        let mut killed = Vec::new();
        for ctx in self.service_contexts(id).await? {
            self.host().kill(&ctx.name).await?;
            info!(service = %id, context = %ctx.name, "service stopped");
            killed.push(ctx.name);
        }

        if killed.is_empty() {
            info!(service = %id, "service is not running");
            return Ok(StopOutcome::NotRunning);
        }
        Ok(StopOutcome::Stopped(killed))
    }

    /// Context spec for a command service: one wrapped pane per sub-command.
    pub fn service_context_spec(&self, service: &ServiceDefinition) -> ContextSpec {
        let panes = service
            .sub_commands()
            .iter()
            .map(|sub| PaneSpec {
                title: pane_title(&sub.id, LifecycleState::Running),
                command: wrap_sub_command(&self.hook, &service.id, sub, &self.config().retry),
            })
            .collect();

        ContextSpec {
            name: ContextName::running(service.id.as_str()).to_string(),
            workdir: self.paths().workdir(service.workdir.as_deref()),
            panes,
            log_file: Some(self.paths().service_log(&service.id)),
        }
    }

    fn resolve_targets(&self, ids: &[String]) -> Result<Vec<String>> {
        if ids.is_empty() {
            return Ok(self.config().service_ids().map(str::to_string).collect());
        }

        let unknown: Vec<&str> = ids
            .iter()
            .map(String::as_str)
            .filter(|id| !self.config().contains_service(id))
            .collect();
        if !unknown.is_empty() {
            return Err(DevctlError::UnknownService(unknown.join(", ")));
        }
        Ok(ids.to_vec())
    }

    async fn start_targets(
        &self,
        targets: &[String],
        restart: bool,
    ) -> Result<Vec<(String, StartOutcome)>> {
        let mut outcomes = Vec::with_capacity(targets.len());
        for id in targets {
            let outcome = self.start_service(id, restart).await?;
            outcomes.push((id.clone(), outcome));
        }
        Ok(outcomes)
    }

    async fn stop_targets(&self, targets: &[String]) -> Result<Vec<(String, StopOutcome)>> {
        let mut outcomes = Vec::with_capacity(targets.len());
        for id in targets {
            let outcome = self.stop_service(id).await?;
            outcomes.push((id.clone(), outcome));
        }
        Ok(outcomes)
    }
}

fn unknown_scopes(unknown: Vec<String>) -> Result<()> {
    if unknown.is_empty() {
        Ok(())
    } else {
        Err(DevctlError::UnknownScope(unknown.join(", ")))
    }
}
