// src/report/receiver.rs

//! Receiving side of a status report.

use tracing::{info, warn};

use crate::context::{pane_title, parse_pane_title, ContextHost, ContextName};
use crate::errors::{DevctlError, Result};
use crate::report::wire::StatusReport;
use crate::supervisor::Supervisor;
use crate::types::ReportStatus;

/// What handling a report did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutcome {
    Renamed { from: String, to: String },
    /// The context already carried the target name.
    Unchanged(String),
}

impl<H: ContextHost> Supervisor<H> {
    /// Apply a report to the reporting service's context.
    ///
    /// - `UnknownService` if the service is not in the loaded config.
    /// - `NotRunning` if no context exists for it any more.
    /// - Otherwise the context is renamed to the state the report implies and
    ///   the sub-command's pane is retitled. The context is never destroyed.
    pub async fn report_status(&self, report: &StatusReport) -> Result<ReportOutcome> {
        let service = self.config().service(&report.service).ok_or_else(|| {
            DevctlError::UnknownService(format!(
                "{} (stale report from an obsolete config? check its log file)",
                report.service
            ))
        })?;

        let configured_pane = service.pane_index(&report.sub_command).ok_or_else(|| {
            DevctlError::ConfigError(format!(
                "service '{}' has no sub-command '{}'",
                report.service, report.sub_command
            ))
        })?;

        let current = self
            .service_contexts(&report.service)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DevctlError::NotRunning(report.service.clone()))?;

        // Prefer the pane whose title names the sub-command; fall back to
        // config order for panes retitled by hand.
        let pane = current
            .panes
            .iter()
            .position(|p| {
                parse_pane_title(&p.title).is_some_and(|(sub, _)| sub == report.sub_command)
            })
            .unwrap_or(configured_pane);

        let state = report.status.target_state();
        let target = ContextName::new(state, report.service.as_str()).to_string();

        // Rename and retitle by window id: a sibling sub-command may have
        // renamed the context since it was looked up.
        let outcome = if current.name == target {
            ReportOutcome::Unchanged(target.clone())
        } else {
            self.host().rename(&current.id, &target).await?;
            ReportOutcome::Renamed {
                from: current.name.clone(),
                to: target.clone(),
            }
        };

        self.host()
            .set_pane_title(&current.id, pane, &pane_title(&report.sub_command, state))
            .await?;

        match report.status {
            ReportStatus::Success => {
                info!(
                    service = %report.service,
                    sub_command = %report.sub_command,
                    attempt = ?report.attempt,
                    context = %target,
                    "sub-command exited successfully"
                );
                let message = format!(
                    "[devctl] {}/{} exited successfully",
                    report.service, report.sub_command
                );
                self.host().notify(&message).await?;
            }
            ReportStatus::Failing if report.exhausted => {
                warn!(
                    service = %report.service,
                    sub_command = %report.sub_command,
                    attempt = ?report.attempt,
                    context = %target,
                    "sub-command failed; retry limit reached, giving up"
                );
            }
            ReportStatus::Failing => {
                warn!(
                    service = %report.service,
                    sub_command = %report.sub_command,
                    attempt = ?report.attempt,
                    backoff = ?self.config().retry.backoff,
                    context = %target,
                    "sub-command failed; retrying after backoff"
                );
            }
        }

        Ok(outcome)
    }
}
