// src/report/wrapper.rs

//! Retry-loop wrapper around every sub-command.
//!
//! The generated POSIX shell loop runs the user command (quoted as a single
//! opaque unit), reports `success` and stops, or reports `failing`, sleeps for
//! the configured backoff and runs it again. With `max_attempts` set, the
//! last permitted failure is reported with `--exhausted` and the loop ends.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;

use crate::config::{RetryPolicy, SubCommand};
use crate::errors::Result;
use crate::paths::ROOT_ENV;
use crate::report::wire::REPORT_COMMAND;
use crate::types::ReportStatus;

/// How a wrapped command calls back into devctl.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportHook {
    pub exe: PathBuf,
    pub root: PathBuf,
    pub config: PathBuf,
}

impl ReportHook {
    pub fn new(exe: impl Into<PathBuf>, root: impl Into<PathBuf>, config: impl Into<PathBuf>) -> Self {
        Self {
            exe: exe.into(),
            root: root.into(),
            config: config.into(),
        }
    }

    /// Hook calling back into the currently running executable.
    pub fn current(root: &Path, config: &Path) -> Result<Self> {
        let exe = std::env::current_exe().context("resolving current executable")?;
        let config = std::path::absolute(config)
            .with_context(|| format!("resolving config path {:?}", config))?;
        Ok(Self::new(exe, root, config))
    }

    fn invocation(&self, service: &str, sub_command: &str, status: ReportStatus) -> String {
        let words = [
            self.exe.to_string_lossy().into_owned(),
            "--config".to_string(),
            self.config.to_string_lossy().into_owned(),
            REPORT_COMMAND.to_string(),
            service.to_string(),
            sub_command.to_string(),
            status.as_str().to_string(),
        ];
        format!("{} --attempt \"$attempt\"", shell_words::join(words))
    }
}

/// Render the retry loop for one sub-command of `service`.
pub fn wrap_sub_command(
    hook: &ReportHook,
    service: &str,
    sub: &SubCommand,
    policy: &RetryPolicy,
) -> String {
    let success = hook.invocation(service, &sub.id, ReportStatus::Success);
    let failing = hook.invocation(service, &sub.id, ReportStatus::Failing);

    let mut lines = vec![
        format!(
            "export {ROOT_ENV}={}",
            shell_words::quote(&hook.root.to_string_lossy())
        ),
        "attempt=0".to_string(),
        "while :; do".to_string(),
        "  attempt=$((attempt + 1))".to_string(),
        format!("  if sh -c {}; then", shell_words::quote(&sub.cmd)),
        format!("    {success}"),
        "    break".to_string(),
        "  fi".to_string(),
    ];

    if let Some(max) = policy.max_attempts {
        lines.push(format!("  if [ \"$attempt\" -ge {max} ]; then"));
        lines.push(format!("    {failing} --exhausted"));
        lines.push("    break".to_string());
        lines.push("  fi".to_string());
    }

    lines.push(format!("  {failing}"));
    lines.push(format!("  sleep {}", shell_seconds(policy.backoff)));
    lines.push("done".to_string());

    lines.join("\n")
}

/// Render a duration as an argument for `sleep`.
fn shell_seconds(d: Duration) -> String {
    match d.subsec_millis() {
        0 => d.as_secs().to_string(),
        ms => format!("{}.{:03}", d.as_secs(), ms),
    }
}
