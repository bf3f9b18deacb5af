// src/report/wire.rs

//! Wire format of a status report.
//!
//! A report is a fresh invocation of the devctl executable:
//!
//! ```text
//! devctl [--config PATH] project-cmd-status <service> <sub-command> <success|failing>
//!        [--attempt N] [--exhausted]
//! ```
//!
//! Delivery is fire-and-forget: nothing acknowledges a report.

use crate::errors::Result;
use crate::types::ReportStatus;

/// Subcommand name the wrapper loop invokes.
pub const REPORT_COMMAND: &str = "project-cmd-status";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub service: String,
    pub sub_command: String,
    pub status: ReportStatus,
    /// 1-based attempt counter maintained by the wrapper loop.
    pub attempt: Option<u32>,
    /// Set on the last failing attempt permitted by the retry policy.
    pub exhausted: bool,
}

impl StatusReport {
    pub fn new(service: impl Into<String>, sub_command: impl Into<String>, status: ReportStatus) -> Self {
        Self {
            service: service.into(),
            sub_command: sub_command.into(),
            status,
            attempt: None,
            exhausted: false,
        }
    }

    /// Build a report from raw command-line values.
    ///
    /// Fails with `ProtocolError` for any status other than `success` or
    /// `failing`.
    pub fn from_args(
        service: &str,
        sub_command: &str,
        status: &str,
        attempt: Option<u32>,
        exhausted: bool,
    ) -> Result<Self> {
        let status: ReportStatus = status.parse()?;
        Ok(Self {
            attempt,
            exhausted,
            ..Self::new(service, sub_command, status)
        })
    }

    pub fn with_attempt(mut self, attempt: u32) -> Self {
        self.attempt = Some(attempt);
        self
    }

    pub fn exhausted(mut self) -> Self {
        self.exhausted = true;
        self
    }
}
