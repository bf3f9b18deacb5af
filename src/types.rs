// src/types.rs

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::errors::DevctlError;

/// Lifecycle state of a service as encoded in its execution context.
///
/// There is no in-memory store of this value across invocations; it is read
/// back from the session every time via [`crate::context::ContextName`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    Running,
    Succeeded,
    Failing,
}

impl LifecycleState {
    pub const ALL: [LifecycleState; 3] = [
        LifecycleState::Running,
        LifecycleState::Succeeded,
        LifecycleState::Failing,
    ];

    /// Label used inside context names and pane titles.
    pub fn label(self) -> &'static str {
        match self {
            LifecycleState::Running => "running",
            LifecycleState::Succeeded => "finished",
            LifecycleState::Failing => "failing",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for LifecycleState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "running" => Ok(LifecycleState::Running),
            "finished" => Ok(LifecycleState::Succeeded),
            "failing" => Ok(LifecycleState::Failing),
            other => Err(format!(
                "invalid lifecycle state: {other} (expected \"running\", \"finished\" or \"failing\")"
            )),
        }
    }
}

/// Outcome a wrapped sub-command reports back through `project-cmd-status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStatus {
    Success,
    Failing,
}

impl ReportStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportStatus::Success => "success",
            ReportStatus::Failing => "failing",
        }
    }

    /// State the reporting service's context moves to.
    pub fn target_state(self) -> LifecycleState {
        match self {
            ReportStatus::Success => LifecycleState::Succeeded,
            ReportStatus::Failing => LifecycleState::Failing,
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportStatus {
    type Err = DevctlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(ReportStatus::Success),
            "failing" => Ok(ReportStatus::Failing),
            other => Err(DevctlError::ProtocolError(format!(
                "unrecognised status '{other}' (expected \"success\" or \"failing\")"
            ))),
        }
    }
}

/// Parse a duration such as `"500ms"`, `"10s"`, `"2m"` or `"1h"`.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| "duration missing unit suffix".to_string())?;

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;
    let unit = unit_part.trim().to_lowercase();

    let secs_per_unit = match unit.as_str() {
        "ms" => return Ok(Duration::from_millis(value)),
        "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        _ => {
            return Err(format!(
                "unsupported duration unit '{}'; expected ms, s, m, or h",
                unit
            ));
        }
    };
    value
        .checked_mul(secs_per_unit)
        .map(Duration::from_secs)
        .ok_or_else(|| format!("duration '{s}' is too large"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn running_reports_are_a_protocol_error() {
        let err = "running".parse::<ReportStatus>().unwrap_err();
        assert!(matches!(err, DevctlError::ProtocolError(msg) if msg.contains("running")));
    }

    #[test]
    fn success_maps_to_finished_label() {
        let status: ReportStatus = "success".parse().unwrap();
        assert_eq!(status.target_state(), LifecycleState::Succeeded);
        assert_eq!(status.target_state().label(), "finished");
    }

    #[test]
    fn parse_duration_units() {
        assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
        assert_eq!(parse_duration("10s").unwrap(), Duration::from_secs(10));
        assert_eq!(parse_duration("2m").unwrap(), Duration::from_secs(120));
        assert!(parse_duration("10").is_err());
        assert!(parse_duration("3d").is_err());
    }

    #[test]
    fn parse_duration_rejects_overflowing_values() {
        let err = parse_duration(&format!("{}h", u64::MAX / 60)).unwrap_err();
        assert!(err.contains("too large"));
        assert!(parse_duration(&format!("{}m", u64::MAX)).is_err());
        assert_eq!(
            parse_duration(&format!("{}s", u64::MAX)).unwrap(),
            Duration::from_secs(u64::MAX)
        );
    }
}
