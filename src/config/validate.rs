// src/config/validate.rs

use std::collections::BTreeMap;

use crate::config::model::{
    ConfigFile, RawConfigFile, RetryPolicy, Scope, ServiceConfig, ServiceDefinition, SubCommand,
    Workload,
};
use crate::errors::{DevctlError, Result};
use crate::paths::SUPERVISOR_LOG;
use crate::types::parse_duration;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = DevctlError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        ensure_has_services(&raw)?;
        validate_session(&raw)?;
        let retry = validate_retry(&raw)?;

        let mut services = BTreeMap::new();
        for (id, svc) in raw.service.iter() {
            services.insert(id.clone(), validate_service(id, svc)?);
        }

        let mut groups = BTreeMap::new();
        for (id, group) in raw.group.iter() {
            validate_id("group", id)?;
            let mut members: Vec<String> = Vec::with_capacity(group.services.len());
            for member in group.services.iter() {
                if !services.contains_key(member) {
                    return Err(DevctlError::ConfigError(format!(
                        "group '{}' references unknown service '{}'",
                        id, member
                    )));
                }
                if !members.contains(member) {
                    members.push(member.clone());
                }
            }
            groups.insert(
                id.clone(),
                Scope {
                    id: id.clone(),
                    services: members,
                },
            );
        }

        // Startup groups are resolved lazily by the monitor, so unknown ids
        // are reported there rather than here.
        Ok(ConfigFile::new_unchecked(
            raw.session,
            retry,
            raw.tailor,
            raw.startup,
            services,
            groups,
        ))
    }
}

fn ensure_has_services(cfg: &RawConfigFile) -> Result<()> {
    if cfg.service.is_empty() {
        return Err(DevctlError::ConfigError(
            "config must contain at least one [service.<id>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_session(cfg: &RawConfigFile) -> Result<()> {
    if cfg.session.socket.trim().is_empty() || cfg.session.name.trim().is_empty() {
        return Err(DevctlError::ConfigError(
            "[session].socket and [session].name must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_retry(cfg: &RawConfigFile) -> Result<RetryPolicy> {
    let backoff = parse_duration(&cfg.retry.backoff)
        .map_err(|e| DevctlError::ConfigError(format!("[retry].backoff: {e}")))?;
    let max_attempts = match cfg.retry.max_attempts {
        0 => None,
        n => Some(n),
    };
    Ok(RetryPolicy {
        backoff,
        max_attempts,
    })
}

fn validate_service(id: &str, svc: &ServiceConfig) -> Result<ServiceDefinition> {
    validate_id("service", id)?;
    if id == SUPERVISOR_LOG {
        return Err(DevctlError::ConfigError(format!(
            "service id '{id}' is reserved for the supervisor log"
        )));
    }

    let workload = match (&svc.command, &svc.container) {
        (Some(_), Some(_)) => {
            return Err(DevctlError::ConfigError(format!(
                "service '{id}' must define either `command` or `container`, not both"
            )));
        }
        (None, None) => {
            return Err(DevctlError::ConfigError(format!(
                "service '{id}' must define `command` or `container`"
            )));
        }
        (Some(commands), None) => {
            if commands.is_empty() {
                return Err(DevctlError::ConfigError(format!(
                    "service '{id}' has an empty `command` table"
                )));
            }
            let mut subs = Vec::with_capacity(commands.len());
            for (sub_id, cmd) in commands.iter() {
                validate_id("sub-command", sub_id)?;
                if cmd.trim().is_empty() {
                    return Err(DevctlError::ConfigError(format!(
                        "service '{id}' sub-command '{sub_id}' has an empty command"
                    )));
                }
                subs.push(SubCommand {
                    id: sub_id.clone(),
                    cmd: cmd.clone(),
                });
            }
            Workload::Commands(subs)
        }
        (None, Some(container)) => Workload::Container(container.clone()),
    };

    Ok(ServiceDefinition {
        id: id.to_string(),
        workdir: svc.workdir.clone(),
        workload,
    })
}

/// Ids end up in tmux targets and on the report command line.
fn validate_id(kind: &str, id: &str) -> Result<()> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(DevctlError::ConfigError(format!(
            "{kind} id '{id}' may only contain ASCII letters, digits, '-' and '_'"
        )));
    }
    Ok(())
}
