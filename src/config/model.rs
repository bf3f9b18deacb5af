// src/config/model.rs

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

/// Top-level configuration as read from `devctl.toml`.
///
/// ```toml
/// [startup]
/// groups = ["core"]
///
/// [service.web]
/// workdir = "web"
/// [service.web.command]
/// run = "npm start"
///
/// [service.db]
/// container = {}
///
/// [group.core]
/// services = ["web", "db"]
/// ```
///
/// Every section is optional; validation rejects a document without services.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub session: SessionSection,

    #[serde(default)]
    pub retry: RetrySection,

    #[serde(default)]
    pub tailor: TailorSection,

    #[serde(default)]
    pub startup: StartupSection,

    /// Keys are service ids.
    #[serde(default)]
    pub service: BTreeMap<String, ServiceConfig>,

    /// Keys are scope (group) ids.
    #[serde(default)]
    pub group: BTreeMap<String, GroupConfig>,
}

/// `[session]`: which tmux server and session host the contexts.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SessionSection {
    #[serde(default = "default_socket")]
    pub socket: String,

    #[serde(default = "default_session_name")]
    pub name: String,
}

fn default_socket() -> String {
    "devenv".to_string()
}

fn default_session_name() -> String {
    "dev".to_string()
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            socket: default_socket(),
            name: default_session_name(),
        }
    }
}

/// `[retry]`: policy baked into every wrapper loop.
#[derive(Debug, Clone, Deserialize)]
pub struct RetrySection {
    /// Delay between a failing attempt and the next one, e.g. `"10s"`.
    #[serde(default = "default_backoff")]
    pub backoff: String,

    /// `0` keeps retrying until the context is killed.
    #[serde(default)]
    pub max_attempts: u32,
}

fn default_backoff() -> String {
    "10s".to_string()
}

impl Default for RetrySection {
    fn default() -> Self {
        Self {
            backoff: default_backoff(),
            max_attempts: 0,
        }
    }
}

/// `[tailor]`: the log viewer context launched by `monitor` and `tailor`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TailorSection {
    /// Shell command run inside the logs directory.
    #[serde(default = "default_tailor_command")]
    pub command: String,
}

fn default_tailor_command() -> String {
    "tail -F *".to_string()
}

impl Default for TailorSection {
    fn default() -> Self {
        Self {
            command: default_tailor_command(),
        }
    }
}

/// `[startup]`: scopes launched when the monitor starts.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct StartupSection {
    #[serde(default)]
    pub groups: Vec<String>,
}

/// `[service.<id>]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ServiceConfig {
    /// Working directory, relative to the dev root. Defaults to the root.
    #[serde(default)]
    pub workdir: Option<String>,

    /// Sub-command id -> shell command. All of them run side by side.
    #[serde(default)]
    pub command: Option<BTreeMap<String, String>>,

    /// Reserved for containerised workloads; starting one is a no-op.
    #[serde(default)]
    pub container: Option<ContainerConfig>,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct ContainerConfig {
    #[serde(default)]
    pub image: Option<String>,
}

/// `[group.<id>]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct GroupConfig {
    #[serde(default)]
    pub services: Vec<String>,
}

/// Validated, immutable configuration.
///
/// Only constructed through `TryFrom<RawConfigFile>` (see `validate.rs`).
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub session: SessionSection,
    pub retry: RetryPolicy,
    pub tailor: TailorSection,
    pub startup: StartupSection,
    pub services: BTreeMap<String, ServiceDefinition>,
    pub groups: BTreeMap<String, Scope>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        session: SessionSection,
        retry: RetryPolicy,
        tailor: TailorSection,
        startup: StartupSection,
        services: BTreeMap<String, ServiceDefinition>,
        groups: BTreeMap<String, Scope>,
    ) -> Self {
        Self {
            session,
            retry,
            tailor,
            startup,
            services,
            groups,
        }
    }

    pub fn service(&self, id: &str) -> Option<&ServiceDefinition> {
        self.services.get(id)
    }

    pub fn contains_service(&self, id: &str) -> bool {
        self.services.contains_key(id)
    }

    /// All service ids in config order.
    pub fn service_ids(&self) -> impl Iterator<Item = &str> {
        self.services.keys().map(String::as_str)
    }
}

/// Parsed `[retry]` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub backoff: Duration,
    /// `None` means unbounded.
    pub max_attempts: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            backoff: Duration::from_secs(10),
            max_attempts: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDefinition {
    pub id: String,
    pub workdir: Option<String>,
    pub workload: Workload,
}

impl ServiceDefinition {
    /// Sub-commands in pane order; empty for container workloads.
    pub fn sub_commands(&self) -> &[SubCommand] {
        match &self.workload {
            Workload::Commands(cmds) => cmds,
            Workload::Container(_) => &[],
        }
    }

    /// Pane index hosting the given sub-command.
    pub fn pane_index(&self, sub_command: &str) -> Option<usize> {
        self.sub_commands().iter().position(|c| c.id == sub_command)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Workload {
    Commands(Vec<SubCommand>),
    Container(ContainerConfig),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubCommand {
    pub id: String,
    pub cmd: String,
}

/// A named set of services. Membership only; services may be in many scopes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    pub id: String,
    pub services: Vec<String>,
}
