// src/supervisor/mod.rs

//! Lifecycle supervisor.
//!
//! A `Supervisor` lives for one invocation. It owns the loaded config, the
//! dev-root layout, the injected [`ContextHost`] and the [`ReportHook`] that
//! wrapped commands use to call back. It keeps no lifecycle state of its own:
//! every decision is made by inspecting the session.
//!
//! - [`lifecycle`]: start / stop / restart, per service and per group.
//! - [`monitor`]: monitor loop, log viewer, ad hoc commands, status.

use crate::config::ConfigFile;
use crate::context::{ContextHost, ContextInfo, ContextName};
use crate::errors::Result;
use crate::paths::DevPaths;
use crate::report::ReportHook;
use crate::scope::ScopeResolver;

pub mod lifecycle;
pub mod monitor;

pub use lifecycle::{StartOutcome, StopOutcome};
pub use monitor::{ServiceStatus, IDLE_PERIOD, TAILOR_CONTEXT};

pub struct Supervisor<H: ContextHost> {
    config: ConfigFile,
    paths: DevPaths,
    host: H,
    hook: ReportHook,
}

impl<H: ContextHost> Supervisor<H> {
    pub fn new(config: ConfigFile, paths: DevPaths, host: H, hook: ReportHook) -> Self {
        Self {
            config,
            paths,
            host,
            hook,
        }
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    pub fn paths(&self) -> &DevPaths {
        &self.paths
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn scopes(&self) -> ScopeResolver<'_> {
        ScopeResolver::new(&self.config)
    }

    /// Every live context for `service`, under any of its state-encoded names.
    ///
    /// More than one entry means two invocations raced on `start`.
    pub(crate) async fn service_contexts(&self, service: &str) -> Result<Vec<ContextInfo>> {
        let mut found: Vec<ContextInfo> = Vec::new();
        for name in ContextName::candidates(service) {
            if let Some(ctx) = self.host.find(&name.to_string()).await? {
                // A context renamed between two lookups shows up under both names.
                if !found.iter().any(|c| c.id == ctx.id) {
                    found.push(ctx);
                }
            }
        }
        Ok(found)
    }
}
