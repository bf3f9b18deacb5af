// src/context/mod.rs

//! Execution context management.
//!
//! An execution context is a named, inspectable host (a tmux window) holding
//! one pane per sub-command. The supervisor never looks the session up
//! itself: it receives a [`ContextHost`] and talks to it explicitly.
//!
//! - [`tmux`] provides the production `TmuxHost`.
//! - [`memory`] provides `MemoryHost`, an in-process host used by tests.
//! - [`naming`] encodes lifecycle state into context names and pane titles.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use crate::errors::Result;

pub mod memory;
pub mod naming;
pub mod tmux;

pub use memory::{HostOp, MemoryHost};
pub use naming::{pane_title, parse_pane_title, ContextName};
pub use tmux::TmuxHost;

/// Boxed future returned by every [`ContextHost`] operation.
pub type HostFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Snapshot of a live context as seen in the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextInfo {
    /// Host-assigned identifier (tmux window id such as `@3`).
    pub id: String,
    pub name: String,
    /// Panes in creation order.
    pub panes: Vec<PaneInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneInfo {
    /// Host-assigned identifier (tmux pane id such as `%7`).
    pub id: String,
    pub title: String,
}

/// One pane to launch: an opaque shell string plus the title it starts with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneSpec {
    pub title: String,
    pub command: String,
}

/// Everything needed to create a context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextSpec {
    pub name: String,
    pub workdir: PathBuf,
    pub panes: Vec<PaneSpec>,
    /// When set, every pane's stdout/stderr is appended to this file.
    pub log_file: Option<PathBuf>,
}

impl ContextSpec {
    /// The exact shell string each pane is launched with, in pane order.
    pub fn launch_commands(&self) -> Vec<String> {
        self.panes
            .iter()
            .map(|pane| launch_command(&pane.command, self.log_file.as_deref()))
            .collect()
    }
}

/// Wrap a command so it runs as one opaque unit, optionally teeing its
/// combined output into `log_file`.
///
/// The inner command is quoted as a whole and never split.
pub fn launch_command(command: &str, log_file: Option<&Path>) -> String {
    let inner = format!("sh -c {}", shell_words::quote(command));
    match log_file {
        Some(log) => format!(
            "{inner} 2>&1 | tee -a {}",
            shell_words::quote(&log.to_string_lossy())
        ),
        None => inner,
    }
}

/// Trait abstracting the session that hosts execution contexts.
///
/// Production code uses [`TmuxHost`]; tests use [`MemoryHost`]. No operation
/// is atomic with respect to other invocations sharing the same session.
pub trait ContextHost: Send + Sync {
    /// Every context currently in the session.
    fn list(&self) -> HostFuture<'_, Vec<ContextInfo>>;

    /// Exact-name lookup. No side effects.
    fn find<'a>(&'a self, name: &'a str) -> HostFuture<'a, Option<ContextInfo>> {
        Box::pin(async move {
            let contexts = self.list().await?;
            Ok(contexts.into_iter().find(|ctx| ctx.name == name))
        })
    }

    /// Create a context with one pane per [`PaneSpec`], laid out side by side.
    ///
    /// Fails with `ContextExists` if the name is taken; callers are expected
    /// to check with [`ContextHost::find`] first.
    fn create(&self, spec: ContextSpec) -> HostFuture<'_, ContextInfo>;

    /// Rename the context with host id `id` (see [`ContextInfo::id`]).
    ///
    /// Targeting by id keeps working when another invocation renamed the
    /// context after it was looked up.
    fn rename<'a>(&'a self, id: &'a str, new_name: &'a str) -> HostFuture<'a, ()>;

    /// Destroy the context and every pane in it, immediately.
    fn kill<'a>(&'a self, name: &'a str) -> HostFuture<'a, ()>;

    /// Retitle the pane at position `pane` (creation order) of the context
    /// with host id `id`.
    fn set_pane_title<'a>(
        &'a self,
        id: &'a str,
        pane: usize,
        title: &'a str,
    ) -> HostFuture<'a, ()>;

    /// Show a short, non-blocking message to whoever is looking at the session.
    fn notify<'a>(&'a self, message: &'a str) -> HostFuture<'a, ()>;
}
