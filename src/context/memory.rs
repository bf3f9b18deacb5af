// src/context/memory.rs

//! In-process [`ContextHost`] for tests and dry runs.
//!
//! Behaves like a single tmux session: exact-name lookup, duplicate names
//! rejected by `create`, id-based rename and retitle, and errors when
//! targeting a missing context. Every mutation is appended to an operation
//! log so tests can assert on ordering (e.g. kill-before-create on restart).

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::context::{ContextHost, ContextInfo, ContextSpec, HostFuture, PaneInfo};
use crate::errors::{DevctlError, Result};

/// A recorded host mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostOp {
    Create(String),
    Rename { from: String, to: String },
    Kill(String),
    SetPaneTitle { context: String, pane: usize, title: String },
}

#[derive(Debug, Default)]
struct MemoryState {
    contexts: Vec<MemoryContext>,
    next_id: u64,
    ops: Vec<HostOp>,
    notifications: Vec<String>,
}

#[derive(Debug, Clone)]
struct MemoryContext {
    info: ContextInfo,
    spec: ContextSpec,
}

/// Cloning shares the underlying session.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Names of all live contexts, in creation order.
    pub fn names(&self) -> Vec<String> {
        self.state()
            .contexts
            .iter()
            .map(|c| c.info.name.clone())
            .collect()
    }

    pub fn context(&self, name: &str) -> Option<ContextInfo> {
        self.state()
            .contexts
            .iter()
            .find(|c| c.info.name == name)
            .map(|c| c.info.clone())
    }

    /// The spec a context was created from.
    pub fn spec(&self, name: &str) -> Option<ContextSpec> {
        self.state()
            .contexts
            .iter()
            .find(|c| c.info.name == name)
            .map(|c| c.spec.clone())
    }

    pub fn ops(&self) -> Vec<HostOp> {
        self.state().ops.clone()
    }

    pub fn clear_ops(&self) {
        self.state().ops.clear();
    }

    pub fn notifications(&self) -> Vec<String> {
        self.state().notifications.clone()
    }

    fn insert(&self, spec: ContextSpec) -> Result<ContextInfo> {
        let mut state = self.state();
        if state.contexts.iter().any(|c| c.info.name == spec.name) {
            return Err(DevctlError::ContextExists(spec.name));
        }

        state.next_id += 1;
        let window = state.next_id;
        let panes = spec
            .panes
            .iter()
            .enumerate()
            .map(|(i, pane)| PaneInfo {
                id: format!("%{window}.{i}"),
                title: pane.title.clone(),
            })
            .collect();
        let info = ContextInfo {
            id: format!("@{window}"),
            name: spec.name.clone(),
            panes,
        };

        state.ops.push(HostOp::Create(spec.name.clone()));
        state.contexts.push(MemoryContext {
            info: info.clone(),
            spec,
        });
        Ok(info)
    }

    /// Apply `f` to the context selected by `target`, logging the op built
    /// from its name at the time of the call.
    fn with_context<T>(
        &self,
        target: Target<'_>,
        op: impl FnOnce(&str) -> HostOp,
        f: impl FnOnce(&mut Vec<MemoryContext>, usize) -> Result<T>,
    ) -> Result<T> {
        let mut state = self.state();
        let idx = state
            .contexts
            .iter()
            .position(|c| match target {
                Target::Name(name) => c.info.name == name,
                Target::Id(id) => c.info.id == id,
            })
            .ok_or_else(|| DevctlError::HostCommand {
                command: format!("{target:?}"),
                stderr: "can't find window".to_string(),
            })?;
        let op = op(&state.contexts[idx].info.name);
        let out = f(&mut state.contexts, idx)?;
        state.ops.push(op);
        Ok(out)
    }
}

#[derive(Debug, Clone, Copy)]
enum Target<'a> {
    Name(&'a str),
    Id(&'a str),
}

impl ContextHost for MemoryHost {
    fn list(&self) -> HostFuture<'_, Vec<ContextInfo>> {
        let contexts = self
            .state()
            .contexts
            .iter()
            .map(|c| c.info.clone())
            .collect();
        Box::pin(async move { Ok(contexts) })
    }

    fn create(&self, spec: ContextSpec) -> HostFuture<'_, ContextInfo> {
        let res = self.insert(spec);
        Box::pin(async move { res })
    }

    fn rename<'a>(&'a self, id: &'a str, new_name: &'a str) -> HostFuture<'a, ()> {
        let op = |from: &str| HostOp::Rename {
            from: from.to_string(),
            to: new_name.to_string(),
        };
        let res = self.with_context(Target::Id(id), op, |contexts, idx| {
            contexts[idx].info.name = new_name.to_string();
            Ok(())
        });
        Box::pin(async move { res })
    }

    fn kill<'a>(&'a self, name: &'a str) -> HostFuture<'a, ()> {
        let op = |name: &str| HostOp::Kill(name.to_string());
        let res = self.with_context(Target::Name(name), op, |contexts, idx| {
            contexts.remove(idx);
            Ok(())
        });
        Box::pin(async move { res })
    }

    fn set_pane_title<'a>(
        &'a self,
        id: &'a str,
        pane: usize,
        title: &'a str,
    ) -> HostFuture<'a, ()> {
        let op = |name: &str| HostOp::SetPaneTitle {
            context: name.to_string(),
            pane,
            title: title.to_string(),
        };
        let res = self.with_context(Target::Id(id), op, |contexts, idx| {
            let slot = contexts[idx].info.panes.get_mut(pane).ok_or_else(|| {
                DevctlError::HostCommand {
                    command: "set-pane-title".to_string(),
                    stderr: format!("context '{id}' has no pane {pane}"),
                }
            })?;
            slot.title = title.to_string();
            Ok(())
        });
        Box::pin(async move { res })
    }

    fn notify<'a>(&'a self, message: &'a str) -> HostFuture<'a, ()> {
        self.state().notifications.push(message.to_string());
        Box::pin(async { Ok(()) })
    }
}
