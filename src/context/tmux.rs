// src/context/tmux.rs

//! tmux-backed [`ContextHost`].
//!
//! Every call shells out to `tmux -L <socket>` against one session. Lookup
//! and kill address windows by exact name (`=session:=window`); rename and
//! retitle use the server-wide window id (`@4`), panes their pane id (`%7`).

use std::collections::HashMap;

use anyhow::Context as _;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::context::{ContextHost, ContextInfo, ContextSpec, HostFuture, PaneInfo};
use crate::errors::{DevctlError, Result};

#[derive(Debug, Clone)]
pub struct TmuxHost {
    socket: String,
    session: String,
}

impl TmuxHost {
    /// Attach to an existing session; fails if the session is not running.
    pub async fn connect(socket: impl Into<String>, session: impl Into<String>) -> Result<Self> {
        let host = Self {
            socket: socket.into(),
            session: session.into(),
        };

        let target = host.session_target();
        if let Err(err) = host.run(&["has-session", "-t", &target]).await {
            debug!(error = %err, "has-session failed");
            return Err(DevctlError::SessionUnavailable(format!(
                "cannot find session '{}' on tmux socket '{}'",
                host.session, host.socket
            )));
        }

        Ok(host)
    }

    fn session_target(&self) -> String {
        format!("={}", self.session)
    }

    fn window_target(&self, name: &str) -> String {
        format!("={}:={}", self.session, name)
    }

    async fn run(&self, args: &[&str]) -> Result<String> {
        debug!(socket = %self.socket, ?args, "tmux");

        let output = Command::new("tmux")
            .arg("-L")
            .arg(&self.socket)
            .args(args)
            .output()
            .await
            .with_context(|| format!("spawning tmux {}", args.first().unwrap_or(&"")))?;

        if !output.status.success() {
            return Err(DevctlError::HostCommand {
                command: format!("tmux {}", args.join(" ")),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn list_inner(&self) -> Result<Vec<ContextInfo>> {
        let target = self.session_target();
        let windows = self
            .run(&[
                "list-windows",
                "-t",
                &target,
                "-F",
                "#{window_id}\t#{window_name}",
            ])
            .await?;
        let panes = self
            .run(&[
                "list-panes",
                "-s",
                "-t",
                &target,
                "-F",
                "#{window_id}\t#{pane_id}\t#{pane_title}",
            ])
            .await?;
        Ok(parse_listing(&windows, &panes))
    }

    async fn create_inner(&self, spec: ContextSpec) -> Result<ContextInfo> {
        if self.find(&spec.name).await?.is_some() {
            return Err(DevctlError::ContextExists(spec.name));
        }

        let commands = spec.launch_commands();
        let Some((first, rest)) = commands.split_first() else {
            return Err(DevctlError::ConfigError(format!(
                "context '{}' needs at least one pane",
                spec.name
            )));
        };

        let workdir = spec.workdir.to_string_lossy().into_owned();
        let session = format!("{}:", self.session_target());
        let created = self
            .run(&[
                "new-window",
                "-d",
                "-P",
                "-F",
                "#{window_id}\t#{pane_id}",
                "-t",
                &session,
                "-n",
                &spec.name,
                "-c",
                &workdir,
                first,
            ])
            .await?;
        let (window_id, first_pane) = created
            .trim()
            .split_once('\t')
            .map(|(w, p)| (w.to_string(), p.to_string()))
            .ok_or_else(|| DevctlError::HostCommand {
                command: "tmux new-window".to_string(),
                stderr: format!("unexpected output: {created:?}"),
            })?;

        // Finished panes stay visible until the context is stopped.
        self.run(&["set-option", "-w", "-t", &window_id, "remain-on-exit", "on"])
            .await?;

        // Each split goes to the right of the previous pane, so pane index
        // order (and `list-panes` order) follows `ContextSpec::panes`.
        let mut previous = first_pane.clone();
        let mut pane_ids = vec![first_pane];
        for command in rest {
            let pane = self
                .run(&[
                    "split-window",
                    "-d",
                    "-h",
                    "-P",
                    "-F",
                    "#{pane_id}",
                    "-t",
                    &previous,
                    "-c",
                    &workdir,
                    command,
                ])
                .await?;
            previous = pane.trim().to_string();
            pane_ids.push(previous.clone());
        }

        if pane_ids.len() > 1 {
            self.run(&["select-layout", "-t", &window_id, "even-horizontal"])
                .await?;
        }

        let mut panes = Vec::with_capacity(pane_ids.len());
        for (pane_id, pane_spec) in pane_ids.into_iter().zip(spec.panes.iter()) {
            self.run(&["select-pane", "-t", &pane_id, "-T", &pane_spec.title])
                .await?;
            panes.push(PaneInfo {
                id: pane_id,
                title: pane_spec.title.clone(),
            });
        }

        Ok(ContextInfo {
            id: window_id,
            name: spec.name,
            panes,
        })
    }

    async fn set_pane_title_inner(&self, id: &str, pane: usize, title: &str) -> Result<()> {
        let ctx = self
            .list_inner()
            .await?
            .into_iter()
            .find(|ctx| ctx.id == id)
            .ok_or_else(|| DevctlError::NotRunning(id.to_string()))?;
        let pane = ctx.panes.get(pane).ok_or_else(|| DevctlError::HostCommand {
            command: "tmux select-pane".to_string(),
            stderr: format!("context '{}' has no pane {pane}", ctx.name),
        })?;
        self.run(&["select-pane", "-t", &pane.id, "-T", title]).await?;
        Ok(())
    }
}

impl ContextHost for TmuxHost {
    fn list(&self) -> HostFuture<'_, Vec<ContextInfo>> {
        Box::pin(self.list_inner())
    }

    fn create(&self, spec: ContextSpec) -> HostFuture<'_, ContextInfo> {
        Box::pin(self.create_inner(spec))
    }

    fn rename<'a>(&'a self, id: &'a str, new_name: &'a str) -> HostFuture<'a, ()> {
        Box::pin(async move {
            self.run(&["rename-window", "-t", id, new_name]).await?;
            Ok(())
        })
    }

    fn kill<'a>(&'a self, name: &'a str) -> HostFuture<'a, ()> {
        Box::pin(async move {
            let target = self.window_target(name);
            self.run(&["kill-window", "-t", &target]).await?;
            Ok(())
        })
    }

    fn set_pane_title<'a>(
        &'a self,
        id: &'a str,
        pane: usize,
        title: &'a str,
    ) -> HostFuture<'a, ()> {
        Box::pin(self.set_pane_title_inner(id, pane, title))
    }

    fn notify<'a>(&'a self, message: &'a str) -> HostFuture<'a, ()> {
        Box::pin(async move {
            // display-message needs an attached client; a detached session is fine.
            if let Err(err) = self.run(&["display-message", message]).await {
                warn!(error = %err, "could not display session message");
            }
            Ok(())
        })
    }
}

/// Join `list-windows` and `list-panes -s` output into context snapshots.
///
/// Both listings are tab separated, one entry per line. Pane order follows
/// the listing, which tmux emits by pane index.
fn parse_listing(windows: &str, panes: &str) -> Vec<ContextInfo> {
    let mut by_window: HashMap<&str, Vec<PaneInfo>> = HashMap::new();
    for line in panes.lines() {
        let mut fields = line.splitn(3, '\t');
        let (Some(window_id), Some(pane_id)) = (fields.next(), fields.next()) else {
            continue;
        };
        by_window.entry(window_id).or_default().push(PaneInfo {
            id: pane_id.to_string(),
            title: fields.next().unwrap_or_default().to_string(),
        });
    }

    windows
        .lines()
        .filter_map(|line| line.split_once('\t'))
        .map(|(id, name)| ContextInfo {
            id: id.to_string(),
            name: name.to_string(),
            panes: by_window.remove(id).unwrap_or_default(),
        })
        .collect()
}
