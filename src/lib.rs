// src/lib.rs

pub mod cli;
pub mod config;
pub mod context;
pub mod errors;
pub mod logging;
pub mod paths;
pub mod report;
pub mod scope;
pub mod supervisor;
pub mod types;

use std::path::PathBuf;

use tracing::debug;

use crate::cli::{CliArgs, Command};
use crate::config::{load_and_validate, ConfigFile, Workload};
use crate::context::{ContextHost, TmuxHost};
use crate::errors::Result;
use crate::paths::DevPaths;
use crate::report::{ReportHook, StatusReport};
use crate::supervisor::Supervisor;

/// High-level entry point used by `main.rs`.
///
/// Every invocation is short-lived: load the config, attach to the session,
/// perform one command, exit.
pub async fn run(args: CliArgs, paths: DevPaths) -> Result<()> {
    let config_path = config_path(&args, &paths);
    let cfg = load_and_validate(&config_path)?;

    if let Command::Config = args.command {
        print_config(&cfg);
        return Ok(());
    }

    let host = TmuxHost::connect(cfg.session.socket.clone(), cfg.session.name.clone()).await?;
    let hook = ReportHook::current(paths.root(), &config_path)?;
    let supervisor = Supervisor::new(cfg, paths, host, hook);

    dispatch(&supervisor, args.command).await
}

/// Execute one command against an already-constructed supervisor.
pub async fn dispatch<H: ContextHost>(supervisor: &Supervisor<H>, command: Command) -> Result<()> {
    match command {
        Command::StartGroups { groups } => supervisor.start_groups(&groups).await,
        Command::StopGroups { groups } => supervisor.stop_groups(&groups).await,
        Command::Start { restart, services } => {
            supervisor.start_services(&services, restart).await?;
            Ok(())
        }
        Command::Stop { services } => {
            supervisor.stop_services(&services).await?;
            Ok(())
        }
        Command::Monitor => supervisor.monitor().await,
        Command::Tailor => {
            supervisor.restart_tailor().await?;
            Ok(())
        }
        Command::Cmd { name, command } => {
            supervisor.run_cmd(&name, &command.join(" ")).await?;
            Ok(())
        }
        Command::Status { services } => {
            for status in supervisor.status(&services).await? {
                let state = status
                    .state
                    .map(|s| s.label())
                    .unwrap_or("not running");
                if status.panes.is_empty() {
                    println!("{:<24} {}", status.service, state);
                } else {
                    println!(
                        "{:<24} {:<12} {}",
                        status.service,
                        state,
                        status.panes.join(" ")
                    );
                }
            }
            Ok(())
        }
        Command::Config => {
            print_config(supervisor.config());
            Ok(())
        }
        Command::ProjectCmdStatus {
            service,
            sub_command,
            status,
            attempt,
            exhausted,
        } => {
            let report =
                StatusReport::from_args(&service, &sub_command, &status, attempt, exhausted)?;
            let outcome = supervisor.report_status(&report).await?;
            debug!(?outcome, "status report applied");
            Ok(())
        }
    }
}

fn config_path(args: &CliArgs, paths: &DevPaths) -> PathBuf {
    match &args.config {
        Some(path) => path.clone(),
        None => paths.default_config(),
    }
}

/// Print services, sub-commands, groups and startup order.
fn print_config(cfg: &ConfigFile) {
    println!("devctl config");
    println!("  session = {} (socket {})", cfg.session.name, cfg.session.socket);
    match cfg.retry.max_attempts {
        Some(max) => println!("  retry = every {:?}, at most {max} attempts", cfg.retry.backoff),
        None => println!("  retry = every {:?}, forever", cfg.retry.backoff),
    }
    println!();

    println!("services ({}):", cfg.services.len());
    for (id, service) in cfg.services.iter() {
        println!("  - {id}");
        if let Some(ref workdir) = service.workdir {
            println!("      workdir: {workdir}");
        }
        match &service.workload {
            Workload::Commands(subs) => {
                for sub in subs {
                    println!("      {}: {}", sub.id, sub.cmd);
                }
            }
            Workload::Container(container) => match container.image {
                Some(ref image) => println!("      container: {image} (not supported yet)"),
                None => println!("      container (not supported yet)"),
            },
        }
    }
    println!();

    println!("groups ({}):", cfg.groups.len());
    for (id, scope) in cfg.groups.iter() {
        println!("  - {id}: {}", scope.services.join(", "));
    }
    println!();

    println!("startup: {}", cfg.startup.groups.join(", "));
}
