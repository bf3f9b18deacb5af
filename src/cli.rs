// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `devctl`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "devctl",
    version,
    about = "Start, stop and supervise dev services inside a tmux session.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `devctl.toml` under `$DEV_ROOT`.
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `DEVCTL_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Start every service of the given groups.
    StartGroups {
        #[arg(required = true, value_name = "GROUP")]
        groups: Vec<String>,
    },

    /// Stop every service of the given groups.
    StopGroups {
        #[arg(required = true, value_name = "GROUP")]
        groups: Vec<String>,
    },

    /// Start services (all when none are given).
    Start {
        /// Restart services that are already running.
        #[arg(long)]
        restart: bool,

        #[arg(value_name = "SERVICE")]
        services: Vec<String>,
    },

    /// Stop services (all when none are given).
    Stop {
        #[arg(value_name = "SERVICE")]
        services: Vec<String>,
    },

    /// Set up logs, launch startup groups, then stay alive.
    Monitor,

    /// (Re)launch the log viewer.
    Tailor,

    /// Run an ad hoc command in its own context.
    Cmd {
        name: String,

        #[arg(
            required = true,
            trailing_var_arg = true,
            allow_hyphen_values = true,
            value_name = "COMMAND"
        )]
        command: Vec<String>,
    },

    /// Show the state of services (all when none are given).
    Status {
        #[arg(value_name = "SERVICE")]
        services: Vec<String>,
    },

    /// Print the loaded configuration.
    Config,

    /// Internal: status report from a wrapped sub-command.
    #[command(name = "project-cmd-status", hide = true)]
    ProjectCmdStatus {
        service: String,
        sub_command: String,
        status: String,

        #[arg(long)]
        attempt: Option<u32>,

        #[arg(long)]
        exhausted: bool,
    },
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_command_parses_with_flags() {
        let args = CliArgs::try_parse_from([
            "devctl",
            "--config",
            "/dev/root/devctl.toml",
            "project-cmd-status",
            "web",
            "run",
            "failing",
            "--attempt",
            "4",
            "--exhausted",
        ])
        .unwrap();

        assert_eq!(args.config, Some(PathBuf::from("/dev/root/devctl.toml")));
        match args.command {
            Command::ProjectCmdStatus {
                service,
                sub_command,
                status,
                attempt,
                exhausted,
            } => {
                assert_eq!(service, "web");
                assert_eq!(sub_command, "run");
                assert_eq!(status, "failing");
                assert_eq!(attempt, Some(4));
                assert!(exhausted);
            }
            other => panic!("expected ProjectCmdStatus, got {other:?}"),
        }
    }

    #[test]
    fn cmd_keeps_hyphenated_arguments() {
        let args = CliArgs::try_parse_from(["devctl", "cmd", "psql", "psql", "-h", "localhost"])
            .unwrap();
        match args.command {
            Command::Cmd { name, command } => {
                assert_eq!(name, "psql");
                assert_eq!(command, vec!["psql", "-h", "localhost"]);
            }
            other => panic!("expected Cmd, got {other:?}"),
        }
    }

    #[test]
    fn start_accepts_restart_flag_and_no_services() {
        let args = CliArgs::try_parse_from(["devctl", "start", "--restart"]).unwrap();
        assert!(matches!(
            args.command,
            Command::Start { restart: true, ref services } if services.is_empty()
        ));
    }
}
