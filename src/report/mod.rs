// src/report/mod.rs

//! Status report channel.
//!
//! A spawned workload reports its own outcome by re-invoking devctl as a new
//! process. This module owns both ends of that protocol:
//!
//! - [`wire`]: the report's command-line shape and parsed form.
//! - [`wrapper`]: the retry loop every sub-command runs inside.
//! - [`receiver`]: what a report does to the session once it arrives.

pub mod receiver;
pub mod wire;
pub mod wrapper;

pub use receiver::ReportOutcome;
pub use wire::{StatusReport, REPORT_COMMAND};
pub use wrapper::{wrap_sub_command, ReportHook};
