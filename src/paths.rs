// src/paths.rs

//! Filesystem layout under the dev root.
//!
//! ```text
//! $DEV_ROOT/
//!   devctl.toml        default config
//!   logs/devctl        supervisor log
//!   logs/<service-id>  one append-only log per service
//! ```

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use crate::errors::{DevctlError, Result};

/// Environment variable every invocation requires.
pub const ROOT_ENV: &str = "DEV_ROOT";

/// File name of the supervisor's own log inside the logs directory.
pub const SUPERVISOR_LOG: &str = "devctl";

pub const DEFAULT_CONFIG: &str = "devctl.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevPaths {
    root: PathBuf,
}

impl DevPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve the root from `DEV_ROOT`, failing if it is unset or empty.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(ROOT_ENV) {
            Some(root) if !root.is_empty() => Ok(Self::new(root)),
            _ => Err(DevctlError::MissingRoot(ROOT_ENV.to_string())),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn default_config(&self) -> PathBuf {
        self.root.join(DEFAULT_CONFIG)
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    pub fn service_log(&self, service: &str) -> PathBuf {
        self.logs_dir().join(service)
    }

    pub fn supervisor_log(&self) -> PathBuf {
        self.logs_dir().join(SUPERVISOR_LOG)
    }

    /// Resolve a service working directory; relative paths hang off the root.
    pub fn workdir(&self, workdir: Option<&str>) -> PathBuf {
        match workdir {
            Some(dir) => self.root.join(dir),
            None => self.root.clone(),
        }
    }

    pub fn ensure_logs_dir(&self) -> Result<()> {
        fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }
}

/// Create `path` if missing without truncating existing content.
pub fn touch(path: &Path) -> Result<()> {
    OpenOptions::new().create(true).append(true).open(path)?;
    Ok(())
}
