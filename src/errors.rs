// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DevctlError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unknown service: {0}")]
    UnknownService(String),

    #[error("Unknown scope: {0}")]
    UnknownScope(String),

    #[error("Service not running: {0}")]
    NotRunning(String),

    #[error("Protocol error: {0}")]
    ProtocolError(String),

    #[error("Execution context already exists: {0}")]
    ContextExists(String),

    #[error("Session unavailable: {0}")]
    SessionUnavailable(String),

    #[error("Host command `{command}` failed: {stderr}")]
    HostCommand { command: String, stderr: String },

    #[error("Environment variable {0} must be set")]
    MissingRoot(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, DevctlError>;
