// src/config/mod.rs

//! Configuration loading and validation for devctl.
//!
//! - `model.rs`: the TOML-backed raw model and the validated `ConfigFile`.
//! - `loader.rs`: read a document from disk.
//! - `validate.rs`: `TryFrom<RawConfigFile> for ConfigFile`.
//!
//! A `ConfigFile` is loaded once per invocation and never mutated.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, parse_str};
pub use model::{
    ConfigFile, ContainerConfig, GroupConfig, RawConfigFile, RetryPolicy, RetrySection, Scope,
    ServiceConfig, ServiceDefinition, SessionSection, StartupSection, SubCommand, TailorSection,
    Workload,
};
