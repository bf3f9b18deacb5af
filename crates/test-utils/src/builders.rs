#![allow(dead_code)]

use std::collections::BTreeMap;

use devctl::config::{
    ConfigFile, ContainerConfig, GroupConfig, RawConfigFile, RetrySection, ServiceConfig,
    SessionSection, StartupSection, TailorSection,
};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                session: SessionSection::default(),
                retry: RetrySection::default(),
                tailor: TailorSection::default(),
                startup: StartupSection::default(),
                service: BTreeMap::new(),
                group: BTreeMap::new(),
            },
        }
    }

    pub fn with_service(mut self, id: &str, service: ServiceConfig) -> Self {
        self.config.service.insert(id.to_string(), service);
        self
    }

    pub fn with_group(mut self, id: &str, services: &[&str]) -> Self {
        self.config.group.insert(
            id.to_string(),
            GroupConfig {
                services: services.iter().map(|s| s.to_string()).collect(),
            },
        );
        self
    }

    pub fn with_startup(mut self, groups: &[&str]) -> Self {
        self.config.startup.groups = groups.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_backoff(mut self, backoff: &str) -> Self {
        self.config.retry.backoff = backoff.to_string();
        self
    }

    pub fn with_max_attempts(mut self, max: u32) -> Self {
        self.config.retry.max_attempts = max;
        self
    }

    pub fn with_tailor_command(mut self, command: &str) -> Self {
        self.config.tailor.command = command.to_string();
        self
    }

    pub fn build_raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `ServiceConfig`.
pub struct ServiceConfigBuilder {
    service: ServiceConfig,
}

impl ServiceConfigBuilder {
    /// A command service with no sub-commands yet.
    pub fn commands() -> Self {
        Self {
            service: ServiceConfig {
                workdir: None,
                command: Some(BTreeMap::new()),
                container: None,
            },
        }
    }

    pub fn container() -> Self {
        Self {
            service: ServiceConfig {
                workdir: None,
                command: None,
                container: Some(ContainerConfig::default()),
            },
        }
    }

    pub fn sub(mut self, id: &str, cmd: &str) -> Self {
        self.service
            .command
            .get_or_insert_with(BTreeMap::new)
            .insert(id.to_string(), cmd.to_string());
        self
    }

    pub fn workdir(mut self, dir: &str) -> Self {
        self.service.workdir = Some(dir.to_string());
        self
    }

    pub fn build(self) -> ServiceConfig {
        self.service
    }
}

/// One-line helper: a service with a single `run` sub-command.
pub fn single(cmd: &str) -> ServiceConfig {
    ServiceConfigBuilder::commands().sub("run", cmd).build()
}
