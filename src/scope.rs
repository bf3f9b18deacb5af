// src/scope.rs

//! Group (scope) resolution.

use crate::config::ConfigFile;
use crate::errors::{DevctlError, Result};

#[derive(Debug, Clone, Copy)]
pub struct ScopeResolver<'a> {
    config: &'a ConfigFile,
}

impl<'a> ScopeResolver<'a> {
    pub fn new(config: &'a ConfigFile) -> Self {
        Self { config }
    }

    /// Member service ids of `scope`, in declaration order without duplicates.
    pub fn resolve(&self, scope: &str) -> Result<&'a [String]> {
        self.config
            .groups
            .get(scope)
            .map(|s| s.services.as_slice())
            .ok_or_else(|| DevctlError::UnknownScope(scope.to_string()))
    }

    /// Scopes launched at monitor start, verbatim. Unknown ids surface when
    /// each one is passed to [`ScopeResolver::resolve`].
    pub fn startup_manifest(&self) -> &'a [String] {
        &self.config.startup.groups
    }
}
