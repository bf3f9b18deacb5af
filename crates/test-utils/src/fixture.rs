use std::path::Path;

use tempfile::TempDir;

use devctl::config::ConfigFile;
use devctl::context::MemoryHost;
use devctl::paths::DevPaths;
use devctl::report::ReportHook;
use devctl::supervisor::Supervisor;

/// A throwaway dev root plus an in-memory session.
///
/// The `TempDir` is removed when the fixture is dropped.
pub struct TestRoot {
    dir: TempDir,
    host: MemoryHost,
}

impl TestRoot {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dev root");
        Self {
            dir,
            host: MemoryHost::new(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn paths(&self) -> DevPaths {
        DevPaths::new(self.dir.path())
    }

    /// Handle onto the shared in-memory session.
    pub fn host(&self) -> MemoryHost {
        self.host.clone()
    }

    pub fn hook(&self) -> ReportHook {
        ReportHook::new(
            "/usr/local/bin/devctl",
            self.dir.path(),
            self.dir.path().join("devctl.toml"),
        )
    }

    /// A supervisor over this root; every supervisor built from the same
    /// fixture shares one session, like separate invocations would.
    pub fn supervisor(&self, config: ConfigFile) -> Supervisor<MemoryHost> {
        Supervisor::new(config, self.paths(), self.host(), self.hook())
    }
}

impl Default for TestRoot {
    fn default() -> Self {
        Self::new()
    }
}
