// tests/config_loading.rs

use std::io::Write;
use std::time::Duration;

use tempfile::NamedTempFile;

use devctl::config::{load_and_validate, parse_str, ConfigFile, Workload};
use devctl::errors::DevctlError;

fn load(toml: &str) -> Result<ConfigFile, DevctlError> {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{toml}").unwrap();
    load_and_validate(file.path())
}

fn expect_config_error(toml: &str) -> String {
    match load(toml) {
        Err(DevctlError::ConfigError(msg)) => msg,
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn full_document_loads_with_ordered_sub_commands() {
    let cfg = load(
        r#"
[session]
socket = "devenv"
name = "dev"

[retry]
backoff = "3s"
max_attempts = 5

[startup]
groups = ["core", "extras"]

[service.web]
workdir = "web"
[service.web.command]
server = "npm start"
assets = "npm run watch"

[service.db]
container = { image = "postgres:16" }

[group.core]
services = ["web", "db", "web"]
"#,
    )
    .unwrap();

    let web = cfg.service("web").unwrap();
    assert_eq!(web.workdir.as_deref(), Some("web"));
    let subs: Vec<_> = web.sub_commands().iter().map(|s| s.id.as_str()).collect();
    assert_eq!(subs, vec!["assets", "server"]);
    assert_eq!(web.pane_index("server"), Some(1));

    assert!(matches!(
        cfg.service("db").unwrap().workload,
        Workload::Container(ref c) if c.image.as_deref() == Some("postgres:16")
    ));

    assert_eq!(cfg.groups["core"].services, vec!["web", "db"]);
    assert_eq!(cfg.retry.backoff, Duration::from_secs(3));
    assert_eq!(cfg.retry.max_attempts, Some(5));

    // Unknown startup groups are left for the monitor to report.
    assert_eq!(cfg.startup.groups, vec!["core", "extras"]);
}

#[test]
fn defaults_apply_to_optional_sections() {
    let cfg = load(
        r#"
[service.web.command]
run = "cargo run"
"#,
    )
    .unwrap();

    assert_eq!(cfg.session.socket, "devenv");
    assert_eq!(cfg.session.name, "dev");
    assert_eq!(cfg.retry.backoff, Duration::from_secs(10));
    assert_eq!(cfg.retry.max_attempts, None);
    assert_eq!(cfg.tailor.command, "tail -F *");
    assert!(cfg.startup.groups.is_empty());
}

#[test]
fn group_with_unknown_member_is_config_error() {
    let msg = expect_config_error(
        r#"
[service.web.command]
run = "npm start"

[group.core]
services = ["web", "NonExistent"]
"#,
    );
    assert!(msg.contains("unknown service"));
    assert!(msg.contains("NonExistent"));
}

#[test]
fn service_with_both_workload_kinds_is_rejected() {
    let msg = expect_config_error(
        r#"
[service.web]
container = {}
[service.web.command]
run = "npm start"
"#,
    );
    assert!(msg.contains("not both"));
}

#[test]
fn service_without_workload_is_rejected() {
    let msg = expect_config_error(
        r#"
[service.web]
workdir = "web"
"#,
    );
    assert!(msg.contains("must define"));
}

#[test]
fn empty_config_is_rejected() {
    let msg = expect_config_error("");
    assert!(msg.contains("at least one"));
}

#[test]
fn ids_unsafe_for_context_names_are_rejected() {
    let msg = expect_config_error(
        r#"
[service."web.app".command]
run = "npm start"
"#,
    );
    assert!(msg.contains("web.app"));
}

#[test]
fn supervisor_log_name_is_reserved() {
    let msg = expect_config_error(
        r#"
[service.devctl.command]
run = "true"
"#,
    );
    assert!(msg.contains("reserved"));
}

#[test]
fn invalid_backoff_is_config_error() {
    let msg = expect_config_error(
        r#"
[retry]
backoff = "soon"

[service.web.command]
run = "true"
"#,
    );
    assert!(msg.contains("[retry].backoff"));
}

#[test]
fn malformed_toml_is_toml_error() {
    let err = parse_str("[service.web\nrun = ").unwrap_err();
    assert!(matches!(err, DevctlError::TomlError(_)));
}
