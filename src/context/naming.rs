// src/context/naming.rs

//! State-encoded names.
//!
//! A service's context is called `p-<state>-<service>`, where `<state>` is
//! the [`LifecycleState`] label. Pane titles carry the per-sub-command state
//! as `<sub-command>:<state>`. These two helpers are the only places names
//! are formatted or parsed.

use std::fmt;

use crate::types::LifecycleState;

const PREFIX: &str = "p-";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContextName {
    state: LifecycleState,
    service: String,
}

impl ContextName {
    pub fn new(state: LifecycleState, service: impl Into<String>) -> Self {
        Self {
            state,
            service: service.into(),
        }
    }

    pub fn running(service: impl Into<String>) -> Self {
        Self::new(LifecycleState::Running, service)
    }

    /// Every name a context for `service` could currently carry.
    pub fn candidates(service: &str) -> [ContextName; 3] {
        LifecycleState::ALL.map(|state| ContextName::new(state, service))
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    /// Decode a context name; `None` for contexts devctl did not name
    /// (log viewer, ad hoc `cmd` contexts, anything else in the session).
    pub fn parse(name: &str) -> Option<Self> {
        let rest = name.strip_prefix(PREFIX)?;
        let (label, service) = rest.split_once('-')?;
        if service.is_empty() {
            return None;
        }
        let state = label.parse().ok()?;
        Some(Self::new(state, service))
    }
}

impl fmt::Display for ContextName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{PREFIX}{}-{}", self.state.label(), self.service)
    }
}

pub fn pane_title(sub_command: &str, state: LifecycleState) -> String {
    format!("{sub_command}:{}", state.label())
}

pub fn parse_pane_title(title: &str) -> Option<(&str, LifecycleState)> {
    let (sub, label) = title.rsplit_once(':')?;
    Some((sub, label.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_encode_state_and_service() {
        assert_eq!(ContextName::running("web").to_string(), "p-running-web");
        assert_eq!(
            ContextName::new(LifecycleState::Succeeded, "web").to_string(),
            "p-finished-web"
        );
        assert_eq!(
            ContextName::new(LifecycleState::Failing, "web").to_string(),
            "p-failing-web"
        );
    }

    #[test]
    fn service_ids_may_contain_dashes() {
        let parsed = ContextName::parse("p-failing-api-gateway").unwrap();
        assert_eq!(parsed.state(), LifecycleState::Failing);
        assert_eq!(parsed.service(), "api-gateway");
    }

    #[test]
    fn foreign_names_are_not_parsed() {
        assert_eq!(ContextName::parse("devctl-logs"), None);
        assert_eq!(ContextName::parse("p-success-web"), None);
        assert_eq!(ContextName::parse("p-running-"), None);
        assert_eq!(ContextName::parse("bash"), None);
    }

    #[test]
    fn pane_titles() {
        assert_eq!(pane_title("run", LifecycleState::Failing), "run:failing");
        assert_eq!(
            parse_pane_title("run:finished"),
            Some(("run", LifecycleState::Succeeded))
        );
        assert_eq!(parse_pane_title("zsh"), None);
    }
}
