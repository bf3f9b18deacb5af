// tests/naming_property.rs

use proptest::prelude::*;

use devctl::context::{pane_title, parse_pane_title, ContextName};
use devctl::types::LifecycleState;

fn state() -> impl Strategy<Value = LifecycleState> {
    prop::sample::select(LifecycleState::ALL.to_vec())
}

proptest! {
    #[test]
    fn context_names_round_trip(state in state(), service in "[A-Za-z0-9_-]{1,24}") {
        let name = ContextName::new(state, service.clone()).to_string();
        let parsed = ContextName::parse(&name).unwrap();
        prop_assert_eq!(parsed.state(), state);
        prop_assert_eq!(parsed.service(), service.as_str());
    }

    #[test]
    fn names_of_different_services_never_collide(
        a in "[A-Za-z0-9_-]{1,12}",
        b in "[A-Za-z0-9_-]{1,12}",
        sa in state(),
        sb in state(),
    ) {
        prop_assume!(a != b);
        let na = ContextName::new(sa, a).to_string();
        let nb = ContextName::new(sb, b).to_string();
        prop_assert_ne!(na, nb);
    }

    #[test]
    fn pane_titles_round_trip(state in state(), sub in "[A-Za-z0-9_-]{1,16}") {
        let title = pane_title(&sub, state);
        prop_assert_eq!(parse_pane_title(&title), Some((sub.as_str(), state)));
    }
}
