use proptest::prelude::*;

use pystep::engine::{classify, BuildContext};
use pystep::env::{compose, AxisBinding, Environment};
use pystep::tools::Installation;
use pystep::types::BuildResult;

fn var_name() -> impl Strategy<Value = String> {
    "[A-Z][A-Z0-9_]{0,6}"
}

proptest! {
    #[test]
    fn ignored_exit_codes_always_succeed(code in any::<i32>()) {
        prop_assert_eq!(classify(code, true), BuildResult::Success);
    }

    #[test]
    fn considered_exit_codes_succeed_only_on_zero(code in any::<i32>()) {
        let expected = if code == 0 { BuildResult::Success } else { BuildResult::Failure };
        prop_assert_eq!(classify(code, false), expected);
    }

    #[test]
    fn axis_bindings_are_always_visible(
        ambient in prop::collection::btree_map(var_name(), "[a-z0-9]{0,8}", 0..8),
        axes in prop::collection::btree_map(var_name(), "[a-z0-9]{0,8}", 0..8),
    ) {
        let ctx = BuildContext {
            ambient: ambient.clone().into_iter().collect::<Environment>(),
            axis_bindings: axes
                .iter()
                .map(|(k, v)| AxisBinding::new(k.as_str(), v.as_str()))
                .collect(),
            ..BuildContext::new("prop", "true")
        };
        let env = compose(&Installation::new("CPython", "/opt/py"), &ctx).unwrap();

        for (name, value) in axes.iter() {
            prop_assert_eq!(env.get(name), Some(value.as_str()));
        }
        for (name, value) in ambient.iter() {
            let overridden = axes.contains_key(name)
                || ["PATH", "PYTHON_HOME", "PYTHON_EXE"].contains(&name.as_str());
            if !overridden {
                prop_assert_eq!(env.get(name), Some(value.as_str()));
            }
        }
    }

    #[test]
    fn whitespace_homes_never_compose(prefix in "[a-z/]{0,8}", suffix in "[a-z/]{0,8}", ws in "[ \t]") {
        let home = format!("/{prefix}{ws}{suffix}");
        let ctx = BuildContext::new("prop", "true");
        prop_assert!(compose(&Installation::new("CPython", home), &ctx).is_err());
    }
}
