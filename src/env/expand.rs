// src/env/expand.rs

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::env::Environment;

static VAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}|\$([A-Za-z_][A-Za-z0-9_]*)")
        .expect("variable pattern is valid")
});

/// Replace `$VAR` and `${VAR}` with values from `env`.
///
/// Unknown variables are left as written.
pub fn expand_vars(input: &str, env: &Environment) -> String {
    VAR_RE
        .replace_all(input, |caps: &Captures<'_>| {
            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str())
                .unwrap_or_default();
            match env.get(name) {
                Some(value) => value.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env() -> Environment {
        let mut env = Environment::new();
        env.set("TOOLS", "/opt/tools");
        env.set("VER", "3.12");
        env
    }

    #[test]
    fn expands_both_forms() {
        assert_eq!(
            expand_vars("$TOOLS/python-${VER}", &env()),
            "/opt/tools/python-3.12"
        );
    }

    #[test]
    fn unknown_variables_are_kept() {
        assert_eq!(expand_vars("$NOPE/${ALSO_NOPE}", &env()), "$NOPE/${ALSO_NOPE}");
    }

    #[test]
    fn plain_paths_are_untouched() {
        assert_eq!(expand_vars("/usr", &env()), "/usr");
    }
}
