// src/env/compose.rs

//! Environment composition for a single step.
//!
//! Merge order, later wins:
//! 1. the ambient environment of the build,
//! 2. tool variables (`PYTHON_HOME`, `PYTHON_EXE`, `PATH` prefix),
//! 3. matrix axis bindings.

use std::env;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::engine::BuildContext;
use crate::env::{expand_vars, Environment, PATH_VAR, PYTHON_EXE_VAR, PYTHON_HOME_VAR};
use crate::errors::CompositionError;
use crate::tools::Installation;

pub fn compose(
    installation: &Installation,
    ctx: &BuildContext,
) -> Result<Environment, CompositionError> {
    let home = expand_vars(&installation.home, &ctx.ambient);
    if home.chars().any(char::is_whitespace) {
        return Err(CompositionError::UnsafeHomePath(home));
    }

    let mut env = ctx.ambient.clone();

    env.set(PYTHON_HOME_VAR, home.as_str());
    env.set(
        PYTHON_EXE_VAR,
        interpreter_path(Path::new(&home)).to_string_lossy(),
    );
    let path = prefixed_path(Path::new(&home), env.get(PATH_VAR))?;
    env.set(PATH_VAR, path);

    for binding in ctx.axis_bindings.iter() {
        if let Some(previous) = env.set(binding.name.as_str(), binding.value.as_str()) {
            debug!(
                axis = %binding.name,
                previous = %previous,
                "axis binding overrides inherited variable"
            );
        }
    }

    Ok(env)
}

/// Interpreter inside an installation home.
pub fn interpreter_path(home: &Path) -> PathBuf {
    if cfg!(windows) {
        home.join("python.exe")
    } else {
        home.join("bin").join("python")
    }
}

fn tool_path_entries(home: &Path) -> Vec<PathBuf> {
    if cfg!(windows) {
        vec![home.to_path_buf(), home.join("Scripts")]
    } else {
        vec![home.join("bin")]
    }
}

fn prefixed_path(home: &Path, inherited: Option<&str>) -> Result<String, CompositionError> {
    let mut entries = tool_path_entries(home);
    if let Some(inherited) = inherited.filter(|p| !p.is_empty()) {
        entries.extend(env::split_paths(inherited));
    }
    let joined = env::join_paths(entries)
        .map_err(|_| CompositionError::UnusablePathEntry(home.to_string_lossy().into_owned()))?;
    Ok(joined.to_string_lossy().into_owned())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::env::AxisBinding;

    fn ctx(ambient: Environment, axes: Vec<AxisBinding>) -> BuildContext {
        BuildContext {
            axis_bindings: axes,
            ambient,
            ..BuildContext::new("step-1", "echo hello")
        }
    }

    #[test]
    fn tool_variables_are_set() {
        let mut ambient = Environment::new();
        ambient.set("PATH", "/usr/bin:/bin");
        let env = compose(&Installation::new("CPython", "/opt/py"), &ctx(ambient, vec![])).unwrap();

        assert_eq!(env.get("PYTHON_HOME"), Some("/opt/py"));
        assert_eq!(env.get("PYTHON_EXE"), Some("/opt/py/bin/python"));
        assert_eq!(env.get("PATH"), Some("/opt/py/bin:/usr/bin:/bin"));
    }

    #[test]
    fn missing_path_is_created() {
        let env = compose(
            &Installation::new("CPython", "/opt/py"),
            &ctx(Environment::new(), vec![]),
        )
        .unwrap();
        assert_eq!(env.get("PATH"), Some("/opt/py/bin"));
    }

    #[test]
    fn axis_bindings_win_over_ambient_and_tool_vars() {
        let mut ambient = Environment::new();
        ambient.set("TOTO", "ambient");
        ambient.set("KEEP", "me");
        let env = compose(
            &Installation::new("CPython", "/opt/py"),
            &ctx(
                ambient,
                vec![
                    AxisBinding::new("TOTO", "TUTU"),
                    AxisBinding::new("PYTHON_HOME", "/elsewhere"),
                ],
            ),
        )
        .unwrap();

        assert_eq!(env.get("TOTO"), Some("TUTU"));
        assert_eq!(env.get("KEEP"), Some("me"));
        assert_eq!(env.get("PYTHON_HOME"), Some("/elsewhere"));
    }

    #[test]
    fn path_keeps_every_inherited_entry() {
        let mut ambient = Environment::new();
        ambient.set("PATH", "/usr/local/bin::/bin");
        let env = compose(&Installation::new("CPython", "/opt/py"), &ctx(ambient, vec![])).unwrap();
        assert_eq!(env.get("PATH"), Some("/opt/py/bin:/usr/local/bin::/bin"));
    }

    #[test]
    fn inherited_path_found_under_any_case_when_names_fold() {
        let mut ambient = Environment::case_insensitive();
        ambient.set("Path", "/usr/bin");
        let env = compose(&Installation::new("CPython", "/opt/py"), &ctx(ambient, vec![])).unwrap();

        assert_eq!(env.get("PATH"), Some("/opt/py/bin:/usr/bin"));
        assert_eq!(env.iter().filter(|(k, _)| k.eq_ignore_ascii_case("path")).count(), 1);
    }

    #[test]
    fn home_containing_path_separator_is_rejected() {
        let err = compose(
            &Installation::new("Python", "/opt/py:evil"),
            &ctx(Environment::new(), vec![]),
        )
        .unwrap_err();
        assert_eq!(err, CompositionError::UnusablePathEntry("/opt/py:evil".into()));
    }

    #[test]
    fn whitespace_in_home_is_rejected() {
        let err = compose(
            &Installation::new("Python", "/tmp/bad move"),
            &ctx(Environment::new(), vec![]),
        )
        .unwrap_err();
        assert_eq!(err, CompositionError::UnsafeHomePath("/tmp/bad move".into()));
    }

    #[test]
    fn home_is_expanded_before_whitespace_check() {
        let mut ambient = Environment::new();
        ambient.set("TOOLS", "/opt/my tools");
        let err = compose(
            &Installation::new("Python", "$TOOLS/py"),
            &ctx(ambient.clone(), vec![]),
        )
        .unwrap_err();
        assert_eq!(err, CompositionError::UnsafeHomePath("/opt/my tools/py".into()));

        ambient.set("TOOLS", "/opt/tools");
        let env = compose(&Installation::new("Python", "${TOOLS}/py"), &ctx(ambient, vec![])).unwrap();
        assert_eq!(env.get("PYTHON_HOME"), Some("/opt/tools/py"));
    }
}
