// src/env/mod.rs

//! Build environment assembly.
//!
//! - [`Environment`]: a sorted, deterministic variable snapshot.
//! - [`AxisBinding`]: a matrix axis value for the current build.
//! - [`compose`]: merges ambient variables, tool variables and axis bindings.
//! - [`expand`]: `$VAR` / `${VAR}` substitution for installation homes.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::errors::PystepError;

pub mod compose;
pub mod expand;

pub use compose::compose;
pub use expand::expand_vars;

/// Name of the search path variable.
pub const PATH_VAR: &str = "PATH";
/// Points at the resolved installation's home.
pub const PYTHON_HOME_VAR: &str = "PYTHON_HOME";
/// Points at the resolved interpreter.
pub const PYTHON_EXE_VAR: &str = "PYTHON_EXE";

/// Environment variables for a child process.
///
/// Names are case-insensitive on Windows (`Path` and `PATH` are the same
/// variable there). A name keeps the spelling it was first inserted with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<String, String>,
    ignore_case: bool,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            vars: BTreeMap::new(),
            ignore_case: cfg!(windows),
        }
    }
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty environment that compares names case-insensitively, whatever
    /// the host platform.
    pub fn case_insensitive() -> Self {
        Self {
            ignore_case: true,
            ..Self::default()
        }
    }

    /// Snapshot of the current process environment.
    ///
    /// Variables that are not valid unicode are skipped.
    pub fn from_process() -> Self {
        let mut env = Self::new();
        env.extend_os(std::env::vars_os());
        env
    }

    /// Add OS-level variables, skipping (and logging) any that are not
    /// valid unicode.
    pub fn extend_os<I>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        for (key, value) in vars {
            match (key.into_string(), value.into_string()) {
                (Ok(key), Ok(value)) => {
                    self.set(key, value);
                }
                (Ok(key), Err(_)) => {
                    debug!(var = %key, "skipping environment variable with non-unicode value");
                }
                (Err(key), _) => {
                    debug!(
                        var = %key.to_string_lossy(),
                        "skipping environment variable with non-unicode name"
                    );
                }
            }
        }
    }

    /// The stored spelling of `key`, if present.
    fn stored_key(&self, key: &str) -> Option<&String> {
        if self.ignore_case {
            self.vars.keys().find(|k| k.eq_ignore_ascii_case(key))
        } else {
            self.vars.get_key_value(key).map(|(k, _)| k)
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        let key = self.stored_key(key)?;
        self.vars.get(key).map(String::as_str)
    }

    /// Insert a variable, returning the previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let key = self.stored_key(&key).cloned().unwrap_or(key);
        self.vars.insert(key, value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let key = self.stored_key(key)?.clone();
        self.vars.remove(&key)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for Environment {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut env = Self::new();
        for (key, value) in iter {
            env.set(key, value);
        }
        env
    }
}

/// One matrix axis value for the current build, e.g. `TOTO=TUTU`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisBinding {
    pub name: String,
    pub value: String,
}

impl AxisBinding {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for AxisBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

impl FromStr for AxisBinding {
    type Err = PystepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, value) = s.split_once('=').ok_or_else(|| {
            PystepError::InvalidAxis(format!("expected NAME=VALUE, got '{s}'"))
        })?;
        let name = name.trim();
        if name.is_empty() {
            return Err(PystepError::InvalidAxis(format!(
                "axis name must not be empty in '{s}'"
            )));
        }
        Ok(AxisBinding::new(name, value))
    }
}

/// Merge `overrides` into `base`: a binding whose name already exists
/// replaces it in place, new names are appended.
pub fn merge_axis_bindings(base: &mut Vec<AxisBinding>, overrides: &[AxisBinding]) {
    for binding in overrides {
        match base.iter_mut().find(|b| b.name == binding.name) {
            Some(existing) => existing.value = binding.value.clone(),
            None => base.push(binding.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_binding_parses_name_value() {
        let b: AxisBinding = "TOTO=TUTU".parse().unwrap();
        assert_eq!(b, AxisBinding::new("TOTO", "TUTU"));

        // Only the first '=' separates.
        let b: AxisBinding = "OPTS=a=b".parse().unwrap();
        assert_eq!(b.value, "a=b");
    }

    #[test]
    fn axis_binding_rejects_missing_separator() {
        assert!(matches!(
            "TOTO".parse::<AxisBinding>(),
            Err(PystepError::InvalidAxis(_))
        ));
        assert!("=TUTU".parse::<AxisBinding>().is_err());
    }

    #[test]
    fn case_insensitive_names_share_one_entry() {
        let mut env = Environment::case_insensitive();
        env.set("Path", "C:\\Windows\\system32");

        assert_eq!(env.get("PATH"), Some("C:\\Windows\\system32"));
        assert_eq!(env.set("PATH", "C:\\py"), Some("C:\\Windows\\system32".to_string()));
        assert_eq!(env.len(), 1);
        assert_eq!(env.iter().collect::<Vec<_>>(), vec![("Path", "C:\\py")]);

        assert_eq!(env.remove("path"), Some("C:\\py".to_string()));
        assert!(env.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn names_are_case_sensitive_on_unix() {
        let mut env = Environment::new();
        env.set("Path", "a");
        env.set("PATH", "b");
        assert_eq!(env.len(), 2);
        assert_eq!(env.get("Path"), Some("a"));
    }

    #[cfg(unix)]
    #[test]
    fn non_unicode_variables_are_skipped() {
        use std::os::unix::ffi::OsStringExt;

        let mut env = Environment::new();
        env.extend_os([
            (OsString::from("GOOD"), OsString::from("yes")),
            (OsString::from("BAD_VALUE"), OsString::from_vec(vec![0xff, 0xfe])),
            (OsString::from_vec(vec![b'X', 0xff]), OsString::from("v")),
        ]);

        assert_eq!(env.len(), 1);
        assert_eq!(env.get("GOOD"), Some("yes"));
        assert_eq!(env.get("BAD_VALUE"), None);
    }

    #[test]
    fn merge_overrides_in_place() {
        let mut base = vec![AxisBinding::new("A", "1"), AxisBinding::new("B", "2")];
        merge_axis_bindings(
            &mut base,
            &[AxisBinding::new("B", "3"), AxisBinding::new("C", "4")],
        );
        assert_eq!(
            base,
            vec![
                AxisBinding::new("A", "1"),
                AxisBinding::new("B", "3"),
                AxisBinding::new("C", "4"),
            ]
        );
    }
}
