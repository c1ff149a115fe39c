// src/tools/installation.rs

//! Python installations and the registry they are looked up in.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

/// A named reference to a Python install location.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Installation {
    pub name: String,
    /// Install prefix. May reference ambient variables as `$VAR` / `${VAR}`.
    pub home: String,
}

impl Installation {
    pub fn new(name: impl Into<String>, home: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            home: home.into(),
        }
    }
}

/// Read-only source of installations.
///
/// Shared between concurrent builds, hence `Send + Sync`.
pub trait InstallationRegistry: Send + Sync + Debug {
    fn lookup(&self, name: &str) -> Option<Installation>;

    /// Names of every known installation, in registration order.
    fn list_names(&self) -> Vec<String>;

    fn is_empty(&self) -> bool {
        self.list_names().is_empty()
    }
}

/// Registry backed by the `[[installation]]` entries of a config file.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredRegistry {
    installations: Vec<Installation>,
}

impl ConfiguredRegistry {
    pub fn new(installations: Vec<Installation>) -> Self {
        Self { installations }
    }
}

impl InstallationRegistry for ConfiguredRegistry {
    fn lookup(&self, name: &str) -> Option<Installation> {
        self.installations.iter().find(|i| i.name == name).cloned()
    }

    fn list_names(&self) -> Vec<String> {
        self.installations.iter().map(|i| i.name.clone()).collect()
    }

    fn is_empty(&self) -> bool {
        self.installations.is_empty()
    }
}
