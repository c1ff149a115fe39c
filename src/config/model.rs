// src/config/model.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::tools::Installation;
use crate::types::Nature;

/// Default name of the matrix axis that selects the Python installation.
pub const DEFAULT_PYTHON_AXIS: &str = "PYTHON";

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [config]
/// python_axis = "PYTHON"
///
/// [[installation]]
/// name = "CPython-3.12"
/// home = "/opt/python/3.12"
///
/// [axis]
/// TOTO = "TUTU"
///
/// [[step]]
/// name = "hello"
/// python = "CPython-3.12"
/// command = "echo hello"
/// ignore_exit_code = true
/// ```
///
/// This is the unchecked form; use [`ConfigFile`] (via `TryFrom`) everywhere
/// else.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub config: ConfigSection,

    /// Known Python installations, in declaration order.
    #[serde(default)]
    pub installation: Vec<Installation>,

    /// Matrix axis values for this build (one value per axis).
    #[serde(default)]
    pub axis: BTreeMap<String, String>,

    /// Build steps, run in declaration order.
    #[serde(default)]
    pub step: Vec<StepConfig>,
}

/// Validated configuration.
///
/// Only obtainable through `ConfigFile::try_from(raw)`, so code holding one
/// can rely on unique names and non-empty commands.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub config: ConfigSection,
    pub installation: Vec<Installation>,
    pub axis: BTreeMap<String, String>,
    pub step: Vec<StepConfig>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(raw: RawConfigFile) -> Self {
        Self {
            config: raw.config,
            installation: raw.installation,
            axis: raw.axis,
            step: raw.step,
        }
    }

    /// Convert back to the serializable form.
    pub fn to_raw(&self) -> RawConfigFile {
        RawConfigFile {
            config: self.config.clone(),
            installation: self.installation.clone(),
            axis: self.axis.clone(),
            step: self.step.clone(),
        }
    }

    /// Look up a step by its effective name.
    pub fn find_step(&self, name: &str) -> Option<(usize, &StepConfig)> {
        self.step
            .iter()
            .enumerate()
            .find(|(idx, s)| s.effective_name(*idx) == name)
    }
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConfigSection {
    /// Name of the axis whose value selects the installation when a step
    /// has no explicit `python`.
    #[serde(default = "default_python_axis")]
    pub python_axis: String,

    /// Working directory for the steps, relative to the config file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workdir: Option<String>,
}

fn default_python_axis() -> String {
    DEFAULT_PYTHON_AXIS.to_string()
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            python_axis: default_python_axis(),
            workdir: None,
        }
    }
}

/// `[[step]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StepConfig {
    /// Display name; defaults to `step-<index>` (1-based).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Installation to use. If unset (or blank), the python axis decides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub python: Option<String>,

    pub command: String,

    #[serde(default)]
    pub ignore_exit_code: bool,

    #[serde(default)]
    pub nature: Nature,
}

impl StepConfig {
    pub fn effective_name(&self, index: usize) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("step-{}", index + 1),
        }
    }
}
