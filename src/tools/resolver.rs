// src/tools/resolver.rs

//! Picking the installation a step runs against.
//!
//! Precedence:
//! 1. the step's explicit `python` name (blank counts as unset),
//! 2. the value of the python axis binding.
//!
//! An empty registry short-circuits to `NoInstallationConfigured`, even when
//! an explicit name is given.

use tracing::debug;

use crate::env::AxisBinding;
use crate::errors::ResolutionError;
use crate::tools::{Installation, InstallationRegistry};

pub fn resolve(
    registry: &dyn InstallationRegistry,
    explicit_name: Option<&str>,
    axis_bindings: &[AxisBinding],
    python_axis: &str,
) -> Result<Installation, ResolutionError> {
    if registry.is_empty() {
        return Err(ResolutionError::NoInstallationConfigured);
    }

    let explicit = explicit_name.map(str::trim).filter(|n| !n.is_empty());

    let requested = match explicit {
        Some(name) => name,
        None => axis_bindings
            .iter()
            .find(|b| b.name == python_axis)
            .map(|b| b.value.as_str())
            .ok_or(ResolutionError::NoInstallationConfigured)?,
    };

    debug!(
        requested,
        from_axis = explicit.is_none(),
        "resolving Python installation"
    );

    registry
        .lookup(requested)
        .ok_or_else(|| ResolutionError::NotFound {
            requested: requested.to_string(),
            known: registry.list_names(),
        })
}
