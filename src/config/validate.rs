// src/config/validate.rs

use std::collections::HashSet;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{PystepError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = PystepError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_has_steps(cfg)?;
    validate_global_config(cfg)?;
    validate_installations(cfg)?;
    validate_steps(cfg)?;
    Ok(())
}

fn ensure_has_steps(cfg: &RawConfigFile) -> Result<()> {
    if cfg.step.is_empty() {
        return Err(PystepError::ConfigError(
            "config must contain at least one [[step]] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_global_config(cfg: &RawConfigFile) -> Result<()> {
    if cfg.config.python_axis.trim().is_empty() {
        return Err(PystepError::ConfigError(
            "[config].python_axis must not be empty".to_string(),
        ));
    }
    Ok(())
}

// Whitespace in `home` is deliberately not checked here: it is reported in
// the build log of the step that uses the installation.
fn validate_installations(cfg: &RawConfigFile) -> Result<()> {
    let mut seen = HashSet::new();
    for inst in cfg.installation.iter() {
        if inst.name.trim().is_empty() {
            return Err(PystepError::ConfigError(
                "installation name must not be empty".to_string(),
            ));
        }
        if inst.home.trim().is_empty() {
            return Err(PystepError::ConfigError(format!(
                "installation '{}' has an empty home",
                inst.name
            )));
        }
        if !seen.insert(inst.name.as_str()) {
            return Err(PystepError::ConfigError(format!(
                "duplicate installation name '{}'",
                inst.name
            )));
        }
    }
    Ok(())
}

fn validate_steps(cfg: &RawConfigFile) -> Result<()> {
    let mut seen = HashSet::new();
    for (idx, step) in cfg.step.iter().enumerate() {
        let name = step.effective_name(idx);
        if step.command.trim().is_empty() {
            return Err(PystepError::ConfigError(format!(
                "step '{}' has an empty command",
                name
            )));
        }
        if !seen.insert(name.clone()) {
            return Err(PystepError::ConfigError(format!(
                "duplicate step name '{}'",
                name
            )));
        }
    }
    Ok(())
}
