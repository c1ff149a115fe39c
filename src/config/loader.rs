// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file and return the raw, unvalidated model.
///
/// Use [`load_and_validate`] unless you specifically need the raw form.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and validate it.
///
/// Checks for:
/// - at least one step,
/// - unique, non-empty installation names and non-empty homes,
/// - unique step names and non-empty commands,
/// - a non-empty python axis name.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    debug!(
        path = %path.as_ref().display(),
        steps = config.step.len(),
        installations = config.installation.len(),
        "configuration loaded"
    );
    Ok(config)
}

impl ConfigFile {
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(&self.to_raw())?)
    }

    /// Write the configuration back to disk.
    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let contents = self.to_toml_string()?;
        fs::write(path, contents)?;
        Ok(())
    }
}

/// `Pystep.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Pystep.toml")
}
