// src/config/mod.rs

//! Configuration loading and validation for pystep.
//!
//! - `model.rs`: the TOML-backed data model.
//! - `loader.rs`: reading and writing config files.
//! - `validate.rs`: semantic checks (`RawConfigFile` -> `ConfigFile`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{ConfigFile, ConfigSection, RawConfigFile, StepConfig, DEFAULT_PYTHON_AXIS};
