// src/errors.rs

//! Crate-wide error types.
//!
//! [`PystepError`] covers the application surface (config loading, CLI
//! wiring). The per-step errors ([`ResolutionError`], [`CompositionError`],
//! [`ExecutionError`]) never escape a build: the pipeline turns each of them
//! into a `FAILURE` result plus a diagnostic line in the build log.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PystepError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Step not found: {0}")]
    StepNotFound(String),

    #[error("Invalid axis binding: {0}")]
    InvalidAxis(String),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerError(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, PystepError>;

/// Failure to pick a Python installation for a step.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error(
        "Python installation '{requested}' not found, available installations: {}",
        .known.join(", ")
    )]
    NotFound {
        requested: String,
        known: Vec<String>,
    },

    #[error("No Python installation configured for this build")]
    NoInstallationConfigured,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompositionError {
    #[error("Python home contains whitespace, which is not supported: '{0}'")]
    UnsafeHomePath(String),

    #[error("Python home cannot be added to PATH: '{0}'")]
    UnusablePathEntry(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    #[error("Failed to start command: {0}")]
    SpawnFailed(String),
}

/// Any error that terminates a single step before classification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StepError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Composition(#[from] CompositionError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),
}
