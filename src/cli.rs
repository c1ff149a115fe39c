// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::loader::default_config_path;
use crate::env::AxisBinding;

/// Command-line arguments for `pystep`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "pystep",
    version,
    about = "Run build steps against configured Python installations.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    #[arg(long, value_name = "PATH", default_value_os_t = default_config_path())]
    pub config: PathBuf,

    /// Matrix axis value for this build, as NAME=VALUE. Repeatable;
    /// overrides `[axis]` entries of the same name.
    #[arg(long = "axis", value_name = "NAME=VALUE")]
    pub axes: Vec<AxisBinding>,

    /// Run only the step with this name.
    #[arg(long, value_name = "NAME")]
    pub step: Option<String>,

    /// Working directory for the steps (overrides `[config].workdir`).
    #[arg(long, value_name = "DIR")]
    pub workdir: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PYSTEP_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the build plan, but don't execute anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

pub fn parse() -> CliArgs {
    CliArgs::parse()
}
