// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod env;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod report;
pub mod tools;
pub mod types;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::model::ConfigFile;
use crate::engine::{build_contexts, Build, BuildContext, PythonBuilder};
use crate::env::Environment;
use crate::exec::{cancel_channel, ShellExecutor};
use crate::report::{ConsoleSink, LogSink};
use crate::tools::ConfiguredRegistry;
use crate::types::BuildResult;

/// Variable exposing the build's working directory to the steps.
pub const WORKSPACE_VAR: &str = "WORKSPACE";

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - axis bindings and ambient environment
/// - the Python step pipeline with the shell executor
/// - Ctrl-C cancellation
///
/// Returns the overall build result.
pub async fn run(args: CliArgs) -> Result<BuildResult> {
    let config_path = args.config.clone();
    let cfg = load_and_validate(&config_path)?;

    let working_dir = resolve_working_dir(&config_path, &cfg, args.workdir.as_deref());

    let mut ambient = Environment::from_process();
    ambient.set(WORKSPACE_VAR, working_dir.to_string_lossy());

    let contexts = build_contexts(
        &cfg,
        &args.axes,
        &ambient,
        &working_dir,
        args.step.as_deref(),
    )?;

    if args.dry_run {
        print_dry_run(&cfg, &contexts);
        return Ok(BuildResult::Success);
    }

    let registry = Arc::new(ConfiguredRegistry::new(cfg.installation.clone()));
    let sink: Arc<dyn LogSink> = Arc::new(ConsoleSink);
    let builder = PythonBuilder::new(registry, Arc::new(ShellExecutor::new()), Arc::clone(&sink));

    // Ctrl-C -> cancel the running step and abort the build.
    let (cancel_handle, cancel) = cancel_channel();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("failed to listen for Ctrl+C: {e}");
            return;
        }
        info!("Ctrl+C received; aborting build");
        cancel_handle.cancel();
    });

    info!(
        steps = contexts.len(),
        workdir = %working_dir.display(),
        "starting build"
    );

    let build = Build::new(Arc::new(builder), contexts, sink);
    let summary = build.run(cancel).await;
    Ok(summary.result)
}

/// Working directory for the steps.
///
/// `--workdir` wins over `[config].workdir`; a relative `[config].workdir`
/// is taken relative to the config file. Without either, the directory of
/// the config file (or `.` for a bare filename) is used.
fn resolve_working_dir(config_path: &Path, cfg: &ConfigFile, cli_workdir: Option<&str>) -> PathBuf {
    if let Some(dir) = cli_workdir {
        return PathBuf::from(dir);
    }
    let root = config_root_dir(config_path);
    match cfg.config.workdir.as_deref() {
        Some(dir) if Path::new(dir).is_absolute() => PathBuf::from(dir),
        Some(dir) => root.join(dir),
        None => root,
    }
}

fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

fn print_dry_run(cfg: &ConfigFile, contexts: &[BuildContext]) {
    println!("pystep dry-run");
    println!("  config.python_axis = {}", cfg.config.python_axis);
    println!();

    println!("installations ({}):", cfg.installation.len());
    for inst in cfg.installation.iter() {
        println!("  - {} ({})", inst.name, inst.home);
    }
    println!();

    println!("steps ({}):", contexts.len());
    for ctx in contexts {
        println!("  - {}", ctx.step_name);
        println!("      command: {}", ctx.command);
        match ctx.explicit_installation.as_deref() {
            Some(name) => println!("      python: {name}"),
            None => println!("      python: <axis {}>", ctx.python_axis),
        }
        if ctx.ignore_exit_code {
            println!("      ignore_exit_code: true");
        }
        println!("      nature: {}", ctx.nature);
        if !ctx.axis_bindings.is_empty() {
            let axes: Vec<String> = ctx.axis_bindings.iter().map(|b| b.to_string()).collect();
            println!("      axes: {}", axes.join(", "));
        }
        println!("      workdir: {}", ctx.working_dir.display());
    }

    debug!("dry-run complete (no execution)");
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::config::{ConfigSection, RawConfigFile, StepConfig};
    use crate::types::Nature;

    fn cfg(workdir: Option<&str>) -> ConfigFile {
        ConfigFile::try_from(RawConfigFile {
            config: ConfigSection {
                workdir: workdir.map(str::to_string),
                ..ConfigSection::default()
            },
            installation: vec![],
            axis: Default::default(),
            step: vec![StepConfig {
                name: None,
                python: None,
                command: "echo hello".into(),
                ignore_exit_code: false,
                nature: Nature::Shell,
            }],
        })
        .unwrap()
    }

    #[test]
    fn workdir_precedence() {
        let path = Path::new("/proj/Pystep.toml");
        assert_eq!(resolve_working_dir(path, &cfg(None), None), PathBuf::from("/proj"));
        assert_eq!(
            resolve_working_dir(path, &cfg(Some("build")), None),
            PathBuf::from("/proj/build")
        );
        assert_eq!(
            resolve_working_dir(path, &cfg(Some("build")), Some("/elsewhere")),
            PathBuf::from("/elsewhere")
        );
    }
}
