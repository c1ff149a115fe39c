// src/engine/build.rs

//! Sequencing the steps of a single build.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::config::ConfigFile;
use crate::engine::{BuildContext, BuildStep, StepReport};
use crate::env::{merge_axis_bindings, AxisBinding, Environment};
use crate::errors::{PystepError, Result};
use crate::exec::CancelSignal;
use crate::report::{LogSink, StepEvent};
use crate::types::BuildResult;

/// Result of a whole build.
#[derive(Debug, Clone)]
pub struct BuildSummary {
    pub result: BuildResult,
    /// Reports of the steps that ran, in order.
    pub reports: Vec<StepReport>,
    /// Steps that were not run because an earlier step did not succeed.
    pub skipped: Vec<String>,
}

/// A build: an ordered list of step invocations sharing one `BuildStep`.
pub struct Build {
    step: Arc<dyn BuildStep>,
    contexts: Vec<BuildContext>,
    sink: Arc<dyn LogSink>,
}

impl Build {
    pub fn new(step: Arc<dyn BuildStep>, contexts: Vec<BuildContext>, sink: Arc<dyn LogSink>) -> Self {
        Self {
            step,
            contexts,
            sink,
        }
    }

    /// Run every step in order, stopping at the first step that does not
    /// succeed. Always ends the log with `Finished: <RESULT>`.
    pub async fn run(&self, cancel: CancelSignal) -> BuildSummary {
        let mut result = BuildResult::Success;
        let mut reports = Vec::with_capacity(self.contexts.len());
        let mut skipped = Vec::new();

        for ctx in self.contexts.iter() {
            if !result.is_success() {
                self.sink.event(&StepEvent::StepSkipped {
                    step: ctx.step_name.clone(),
                });
                skipped.push(ctx.step_name.clone());
                continue;
            }

            let report = self.step.run(ctx, cancel.clone()).await;
            result = result.combine(report.result);
            reports.push(report);
        }

        info!(%result, steps = reports.len(), skipped = skipped.len(), "build finished");
        self.sink.event(&StepEvent::BuildFinished { result });

        BuildSummary {
            result,
            reports,
            skipped,
        }
    }
}

/// Assemble one `BuildContext` per configured step.
///
/// Axis bindings come from `[axis]` first, then `cli_axes` (which override
/// config values of the same name). With `only_step`, just that step is
/// returned.
pub fn build_contexts(
    cfg: &ConfigFile,
    cli_axes: &[AxisBinding],
    ambient: &Environment,
    working_dir: &Path,
    only_step: Option<&str>,
) -> Result<Vec<BuildContext>> {
    let mut axes: Vec<AxisBinding> = cfg
        .axis
        .iter()
        .map(|(name, value)| AxisBinding::new(name.as_str(), value.as_str()))
        .collect();
    merge_axis_bindings(&mut axes, cli_axes);

    if let Some(name) = only_step {
        if cfg.find_step(name).is_none() {
            return Err(PystepError::StepNotFound(name.to_string()));
        }
    }

    let contexts = cfg
        .step
        .iter()
        .enumerate()
        .map(|(idx, step)| (step.effective_name(idx), step))
        .filter(|(name, _)| only_step.is_none_or(|only| only == name))
        .map(|(step_name, step)| BuildContext {
            step_name,
            explicit_installation: step.python.clone(),
            command: step.command.clone(),
            nature: step.nature,
            ignore_exit_code: step.ignore_exit_code,
            axis_bindings: axes.clone(),
            ambient: ambient.clone(),
            python_axis: cfg.config.python_axis.clone(),
            working_dir: working_dir.to_path_buf(),
        })
        .collect();

    Ok(contexts)
}
