// src/engine/mod.rs

//! Build step engine.
//!
//! A step runs through a small state machine:
//!
//! ```text
//! Pending -> Resolving -> Composing -> Executing -> Classified
//!               |            |            |
//!               v            v            +-> FailedExecution
//!      FailedResolution  FailedComposition +-> Cancelled
//! ```
//!
//! - [`step`] implements it for Python steps ([`PythonBuilder`]).
//! - [`classify`] maps exit codes to results.
//! - [`build`] runs the steps of one build in order.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use crate::config::DEFAULT_PYTHON_AXIS;
use crate::env::{AxisBinding, Environment};
use crate::exec::CancelSignal;
use crate::types::{BuildResult, Nature};

pub mod build;
pub mod classify;
pub mod step;

pub use build::{build_contexts, Build, BuildSummary};
pub use classify::classify;
pub use step::PythonBuilder;

/// Everything one step invocation needs, assembled once by the host.
#[derive(Debug, Clone)]
pub struct BuildContext {
    pub step_name: String,
    /// Installation configured on the step; `None` defers to the python axis.
    pub explicit_installation: Option<String>,
    pub command: String,
    pub nature: Nature,
    pub ignore_exit_code: bool,
    pub axis_bindings: Vec<AxisBinding>,
    pub ambient: Environment,
    /// Axis whose value names the installation.
    pub python_axis: String,
    pub working_dir: PathBuf,
}

impl BuildContext {
    /// Context with an empty environment, no axes and default settings.
    pub fn new(step_name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            step_name: step_name.into(),
            explicit_installation: None,
            command: command.into(),
            nature: Nature::Shell,
            ignore_exit_code: false,
            axis_bindings: Vec::new(),
            ambient: Environment::new(),
            python_axis: DEFAULT_PYTHON_AXIS.to_string(),
            working_dir: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    Pending,
    Resolving,
    FailedResolution,
    Composing,
    FailedComposition,
    Executing,
    FailedExecution,
    Classified,
    Cancelled,
}

impl StepState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            StepState::FailedResolution
                | StepState::FailedComposition
                | StepState::FailedExecution
                | StepState::Classified
                | StepState::Cancelled
        )
    }
}

/// Process outcome of a step that got as far as running its command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutcome {
    pub exit_code: i32,
    pub combined_log: String,
    pub result: BuildResult,
}

/// What a step reports back to the build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub step: String,
    /// Terminal state reached.
    pub state: StepState,
    pub result: BuildResult,
    /// Present once the command has run (also when cancelled mid-run).
    pub outcome: Option<ExecutionOutcome>,
}

/// A build step: one `run` per invocation, variants differ by context.
pub trait BuildStep: Send + Sync {
    fn run<'a>(
        &'a self,
        ctx: &'a BuildContext,
        cancel: CancelSignal,
    ) -> Pin<Box<dyn Future<Output = StepReport> + Send + 'a>>;
}
