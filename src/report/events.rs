// src/report/events.rs

//! Structured build log events.
//!
//! Every line pystep itself writes to a build log originates from a
//! [`StepEvent`]. Tests match on the variants; [`fmt::Display`] gives the
//! human-readable rendering used by the console sink.

use std::fmt;

use crate::errors::StepError;
use crate::types::{BuildResult, Nature};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepEvent {
    StepStarted {
        step: String,
        command: String,
        nature: Nature,
    },
    InstallationResolved {
        step: String,
        installation: String,
        home: String,
    },
    /// The step failed before or while spawning its command.
    StepFailed { step: String, error: StepError },
    ExitCode {
        step: String,
        code: i32,
        ignored: bool,
    },
    StepFinished { step: String, result: BuildResult },
    StepAborted { step: String },
    StepSkipped { step: String },
    /// Terminal line of a build.
    BuildFinished { result: BuildResult },
}

impl fmt::Display for StepEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepEvent::StepStarted {
                step,
                command,
                nature,
            } => write!(f, "[{step}] $ ({nature}) {command}"),
            StepEvent::InstallationResolved {
                step,
                installation,
                home,
            } => write!(f, "[{step}] using Python installation '{installation}' ({home})"),
            StepEvent::StepFailed { step, error } => write!(f, "[{step}] ERROR: {error}"),
            StepEvent::ExitCode {
                step,
                code,
                ignored: true,
            } => write!(f, "[{step}] command exited with code {code} (ignored)"),
            StepEvent::ExitCode {
                step,
                code,
                ignored: false,
            } => write!(f, "[{step}] command exited with code {code}"),
            StepEvent::StepFinished { step, result } => write!(f, "[{step}] step result: {result}"),
            StepEvent::StepAborted { step } => write!(f, "[{step}] step aborted"),
            StepEvent::StepSkipped { step } => {
                write!(f, "[{step}] skipped (a previous step did not succeed)")
            }
            StepEvent::BuildFinished { result } => write!(f, "Finished: {result}"),
        }
    }
}
