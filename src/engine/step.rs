// src/engine/step.rs

//! The Python build step pipeline: resolve, compose, execute, classify.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::engine::{
    classify, BuildContext, BuildStep, ExecutionOutcome, StepReport, StepState,
};
use crate::env::compose;
use crate::errors::StepError;
use crate::exec::{CancelSignal, CommandExecutor, CommandOutput, ExecRequest};
use crate::report::{LogSink, StepEvent};
use crate::tools::{resolve, InstallationRegistry};
use crate::types::BuildResult;

/// Runs a command against a resolved Python installation.
///
/// Cheap to clone; the registry, executor and sink are shared.
#[derive(Clone)]
pub struct PythonBuilder {
    registry: Arc<dyn InstallationRegistry>,
    executor: Arc<dyn CommandExecutor>,
    sink: Arc<dyn LogSink>,
}

impl PythonBuilder {
    pub fn new(
        registry: Arc<dyn InstallationRegistry>,
        executor: Arc<dyn CommandExecutor>,
        sink: Arc<dyn LogSink>,
    ) -> Self {
        Self {
            registry,
            executor,
            sink,
        }
    }

    async fn run_pipeline(&self, ctx: &BuildContext, cancel: CancelSignal) -> StepReport {
        let mut progress = Progress::new(&ctx.step_name);

        self.sink.event(&StepEvent::StepStarted {
            step: ctx.step_name.clone(),
            command: ctx.command.clone(),
            nature: ctx.nature,
        });

        progress.enter(StepState::Resolving);
        let installation = match resolve(
            self.registry.as_ref(),
            ctx.explicit_installation.as_deref(),
            &ctx.axis_bindings,
            &ctx.python_axis,
        ) {
            Ok(installation) => installation,
            Err(err) => return self.fail(progress, StepState::FailedResolution, err.into()),
        };

        self.sink.event(&StepEvent::InstallationResolved {
            step: ctx.step_name.clone(),
            installation: installation.name.clone(),
            home: installation.home.clone(),
        });

        progress.enter(StepState::Composing);
        let environment = match compose(&installation, ctx) {
            Ok(env) => env,
            Err(err) => return self.fail(progress, StepState::FailedComposition, err.into()),
        };

        if cancel.is_cancelled() {
            return self.abort(progress, None);
        }

        progress.enter(StepState::Executing);
        let request = ExecRequest {
            step: ctx.step_name.clone(),
            command: ctx.command.clone(),
            nature: ctx.nature,
            environment,
            working_dir: ctx.working_dir.clone(),
        };

        let output = match self
            .executor
            .execute(request, Arc::clone(&self.sink), cancel)
            .await
        {
            Ok(output) => output,
            Err(err) => return self.fail(progress, StepState::FailedExecution, err.into()),
        };

        if output.cancelled {
            return self.abort(progress, Some(output));
        }

        self.finish(progress, ctx, output)
    }

    fn finish(&self, mut progress: Progress, ctx: &BuildContext, output: CommandOutput) -> StepReport {
        let code = output.exit_code;
        self.sink.event(&StepEvent::ExitCode {
            step: progress.step.clone(),
            code,
            ignored: ctx.ignore_exit_code && code != 0,
        });

        let result = classify(code, ctx.ignore_exit_code);
        progress.enter(StepState::Classified);

        info!(step = %progress.step, exit_code = code, %result, "step classified");
        self.sink.event(&StepEvent::StepFinished {
            step: progress.step.clone(),
            result,
        });

        StepReport {
            step: progress.step,
            state: progress.state,
            result,
            outcome: Some(ExecutionOutcome {
                exit_code: code,
                combined_log: output.combined_log,
                result,
            }),
        }
    }

    fn fail(&self, mut progress: Progress, state: StepState, error: StepError) -> StepReport {
        progress.enter(state);
        warn!(step = %progress.step, error = %error, "step failed before completion");

        self.sink.event(&StepEvent::StepFailed {
            step: progress.step.clone(),
            error,
        });
        self.sink.event(&StepEvent::StepFinished {
            step: progress.step.clone(),
            result: BuildResult::Failure,
        });

        StepReport {
            step: progress.step,
            state: progress.state,
            result: BuildResult::Failure,
            outcome: None,
        }
    }

    fn abort(&self, mut progress: Progress, output: Option<CommandOutput>) -> StepReport {
        progress.enter(StepState::Cancelled);
        self.sink.event(&StepEvent::StepAborted {
            step: progress.step.clone(),
        });

        StepReport {
            step: progress.step,
            state: progress.state,
            result: BuildResult::Aborted,
            outcome: output.map(|o| ExecutionOutcome {
                exit_code: o.exit_code,
                combined_log: o.combined_log,
                result: BuildResult::Aborted,
            }),
        }
    }
}

impl BuildStep for PythonBuilder {
    fn run<'a>(
        &'a self,
        ctx: &'a BuildContext,
        cancel: CancelSignal,
    ) -> Pin<Box<dyn Future<Output = StepReport> + Send + 'a>> {
        Box::pin(self.run_pipeline(ctx, cancel))
    }
}

/// Current state of one step invocation.
struct Progress {
    step: String,
    state: StepState,
}

impl Progress {
    fn new(step: &str) -> Self {
        Self {
            step: step.to_string(),
            state: StepState::Pending,
        }
    }

    fn enter(&mut self, next: StepState) {
        debug_assert!(!self.state.is_terminal(), "step already finished");
        debug!(step = %self.step, from = ?self.state, to = ?next, "step state");
        self.state = next;
    }
}
