// src/exec/backend.rs

//! Pluggable command executor abstraction.
//!
//! The step pipeline talks to a [`CommandExecutor`] instead of spawning
//! processes itself, so tests can swap in a fake that records requests and
//! returns canned output. Production code uses
//! [`ShellExecutor`](crate::exec::ShellExecutor).

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::watch;

use crate::env::Environment;
use crate::errors::ExecutionError;
use crate::report::LogSink;
use crate::types::Nature;

/// Everything needed to run one step's command.
#[derive(Debug, Clone)]
pub struct ExecRequest {
    /// Step name, for logging only.
    pub step: String,
    pub command: String,
    pub nature: Nature,
    /// Complete child environment; the parent environment is not inherited.
    pub environment: Environment,
    pub working_dir: PathBuf,
}

/// Raw result of running a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `-1` when the process was terminated by a signal.
    pub exit_code: i32,
    /// stdout and stderr lines in arrival order.
    pub combined_log: String,
    /// True if the process was killed because the build was cancelled.
    pub cancelled: bool,
}

/// Trait abstracting how a step's command is run.
pub trait CommandExecutor: Send + Sync {
    /// Run the command to completion (or until `cancel` fires).
    ///
    /// Output lines are forwarded to `sink` as they arrive. Spawn failures
    /// are errors; non-zero exit codes are not.
    fn execute(
        &self,
        request: ExecRequest,
        sink: Arc<dyn LogSink>,
        cancel: CancelSignal,
    ) -> Pin<Box<dyn Future<Output = Result<CommandOutput, ExecutionError>> + Send + '_>>;
}

/// Sending half of a cancellation signal.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

/// Receiving half of a cancellation signal; cheap to clone, one per step.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    rx: watch::Receiver<bool>,
}

impl CancelSignal {
    /// A signal that never fires.
    pub fn never() -> Self {
        let (_handle, signal) = cancel_channel();
        signal
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once cancellation is requested.
    ///
    /// If the handle is dropped without cancelling, this never resolves.
    pub async fn cancelled(&mut self) {
        loop {
            if *self.rx.borrow_and_update() {
                return;
            }
            if self.rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

pub fn cancel_channel() -> (CancelHandle, CancelSignal) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelSignal { rx })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn cancel_wakes_waiters() {
        let (handle, signal) = cancel_channel();
        let mut waiter = signal.clone();
        let task = tokio::spawn(async move { waiter.cancelled().await });

        assert!(!signal.is_cancelled());
        handle.cancel();
        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .expect("waiter should wake")
            .unwrap();
        assert!(signal.is_cancelled());
    }

    #[tokio::test]
    async fn never_signal_does_not_resolve() {
        let mut signal = CancelSignal::never();
        let res = tokio::time::timeout(Duration::from_millis(50), signal.cancelled()).await;
        assert!(res.is_err());
        assert!(!signal.is_cancelled());
    }

    #[tokio::test]
    async fn signal_raised_before_waiting_resolves_immediately() {
        let (handle, mut signal) = cancel_channel();
        handle.cancel();
        tokio::time::timeout(Duration::from_millis(50), signal.cancelled())
            .await
            .expect("already cancelled");
    }
}
