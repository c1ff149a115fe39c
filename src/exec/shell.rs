// src/exec/shell.rs

//! Process-backed executor.

use std::future::Future;
use std::io::Write;
use std::path::Path;
use std::pin::Pin;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tempfile::NamedTempFile;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::env::PYTHON_EXE_VAR;
use crate::errors::ExecutionError;
use crate::exec::backend::{CancelSignal, CommandExecutor, CommandOutput, ExecRequest};
use crate::report::LogSink;
use crate::types::Nature;

/// Once the command has exited, output still in flight gets this long to
/// arrive. Background processes may keep the pipes open indefinitely.
const OUTPUT_GRACE: Duration = Duration::from_millis(250);

/// Runs commands through `sh -c` (`cmd /C` on Windows), or through the
/// resolved interpreter for `Nature::Python`.
#[derive(Debug, Clone, Default)]
pub struct ShellExecutor;

impl ShellExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl CommandExecutor for ShellExecutor {
    fn execute(
        &self,
        request: ExecRequest,
        sink: Arc<dyn LogSink>,
        cancel: CancelSignal,
    ) -> Pin<Box<dyn Future<Output = Result<CommandOutput, ExecutionError>> + Send + '_>> {
        Box::pin(run_command(request, sink, cancel))
    }
}

async fn run_command(
    request: ExecRequest,
    sink: Arc<dyn LogSink>,
    mut cancel: CancelSignal,
) -> Result<CommandOutput, ExecutionError> {
    info!(
        step = %request.step,
        nature = %request.nature,
        cmd = %request.command,
        workdir = %request.working_dir.display(),
        "starting command"
    );

    // Must stay alive until the interpreter has exited.
    let script = match request.nature {
        Nature::Python => Some(write_script(&request.command).map_err(spawn_failed)?),
        Nature::Shell => None,
    };

    let mut cmd = build_command(&request, script.as_ref().map(NamedTempFile::path));
    cmd.env_clear()
        .envs(request.environment.iter())
        .current_dir(&request.working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    // Own process group, so a cancel reaches everything the command started.
    #[cfg(unix)]
    {
        cmd.process_group(0);
    }

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning process for step '{}'", request.step))
        .map_err(spawn_failed)?;

    let (line_tx, mut line_rx) = mpsc::channel::<String>(256);
    let mut readers = Vec::with_capacity(2);
    if let Some(stdout) = child.stdout.take() {
        readers.push(spawn_line_reader(stdout, line_tx.clone()));
    }
    if let Some(stderr) = child.stderr.take() {
        readers.push(spawn_line_reader(stderr, line_tx.clone()));
    }
    // Readers hold the only senders, so the channel closes with the pipes.
    drop(line_tx);

    let mut combined_log = String::new();

    // Either the process exits on its own, or the build is cancelled.
    let waited = tokio::select! {
        status = drain_and_wait(&mut child, &mut line_rx, sink.as_ref(), &mut combined_log) => {
            Some(status)
        }
        _ = cancel.cancelled() => None,
    };

    if waited.is_none() {
        info!(step = %request.step, "cancellation requested; killing process group");
        kill_process_tree(&mut child, &request.step).await;
    }
    for reader in readers {
        reader.abort();
    }

    match waited {
        Some(status) => {
            let status = status
                .with_context(|| format!("waiting for process of step '{}'", request.step))
                .map_err(spawn_failed)?;
            let exit_code = status.code().unwrap_or(-1);

            info!(
                step = %request.step,
                exit_code,
                success = status.success(),
                "command exited"
            );

            Ok(CommandOutput {
                exit_code,
                combined_log,
                cancelled: false,
            })
        }
        None => {
            Ok(CommandOutput {
                exit_code: -1,
                combined_log,
                cancelled: true,
            })
        }
    }
}

fn build_command(request: &ExecRequest, script: Option<&Path>) -> Command {
    match script {
        Some(script) => {
            let python = request.environment.get(PYTHON_EXE_VAR).unwrap_or("python");
            let mut c = Command::new(python);
            c.arg(script);
            c
        }
        None if cfg!(windows) => {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(&request.command);
            c
        }
        None => {
            let mut c = Command::new("sh");
            c.arg("-c").arg(&request.command);
            c
        }
    }
}

fn write_script(source: &str) -> Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("pystep-")
        .suffix(".py")
        .tempfile()
        .context("creating temporary Python script")?;
    file.write_all(source.as_bytes())
        .context("writing temporary Python script")?;
    file.flush().context("flushing temporary Python script")?;
    Ok(file)
}

fn spawn_failed(err: anyhow::Error) -> ExecutionError {
    ExecutionError::SpawnFailed(format!("{err:#}"))
}

async fn drain_and_wait(
    child: &mut Child,
    lines: &mut mpsc::Receiver<String>,
    sink: &dyn LogSink,
    combined_log: &mut String,
) -> std::io::Result<ExitStatus> {
    let mut record = |line: String| {
        sink.output(&line);
        combined_log.push_str(&line);
        combined_log.push('\n');
    };

    let status = {
        let wait = child.wait();
        tokio::pin!(wait);
        loop {
            tokio::select! {
                status = &mut wait => break status?,
                line = lines.recv() => match line {
                    Some(line) => record(line),
                    // Both pipes closed; only the exit status is missing.
                    None => break (&mut wait).await?,
                },
            }
        }
    };

    let _ = tokio::time::timeout(OUTPUT_GRACE, async {
        while let Some(line) = lines.recv().await {
            record(line);
        }
    })
    .await;

    Ok(status)
}

/// Kill the command's process group, then the command itself.
async fn kill_process_tree(child: &mut Child, step: &str) {
    #[cfg(unix)]
    {
        use nix::sys::signal::{killpg, Signal};
        use nix::unistd::Pid;

        if let Some(pid) = child.id() {
            if let Err(e) = killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
                debug!(step, error = %e, "failed to kill process group");
            }
        }
    }

    if let Err(e) = child.kill().await {
        warn!(
            step,
            error = %e,
            "failed to kill child process on cancellation"
        );
    }
}

/// Forward each line of `reader` to `tx`; invalid UTF-8 is replaced.
fn spawn_line_reader<R>(reader: R, tx: mpsc::Sender<String>) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    let line = String::from_utf8_lossy(&buf)
                        .trim_end_matches(['\n', '\r'])
                        .to_string();
                    if tx.send(line).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    debug!(error = %e, "error reading command output");
                    break;
                }
            }
        }
    })
}
