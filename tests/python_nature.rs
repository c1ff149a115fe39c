#![cfg(unix)]

mod common;
use crate::common::*;

use pystep::engine::{BuildStep, StepState};
use pystep::exec::CancelSignal;
use pystep::types::{BuildResult, Nature};

/// Installation whose "interpreter" is `cat`, so running a script prints it.
fn cat_installation() -> tempfile::TempDir {
    let home = tempfile::tempdir().unwrap();
    let bin = home.path().join("bin");
    std::fs::create_dir(&bin).unwrap();
    std::os::unix::fs::symlink("/bin/cat", bin.join("python")).unwrap();
    home
}

#[tokio::test]
async fn python_nature_runs_script_with_installation_interpreter() {
    init_tracing();
    let home = cat_installation();
    let (builder, sink) = shell_builder(cpython2(&home));

    let mut ctx = context(Some(CPYTHON2), "print('hello from python')", false);
    ctx.nature = Nature::Python;
    let report = builder.run(&ctx, CancelSignal::never()).await;

    assert_eq!(report.state, StepState::Classified);
    assert_eq!(report.result, BuildResult::Success);
    assert!(sink.text().contains("print('hello from python')"));
}

#[tokio::test]
async fn python_nature_without_interpreter_fails() {
    init_tracing();
    let home = tempfile::tempdir().unwrap();
    let (builder, sink) = shell_builder(cpython2(&home));

    let mut ctx = context(Some(CPYTHON2), "print('x')", true);
    ctx.nature = Nature::Python;
    let report = builder.run(&ctx, CancelSignal::never()).await;

    assert_eq!(report.state, StepState::FailedExecution);
    assert_eq!(report.result, BuildResult::Failure);
    assert!(sink.text().contains("Failed to start command"));
}
