#![allow(dead_code)]

use std::sync::Arc;

use pystep::engine::{BuildContext, PythonBuilder};
use pystep::env::{AxisBinding, Environment};
use pystep::exec::{CommandExecutor, ShellExecutor};
use pystep::tools::{ConfiguredRegistry, Installation};
use pystep_test_utils::recording_sink::RecordingSink;

pub use pystep_test_utils::{init_tracing, with_timeout};

pub const CPYTHON2: &str = "CPython-2";

/// Registry with a single installation whose home is a fresh temp dir.
pub fn cpython2(home: &tempfile::TempDir) -> ConfiguredRegistry {
    ConfiguredRegistry::new(vec![Installation::new(
        CPYTHON2,
        home.path().to_string_lossy(),
    )])
}

/// A Python step wired to the given executor and a recording sink.
pub fn builder_with(
    registry: ConfiguredRegistry,
    executor: Arc<dyn CommandExecutor>,
) -> (PythonBuilder, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::new());
    let builder = PythonBuilder::new(Arc::new(registry), executor, sink.clone());
    (builder, sink)
}

/// A Python step running real shell commands.
pub fn shell_builder(registry: ConfiguredRegistry) -> (PythonBuilder, Arc<RecordingSink>) {
    builder_with(registry, Arc::new(ShellExecutor::new()))
}

/// Context inheriting the test process environment.
pub fn context(python: Option<&str>, command: &str, ignore_exit_code: bool) -> BuildContext {
    BuildContext {
        explicit_installation: python.map(str::to_string),
        ignore_exit_code,
        ambient: Environment::from_process(),
        working_dir: std::env::temp_dir(),
        ..BuildContext::new("python", command)
    }
}

pub fn with_axes(mut ctx: BuildContext, axes: &[(&str, &str)]) -> BuildContext {
    ctx.axis_bindings = axes
        .iter()
        .map(|(name, value)| AxisBinding::new(*name, *value))
        .collect();
    ctx
}
