// src/report/sink.rs

use std::fmt::Debug;
use std::io::Write;

use tracing::{debug, warn};

use crate::report::StepEvent;

/// Destination of a build log.
///
/// Receives both pystep's own events and the raw output lines of the
/// commands it runs.
pub trait LogSink: Send + Sync + Debug {
    fn event(&self, event: &StepEvent);

    /// One line of command output (without trailing newline).
    fn output(&self, line: &str);
}

/// Writes the build log to stdout.
///
/// Events are also mirrored to `tracing`, which goes to stderr.
#[derive(Debug, Clone, Default)]
pub struct ConsoleSink;

impl LogSink for ConsoleSink {
    fn event(&self, event: &StepEvent) {
        match event {
            StepEvent::StepFailed { step, error } => {
                warn!(step = %step, error = %error, "step failed")
            }
            other => debug!(event = ?other, "build event"),
        }
        write_line(&event.to_string());
    }

    fn output(&self, line: &str) {
        write_line(line);
    }
}

fn write_line(line: &str) {
    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    // A closed stdout must not fail the build.
    let _ = writeln!(lock, "{line}");
}
