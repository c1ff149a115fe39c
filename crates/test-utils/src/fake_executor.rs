use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use pystep::errors::ExecutionError;
use pystep::exec::{CancelSignal, CommandExecutor, CommandOutput, ExecRequest};
use pystep::report::LogSink;

/// A fake executor that:
/// - records every request it receives
/// - replies with queued outputs (or exit code 0 with no output when the
///   queue is empty), forwarding the output lines to the sink.
#[derive(Default)]
pub struct FakeExecutor {
    requests: Arc<Mutex<Vec<ExecRequest>>>,
    replies: Mutex<VecDeque<Result<CommandOutput, ExecutionError>>>,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply with the given exit code and output text.
    pub fn reply(self, exit_code: i32, output: &str) -> Self {
        let combined_log = output.lines().map(|l| format!("{l}\n")).collect();
        self.replies.lock().unwrap().push_back(Ok(CommandOutput {
            exit_code,
            combined_log,
            cancelled: false,
        }));
        self
    }

    pub fn reply_error(self, error: ExecutionError) -> Self {
        self.replies.lock().unwrap().push_back(Err(error));
        self
    }

    /// Shared handle on the recorded requests.
    pub fn requests(&self) -> Arc<Mutex<Vec<ExecRequest>>> {
        Arc::clone(&self.requests)
    }
}

impl CommandExecutor for FakeExecutor {
    fn execute(
        &self,
        request: ExecRequest,
        sink: Arc<dyn LogSink>,
        _cancel: CancelSignal,
    ) -> Pin<Box<dyn Future<Output = Result<CommandOutput, ExecutionError>> + Send + '_>> {
        self.requests.lock().unwrap().push(request);
        let reply = self.replies.lock().unwrap().pop_front().unwrap_or_else(|| {
            Ok(CommandOutput {
                exit_code: 0,
                combined_log: String::new(),
                cancelled: false,
            })
        });

        Box::pin(async move {
            if let Ok(output) = &reply {
                for line in output.combined_log.lines() {
                    sink.output(line);
                }
            }
            reply
        })
    }
}
