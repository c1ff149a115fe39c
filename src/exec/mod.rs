// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`backend`] provides the `CommandExecutor` trait, the request/output
//!   types and the cancellation signal.
//! - [`shell`] is the production executor built on `tokio::process::Command`.

pub mod backend;
pub mod shell;

pub use backend::{
    cancel_channel, CancelHandle, CancelSignal, CommandExecutor, CommandOutput, ExecRequest,
};
pub use shell::ShellExecutor;
