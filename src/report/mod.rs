// src/report/mod.rs

//! Build log: structured events and the sinks that render them.

pub mod events;
pub mod sink;

pub use events::StepEvent;
pub use sink::{ConsoleSink, LogSink};
