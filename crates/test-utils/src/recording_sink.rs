use std::sync::Mutex;

use pystep::report::{LogSink, StepEvent};

/// A log sink that keeps everything in memory.
///
/// `text()` renders the log the same way `ConsoleSink` would, so tests can
/// assert on both structured events and plain log text.
#[derive(Debug, Default)]
pub struct RecordingSink {
    entries: Mutex<Vec<Entry>>,
}

#[derive(Debug, Clone)]
enum Entry {
    Event(StepEvent),
    Output(String),
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<StepEvent> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                Entry::Event(ev) => Some(ev.clone()),
                Entry::Output(_) => None,
            })
            .collect()
    }

    pub fn output_lines(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                Entry::Output(line) => Some(line.clone()),
                Entry::Event(_) => None,
            })
            .collect()
    }

    /// The full log as text, one line per entry.
    pub fn text(&self) -> String {
        let entries = self.entries.lock().unwrap();
        let mut out = String::new();
        for entry in entries.iter() {
            match entry {
                Entry::Event(ev) => out.push_str(&ev.to_string()),
                Entry::Output(line) => out.push_str(line),
            }
            out.push('\n');
        }
        out
    }
}

impl LogSink for RecordingSink {
    fn event(&self, event: &StepEvent) {
        self.entries.lock().unwrap().push(Entry::Event(event.clone()));
    }

    fn output(&self, line: &str) {
        self.entries
            .lock()
            .unwrap()
            .push(Entry::Output(line.to_string()));
    }
}
