use std::path::{Path, PathBuf};
use std::sync::Mutex;

use dojowatch::exec::CommandResult;
use dojowatch::ui::PresentationSink;

/// Everything a sink was told, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Startup(PathBuf, Vec<String>),
    Started(String),
    Result(String, CommandResult),
    Error(String, String),
    Countdown(u64),
    Farewell,
}

/// A presentation sink that just records calls.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SinkEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Only the `(label, result)` pairs.
    pub fn results(&self) -> Vec<(String, CommandResult)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SinkEvent::Result(label, result) => Some((label, result)),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<(String, String)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SinkEvent::Error(label, message) => Some((label, message)),
                _ => None,
            })
            .collect()
    }

    pub fn countdowns(&self) -> Vec<u64> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SinkEvent::Countdown(v) => Some(v),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: SinkEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl PresentationSink for RecordingSink {
    fn show_startup_info(&self, directory: &Path, patterns: &[String]) {
        self.push(SinkEvent::Startup(directory.to_path_buf(), patterns.to_vec()));
    }

    fn show_action_started(&self, label: &str) {
        self.push(SinkEvent::Started(label.to_string()));
    }

    fn show_result(&self, label: &str, result: &CommandResult) {
        self.push(SinkEvent::Result(label.to_string(), result.clone()));
    }

    fn show_error(&self, label: &str, message: &str) {
        self.push(SinkEvent::Error(label.to_string(), message.to_string()));
    }

    fn show_countdown(&self, remaining: u64) {
        self.push(SinkEvent::Countdown(remaining));
    }

    fn show_farewell(&self) {
        self.push(SinkEvent::Farewell);
    }
}
